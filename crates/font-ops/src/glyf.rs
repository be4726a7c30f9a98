//! glyf table rewriting (TrueType outlines)
//!
//! Replacing a glyph means rebuilding `glyf` and `loca` together, and then
//! bringing the tables that summarize outlines back in line: the font
//! bounding box and loca format in `head`, the point/contour maxima in
//! `maxp`, the left side bearing of the edited glyph in `hmtx`, and the
//! horizontal extents in `hhea`. Advance widths are never touched.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use kurbo::{BezPath, CubicBez, PathEl, Point, Rect};
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        glyf::{Glyf as ReadGlyf, Glyph as ReadGlyph},
        loca::Loca as ReadLoca,
    },
    types::{GlyphId, Tag},
};
use write_fonts::{
    FontBuilder,
    from_obj::{FromTableRef, ToOwnedTable},
    tables::{
        glyf::{Bbox, CompositeGlyph, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
    },
    types::{FWord, UfWord},
};

/// Maximum distance, in font units, between a cubic and its quadratic approximation.
const QUADRATIC_ACCURACY: f64 = 1.0;

/// Outline tables this module cannot regenerate.
const UNSUPPORTED_TABLES: &[(Tag, &str)] = &[
    (Tag::new(b"CFF "), "CFF outlines are not supported; only TrueType (glyf) fonts can be patched"),
    (Tag::new(b"CFF2"), "CFF2 outlines are not supported; only TrueType (glyf) fonts can be patched"),
    (Tag::new(b"gvar"), "variable fonts (gvar) are not supported"),
];

/// New outlines keyed by the glyph they replace.
pub type GlyphEdits = BTreeMap<GlyphId, Glyph>;

/// Approximate every cubic segment of `path` with quadratic segments.
///
/// Lines, quadratics and subpath structure are preserved.
pub fn to_quadratic(path: &BezPath, accuracy: f64) -> BezPath {
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(p);
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                out.line_to(p);
                current = p;
            }
            PathEl::QuadTo(c, p) => {
                out.quad_to(c, p);
                current = p;
            }
            PathEl::CurveTo(c0, c1, p) => {
                for (_, _, quad) in CubicBez::new(current, c0, c1, p).to_quads(accuracy) {
                    out.quad_to(quad.p1, quad.p2);
                }
                current = p;
            }
            PathEl::ClosePath => {
                out.close_path();
                current = start;
            }
        }
    }
    out
}

/// Compile an outline in font units into a glyf glyph.
///
/// A path without any drawing segment becomes [`Glyph::Empty`]. The result
/// carries no hinting instructions. Points must fit glyf's 16-bit
/// coordinates; an outline reaching beyond them is an error.
pub fn glyph_from_path(path: &BezPath) -> Result<Glyph> {
    let draws = path
        .elements()
        .iter()
        .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath));
    if !draws {
        return Ok(Glyph::Empty);
    }

    let quadratic = to_quadratic(path, QUADRATIC_ACCURACY);
    let bounds = quadratic.control_box();
    if !fits_coordinate_range(bounds) {
        bail!(
            "Outline exceeds font coordinate range: ({:.0}, {:.0})..({:.0}, {:.0})",
            bounds.x0,
            bounds.y0,
            bounds.x1,
            bounds.y1
        );
    }

    let mut simple = SimpleGlyph::from_bezpath(&quadratic)
        .map_err(|e| anyhow!("Malformed outline: {e:?}"))?;
    simple.bbox = bounds.into();
    Ok(Glyph::Simple(simple))
}

fn fits_coordinate_range(rect: Rect) -> bool {
    let range = f64::from(i16::MIN)..=f64::from(i16::MAX);
    [rect.x0, rect.y0, rect.x1, rect.y1].iter().all(|v| range.contains(&v.round()))
}

/// Replace glyph outlines, adding the rebuilt tables to `builder`.
///
/// Rebuilds `glyf`, `loca`, `head`, `maxp`, `hhea` and `hmtx`. Glyphs
/// without an entry in `edits` are carried over unchanged.
pub fn replace_glyphs(font: &FontRef, builder: &mut FontBuilder, edits: &GlyphEdits) -> Result<()> {
    for (tag, reason) in UNSUPPORTED_TABLES {
        if font.table_data(*tag).is_some() {
            bail!("{reason}");
        }
    }

    let glyf = font.glyf().context("Font has no glyf table")?;
    let loca = font.loca(None).context("Failed to read loca table")?;
    let num_glyphs = font.maxp().context("Failed to read maxp table")?.num_glyphs();

    if let Some(gid) = edits.keys().find(|gid| gid.to_u32() >= u32::from(num_glyphs)) {
        bail!("Glyph {} is out of range (font has {num_glyphs} glyphs)", gid.to_u32());
    }

    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut font_bbox: Option<Bbox> = None;
    let mut bboxes = Vec::with_capacity(usize::from(num_glyphs));

    for gid in 0..num_glyphs {
        let gid = GlyphId::new(u32::from(gid));
        let glyph = match edits.get(&gid) {
            Some(glyph) => glyph.clone(),
            None => existing_glyph(&loca, &glyf, gid)?,
        };

        let bbox = glyph_bbox(&glyph);
        if let Some(bbox) = bbox {
            font_bbox = Some(font_bbox.map_or(bbox, |acc| union(acc, bbox)));
        }
        bboxes.push(bbox);

        glyf_builder
            .add_glyph(&glyph)
            .with_context(|| format!("Failed to compile glyph {}", gid.to_u32()))?;
    }

    let (new_glyf, new_loca, loca_format) = glyf_builder.build();
    builder.add_table(&new_glyf)?;
    builder.add_table(&new_loca)?;

    let mut head: Head = font.head().context("Failed to read head table")?.to_owned_table();
    head.index_to_loc_format = loca_format as i16;
    if let Some(bbox) = font_bbox {
        head.x_min = bbox.x_min;
        head.y_min = bbox.y_min;
        head.x_max = bbox.x_max;
        head.y_max = bbox.y_max;
    }
    builder.add_table(&head)?;

    let mut maxp: Maxp = font.maxp()?.to_owned_table();
    for glyph in edits.values() {
        if let Glyph::Simple(simple) = glyph {
            let points = simple.contours.iter().map(|c| c.len()).sum::<usize>();
            let points = u16::try_from(points).context("Glyph has too many points")?;
            let contours =
                u16::try_from(simple.contours.len()).context("Glyph has too many contours")?;
            if let Some(max) = maxp.max_points.as_mut() {
                *max = (*max).max(points);
            }
            if let Some(max) = maxp.max_contours.as_mut() {
                *max = (*max).max(contours);
            }
        }
    }
    builder.add_table(&maxp)?;

    let metrics = horizontal_metrics(font, &bboxes, edits)?;
    let hhea = font.hhea().context("Failed to read hhea table")?;
    let num_long_metrics = usize::from(hhea.number_of_h_metrics());

    let mut hhea: Hhea = hhea.to_owned_table();
    update_extents(&mut hhea, &metrics, &bboxes)?;
    builder.add_table(&hhea)?;

    let (long, short) = metrics.split_at(num_long_metrics.min(metrics.len()));
    let h_metrics = long
        .iter()
        .map(|&(advance, side_bearing)| LongMetric { advance, side_bearing })
        .collect();
    let left_side_bearings = short.iter().map(|&(_, lsb)| lsb).collect();
    builder.add_table(&Hmtx::new(h_metrics, left_side_bearings))?;

    log::debug!(
        "Rebuilt glyf/loca: {num_glyphs} glyphs, {} edited, loca format {}",
        edits.len(),
        loca_format as i16
    );
    Ok(())
}

fn existing_glyph<'a>(loca: &ReadLoca<'a>, glyf: &ReadGlyf<'a>, gid: GlyphId) -> Result<Glyph> {
    let glyph = loca
        .get_glyf(gid, glyf)
        .with_context(|| format!("Failed to read glyph {}", gid.to_u32()))?;

    Ok(match glyph {
        Some(ReadGlyph::Simple(simple)) => Glyph::Simple(SimpleGlyph::from_table_ref(&simple)),
        Some(ReadGlyph::Composite(composite)) => {
            Glyph::Composite(CompositeGlyph::from_table_ref(&composite))
        }
        None => Glyph::Empty,
    })
}

/// Advance and left side bearing of every glyph; edited glyphs get their new `xMin`.
fn horizontal_metrics(
    font: &FontRef,
    bboxes: &[Option<Bbox>],
    edits: &GlyphEdits,
) -> Result<Vec<(u16, i16)>> {
    let hmtx = font.hmtx().context("Failed to read hmtx table")?;

    Ok(bboxes
        .iter()
        .enumerate()
        .map(|(gid, bbox)| {
            let glyph_id = GlyphId::new(gid as u32);
            let advance = hmtx.advance(glyph_id).unwrap_or(0);
            let lsb = if edits.contains_key(&glyph_id) {
                bbox.map_or(0, |bbox| bbox.x_min)
            } else {
                hmtx.side_bearing(glyph_id).unwrap_or(0)
            };
            (advance, lsb)
        })
        .collect())
}

/// Recompute `hhea` extents from the rebuilt glyph boxes. Empty glyphs
/// only contribute their advance.
fn update_extents(hhea: &mut Hhea, metrics: &[(u16, i16)], bboxes: &[Option<Bbox>]) -> Result<()> {
    let mut max_advance = 0;
    let mut extents: Option<(i32, i32, i32)> = None;

    for (&(advance, lsb), bbox) in metrics.iter().zip(bboxes) {
        max_advance = max_advance.max(advance);
        let Some(bbox) = bbox else { continue };

        let lsb = i32::from(lsb);
        let extent = lsb + i32::from(bbox.x_max) - i32::from(bbox.x_min);
        let rsb = i32::from(advance) - extent;
        extents = Some(match extents {
            Some((min_lsb, min_rsb, max_extent)) => {
                (min_lsb.min(lsb), min_rsb.min(rsb), max_extent.max(extent))
            }
            None => (lsb, rsb, extent),
        });
    }

    hhea.advance_width_max = UfWord::new(max_advance);
    if let Some((min_lsb, min_rsb, max_extent)) = extents {
        let fword = |value: i32, field: &str| {
            i16::try_from(value)
                .map(FWord::new)
                .with_context(|| format!("hhea {field} {value} is out of range"))
        };
        hhea.min_left_side_bearing = fword(min_lsb, "minLeftSideBearing")?;
        hhea.min_right_side_bearing = fword(min_rsb, "minRightSideBearing")?;
        hhea.x_max_extent = fword(max_extent, "xMaxExtent")?;
    }
    Ok(())
}

fn glyph_bbox(glyph: &Glyph) -> Option<Bbox> {
    match glyph {
        Glyph::Empty => None,
        Glyph::Simple(simple) => Some(simple.bbox),
        Glyph::Composite(composite) => Some(composite.bbox),
    }
}

fn union(a: Bbox, b: Bbox) -> Bbox {
    Bbox {
        x_min: a.x_min.min(b.x_min),
        y_min: a.y_min.min(b.y_min),
        x_max: a.x_max.max(b.x_max),
        y_max: a.y_max.max(b.y_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rewrite_font, test_font::TestFont};

    fn read_simple_points(data: &[u8], gid: u32) -> Vec<(i16, i16, bool)> {
        let font = FontRef::new(data).unwrap();
        let glyf = font.glyf().unwrap();
        let loca = font.loca(None).unwrap();
        match loca.get_glyf(GlyphId::new(gid), &glyf).unwrap() {
            Some(ReadGlyph::Simple(simple)) => {
                simple.points().map(|p| (p.x, p.y, p.on_curve)).collect()
            }
            _ => Vec::new(),
        }
    }

    fn square_path(x: f64, y: f64, size: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + size, y));
        path.line_to((x + size, y + size));
        path.line_to((x, y + size));
        path.close_path();
        path
    }

    #[test]
    fn test_to_quadratic_removes_cubics() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 500.0), (500.0, 500.0), (500.0, 0.0));
        path.close_path();

        let quadratic = to_quadratic(&path, QUADRATIC_ACCURACY);
        assert!(!quadratic.elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))));
        assert!(quadratic.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        assert_eq!(quadratic.elements().first(), Some(&PathEl::MoveTo((0.0, 0.0).into())));
        assert_eq!(quadratic.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_glyph_from_empty_path() {
        assert!(matches!(glyph_from_path(&BezPath::new()).unwrap(), Glyph::Empty));
    }

    #[test]
    fn test_glyph_from_square() {
        let glyph = glyph_from_path(&square_path(10.0, -20.0, 300.0)).unwrap();
        let Glyph::Simple(simple) = glyph else {
            panic!("expected a simple glyph");
        };
        assert_eq!(simple.contours.len(), 1);
        assert_eq!(simple.bbox, Bbox { x_min: 10, y_min: -20, x_max: 310, y_max: 280 });
        assert!(simple.instructions.is_empty());
    }

    #[test]
    fn test_glyph_outside_coordinate_range() {
        let mut path = BezPath::new();
        path.move_to((0.0, 800.0));
        path.line_to((40000.0, 800.0));
        path.line_to((40000.0, -200.0));
        path.close_path();

        let err = glyph_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("exceeds font coordinate range"), "{err}");
    }

    #[test]
    fn test_replace_glyph_only_touches_target() {
        let data = TestFont::new()
            .glyph('A', TestFont::square(100, 0, 400))
            .glyph('B', TestFont::square(50, 50, 200))
            .build();
        let before_b = read_simple_points(&data, 2);

        let new_glyph = glyph_from_path(&square_path(-30.0, -100.0, 900.0)).unwrap();
        let edits = GlyphEdits::from([(GlyphId::new(1), new_glyph)]);
        let patched =
            rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits)).unwrap();

        assert_eq!(read_simple_points(&patched, 2), before_b);

        let font = FontRef::new(&patched).unwrap();
        let head = font.head().unwrap();
        assert_eq!((head.x_min(), head.y_min()), (-30, -100));
        assert_eq!((head.x_max(), head.y_max()), (870, 800));

        let hmtx = font.hmtx().unwrap();
        assert_eq!(hmtx.advance(GlyphId::new(1)), Some(TestFont::ADVANCE));
        assert_eq!(hmtx.side_bearing(GlyphId::new(1)), Some(-30));
        assert_eq!(hmtx.side_bearing(GlyphId::new(2)), Some(50));
    }

    #[test]
    fn test_replace_recomputes_hhea_extents() {
        let data = TestFont::new()
            .glyph('A', TestFont::square(100, 0, 400))
            .glyph('B', TestFont::square(50, 50, 200))
            .build();

        let new_glyph = glyph_from_path(&square_path(-30.0, -100.0, 900.0)).unwrap();
        let edits = GlyphEdits::from([(GlyphId::new(1), new_glyph)]);
        let patched =
            rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits)).unwrap();

        let hhea = FontRef::new(&patched).unwrap().hhea().unwrap();
        assert_eq!(hhea.advance_width_max().to_u16(), TestFont::ADVANCE);
        assert_eq!(hhea.min_left_side_bearing().to_i16(), -30);
        assert_eq!(hhea.min_right_side_bearing().to_i16(), 500 - 870);
        assert_eq!(hhea.x_max_extent().to_i16(), 870);
        assert_eq!(hhea.number_of_h_metrics(), 3);
    }

    #[test]
    fn test_replace_with_empty_glyph() {
        let data = TestFont::new().glyph('A', TestFont::square(100, 0, 400)).build();
        let edits = GlyphEdits::from([(GlyphId::new(1), Glyph::Empty)]);
        let patched =
            rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits)).unwrap();

        assert!(read_simple_points(&patched, 1).is_empty());
        let font = FontRef::new(&patched).unwrap();
        assert_eq!(font.hmtx().unwrap().side_bearing(GlyphId::new(1)), Some(0));
    }

    #[test]
    fn test_replace_raises_maxp_limits() {
        let data = TestFont::new().glyph('A', TestFont::square(100, 0, 400)).build();

        let mut path = square_path(0.0, 0.0, 100.0);
        path.extend(square_path(200.0, 0.0, 100.0));
        path.extend(square_path(400.0, 0.0, 100.0));
        let edits = GlyphEdits::from([(GlyphId::new(1), glyph_from_path(&path).unwrap())]);
        let patched =
            rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits)).unwrap();

        let maxp = FontRef::new(&patched).unwrap().maxp().unwrap();
        assert_eq!(maxp.max_contours(), Some(3));
        assert!(maxp.max_points().unwrap() >= 12);
    }

    #[test]
    fn test_replace_rejects_cff() {
        let data = TestFont::new()
            .glyph('A', TestFont::square(100, 0, 400))
            .raw_table(Tag::new(b"CFF "), vec![1, 0, 4, 4])
            .build();
        let edits = GlyphEdits::from([(GlyphId::new(1), Glyph::Empty)]);
        let err = rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits))
            .unwrap_err();
        assert!(err.to_string().contains("CFF"));
    }

    #[test]
    fn test_replace_rejects_out_of_range_glyph() {
        let data = TestFont::new().glyph('A', TestFont::square(100, 0, 400)).build();
        let edits = GlyphEdits::from([(GlyphId::new(42), Glyph::Empty)]);
        let result = rewrite_font(&data, |font, builder| replace_glyphs(font, builder, &edits));
        assert!(result.is_err());
    }
}
