//! SVG outline import.
//!
//! The SVG document is normalised by `usvg` (shapes become paths, styles,
//! `use` references and the `viewBox` are resolved), then every path is
//! flattened into one [`BezPath`] expressed in font design units.
//!
//! The canvas is mapped onto the em square: its height spans the full em,
//! its top edge sits on the ascender and the y-axis is flipped to point up.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};
use kurbo::{Affine, BezPath, Point};
use usvg::{Group, Node, Options, Tree, tiny_skia_path::PathSegment};

/// Placement of SVG user space inside a font's design space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSpace {
    /// Height of the em square, in font units.
    pub units_per_em: f64,
    /// Distance from the baseline to the top of the em square.
    pub ascent: f64,
}

impl GlyphSpace {
    /// The em square of a font with the given units-per-em and (negative) descender.
    pub fn new(units_per_em: u16, descender: i16) -> Self {
        let units_per_em = f64::from(units_per_em);
        Self { units_per_em, ascent: units_per_em - f64::from(descender).abs() }
    }

    /// Transform from an SVG canvas of `svg_height` user units to font units.
    fn transform(&self, svg_height: f64) -> Affine {
        let scale = self.units_per_em / svg_height;
        Affine::new([scale, 0.0, 0.0, -scale, 0.0, self.ascent])
    }
}

/// Read an SVG file and import its outlines.
pub fn import_file(path: &Path, space: GlyphSpace) -> Result<BezPath> {
    let data = read(path).with_context(|| format!("Failed to read SVG: {}", path.display()))?;
    import_svg(&data, space).with_context(|| format!("Failed to import SVG: {}", path.display()))
}

/// Import the outlines of an SVG document.
///
/// Fill and stroke are ignored; only path geometry is kept. A document
/// without paths yields an empty outline.
pub fn import_svg(data: &[u8], space: GlyphSpace) -> Result<BezPath> {
    let tree = Tree::from_data(data, &Options::default()).context("Failed to parse SVG")?;
    let size = tree.size();
    log::debug!("SVG canvas {}x{}", size.width(), size.height());

    let mut outline = BezPath::new();
    collect_paths(tree.root(), &mut outline);
    outline.apply_affine(space.transform(f64::from(size.height())));
    Ok(outline)
}

fn collect_paths(group: &Group, out: &mut BezPath) {
    for node in group.children() {
        match node {
            Node::Group(group) => collect_paths(group, out),
            Node::Path(path) => append_path(path, out),
            _ => {}
        }
    }
}

fn append_path(path: &usvg::Path, out: &mut BezPath) {
    let ts = path.abs_transform();
    let affine = Affine::new([ts.sx, ts.ky, ts.kx, ts.sy, ts.tx, ts.ty].map(f64::from));
    let point = |p: usvg::tiny_skia_path::Point| affine * Point::new(f64::from(p.x), f64::from(p.y));

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => out.move_to(point(p)),
            PathSegment::LineTo(p) => out.line_to(point(p)),
            PathSegment::QuadTo(c, p) => out.quad_to(point(c), point(p)),
            PathSegment::CubicTo(c0, c1, p) => out.curve_to(point(c0), point(c1), point(p)),
            PathSegment::Close => out.close_path(),
        }
    }
}
