//! Synthetic TrueType fonts for tests.
//!
//! Builds a minimal but complete glyf-flavoured font: `.notdef` is always
//! glyph 0 and empty, every added glyph gets the next glyph id.

use read_fonts::{
    tables::glyf::CurvePoint,
    types::{GlyphId, Tag},
};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
    types::{FWord, Fixed, LongDateTime, UfWord, Version16Dot16},
};

/// Builder for a small TrueType font.
#[derive(Debug, Clone, Default)]
pub struct TestFont {
    glyphs: Vec<(Option<char>, Glyph)>,
    raw_tables: Vec<(Tag, Vec<u8>)>,
}

impl TestFont {
    pub const UNITS_PER_EM: u16 = 1000;
    pub const ASCENDER: i16 = 800;
    pub const DESCENDER: i16 = -200;
    pub const ADVANCE: u16 = 500;

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph mapped to `ch` in the cmap.
    pub fn glyph(mut self, ch: char, glyph: Glyph) -> Self {
        self.glyphs.push((Some(ch), glyph));
        self
    }

    /// Add a glyph that no codepoint maps to.
    pub fn unmapped_glyph(mut self, glyph: Glyph) -> Self {
        self.glyphs.push((None, glyph));
        self
    }

    /// Add an opaque table, copied verbatim into the font.
    pub fn raw_table(mut self, tag: Tag, data: Vec<u8>) -> Self {
        self.raw_tables.push((tag, data));
        self
    }

    /// A square contour with its lower-left corner at `(x, y)`.
    pub fn square(x: i16, y: i16, size: i16) -> Glyph {
        let points = vec![
            CurvePoint::new(x, y, true),
            CurvePoint::new(x, y + size, true),
            CurvePoint::new(x + size, y + size, true),
            CurvePoint::new(x + size, y, true),
        ];
        Glyph::Simple(SimpleGlyph {
            bbox: Bbox { x_min: x, y_min: y, x_max: x + size, y_max: y + size },
            contours: vec![Contour::from(points)],
            instructions: vec![],
        })
    }

    pub fn build(&self) -> Vec<u8> {
        let notdef = Glyph::Empty;
        let glyphs: Vec<&Glyph> = std::iter::once(&notdef)
            .chain(self.glyphs.iter().map(|(_, glyph)| glyph))
            .collect();
        let num_glyphs = u16::try_from(glyphs.len()).expect("too many test glyphs");

        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut bbox: Option<Bbox> = None;
        let mut max_points = 0u16;
        let mut max_contours = 0u16;
        let mut h_metrics = Vec::new();

        for glyph in &glyphs {
            glyf_builder.add_glyph(*glyph).expect("valid test glyph");
            let glyph_box = match glyph {
                Glyph::Simple(simple) => {
                    let points: usize = simple.contours.iter().map(|c| c.len()).sum();
                    max_points = max_points.max(points as u16);
                    max_contours = max_contours.max(simple.contours.len() as u16);
                    Some(simple.bbox)
                }
                Glyph::Composite(composite) => Some(composite.bbox),
                Glyph::Empty => None,
            };
            if let Some(b) = glyph_box {
                bbox = Some(match bbox {
                    Some(acc) => Bbox {
                        x_min: acc.x_min.min(b.x_min),
                        y_min: acc.y_min.min(b.y_min),
                        x_max: acc.x_max.max(b.x_max),
                        y_max: acc.y_max.max(b.y_max),
                    },
                    None => b,
                });
            }
            h_metrics.push(LongMetric {
                advance: Self::ADVANCE,
                side_bearing: glyph_box.map_or(0, |b| b.x_min),
            });
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        let bbox = bbox.unwrap_or_default();

        let mappings: Vec<(char, GlyphId)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(i, (ch, _))| Some(((*ch)?, GlyphId::new(i as u32 + 1))))
            .collect();
        let cmap = Cmap::from_mappings(mappings).expect("cmap");

        let head = Head {
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: 0x5F0F3CF5,
            flags: Flags::empty(),
            units_per_em: Self::UNITS_PER_EM,
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            x_min: bbox.x_min,
            y_min: bbox.y_min,
            x_max: bbox.x_max,
            y_max: bbox.y_max,
            mac_style: MacStyle::empty(),
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
        };

        let hhea = Hhea {
            ascender: FWord::new(Self::ASCENDER),
            descender: FWord::new(Self::DESCENDER),
            line_gap: FWord::new(0),
            advance_width_max: UfWord::new(Self::ADVANCE),
            min_left_side_bearing: FWord::new(bbox.x_min),
            min_right_side_bearing: FWord::new(0),
            x_max_extent: FWord::new(bbox.x_max),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: num_glyphs,
        };

        let hmtx = Hmtx { h_metrics, left_side_bearings: vec![] };

        let maxp = Maxp {
            num_glyphs,
            max_points: Some(max_points),
            max_contours: Some(max_contours),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };

        let post = Post {
            version: Version16Dot16::VERSION_3_0,
            italic_angle: Fixed::from_f64(0.0),
            underline_position: FWord::new(-100),
            underline_thickness: FWord::new(50),
            is_fixed_pitch: 0,
            min_mem_type42: 0,
            max_mem_type42: 0,
            min_mem_type1: 0,
            max_mem_type1: 0,
            num_glyphs: Some(num_glyphs),
            glyph_name_index: None,
            string_data: None,
        };

        let mut builder = FontBuilder::new();
        builder.add_table(&head).expect("head");
        builder.add_table(&hhea).expect("hhea");
        builder.add_table(&hmtx).expect("hmtx");
        builder.add_table(&maxp).expect("maxp");
        builder.add_table(&cmap).expect("cmap");
        builder.add_table(&post).expect("post");
        builder.add_table(&glyf).expect("glyf");
        builder.add_table(&loca).expect("loca");
        for (tag, data) in &self.raw_tables {
            builder.add_raw(*tag, data.clone());
        }
        builder.build()
    }
}
