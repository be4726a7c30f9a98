//! Table-level font rewriting for glyph replacement.
//!
//! Fonts are rewritten by copying every table from the source and then
//! replacing the few tables an edit touches. Glyph outlines are handled in
//! [`glyf`], which rebuilds `glyf`/`loca` and keeps `head`, `maxp` and `hmtx`
//! consistent with the new outlines.

pub mod glyf;
#[cfg(any(test, feature = "test-font"))]
pub mod test_font;

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider, types::GlyphId};
use write_fonts::FontBuilder;

pub use glyf::{GlyphEdits, glyph_from_path, replace_glyphs, to_quadratic};

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Look up the glyph the font's cmap assigns to `codepoint`.
///
/// Returns `None` when the codepoint is unmapped, when it maps to `.notdef`,
/// or when the font has no usable cmap.
pub fn glyph_for_codepoint(font: &FontRef, codepoint: u32) -> Option<GlyphId> {
    let cmap = font.cmap().ok()?;
    cmap.map_codepoint(codepoint).filter(|gid| *gid != GlyphId::NOTDEF)
}
