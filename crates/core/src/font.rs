//! An open font with pending glyph edits.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use kurbo::BezPath;
use patch_font_ops::{GlyphEdits, glyph_for_codepoint, glyph_from_path, replace_glyphs, rewrite_font};
use patch_font_svg::{GlyphSpace, import_file};
use read_fonts::{FontRef, TableProvider, types::GlyphId};

use crate::{
    Codepoint, OutputFormat,
    io::{read_font, write_font},
};

/// A font opened for editing.
///
/// Holds the original file bytes; edits stay in memory until
/// [`generate`](Font::generate) writes a new file. The handle is released
/// when dropped.
#[derive(Debug)]
pub struct Font {
    path: PathBuf,
    data: Vec<u8>,
    edits: BTreeMap<GlyphId, BezPath>,
}

impl Font {
    /// Open a font file. Fails if the file cannot be read or is not an sfnt.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = read_font(path)?;
        FontRef::new(&data).with_context(|| format!("Failed to parse font: {}", path.display()))?;
        log::debug!("Opened font {} ({} bytes)", path.display(), data.len());

        Ok(Self { path: path.to_path_buf(), data, edits: BTreeMap::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn font_ref(&self) -> Result<FontRef<'_>> {
        FontRef::new(&self.data).context("Failed to parse font")
    }

    /// The glyph the cmap assigns to `codepoint`, ignoring `.notdef`.
    pub fn glyph_id(&self, codepoint: Codepoint) -> Option<GlyphId> {
        let font = self.font_ref().ok()?;
        glyph_for_codepoint(&font, codepoint.to_u32())
    }

    /// Whether the font has a glyph for `codepoint`.
    pub fn contains(&self, codepoint: Codepoint) -> bool {
        self.glyph_id(codepoint).is_some()
    }

    /// The glyph for `codepoint`, if the font has one.
    pub fn glyph(&mut self, codepoint: Codepoint) -> Option<GlyphSlot<'_>> {
        let id = self.glyph_id(codepoint)?;
        Some(GlyphSlot { font: self, id })
    }

    /// The em square SVG outlines are mapped onto.
    pub fn glyph_space(&self) -> Result<GlyphSpace> {
        let font = self.font_ref()?;
        let units_per_em = font.head().context("Failed to read head table")?.units_per_em();
        let descender = font.hhea().context("Failed to read hhea table")?.descender().to_i16();
        Ok(GlyphSpace::new(units_per_em, descender))
    }

    /// Write the font, with all pending edits applied, to `path`.
    ///
    /// The format is chosen from the file extension.
    pub fn generate(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;

        let edits = self
            .edits
            .iter()
            .map(|(id, outline)| -> Result<_> {
                let glyph = glyph_from_path(outline)
                    .with_context(|| format!("Failed to compile glyph {}", id.to_u32()))?;
                Ok((*id, glyph))
            })
            .collect::<Result<GlyphEdits>>()?;

        let data = rewrite_font(&self.data, |font, builder| {
            if edits.is_empty() {
                return Ok(());
            }
            replace_glyphs(font, builder, &edits)
        })?;

        write_font(path, &data)?;
        log::info!("Generated {format} font {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}

impl Drop for Font {
    fn drop(&mut self) {
        log::debug!("Closing font {}", self.path.display());
    }
}

/// A glyph of an open [`Font`], borrowed for editing.
#[derive(Debug)]
pub struct GlyphSlot<'a> {
    font: &'a mut Font,
    id: GlyphId,
}

impl GlyphSlot<'_> {
    pub fn id(&self) -> GlyphId {
        self.id
    }

    /// Remove every contour from the glyph.
    pub fn clear(&mut self) {
        self.font.edits.insert(self.id, BezPath::new());
    }

    /// Add the outlines of an SVG file to the glyph.
    ///
    /// The glyph's original outline is not kept: the first edit of a glyph
    /// starts from an empty outline.
    pub fn import_outlines(&mut self, svg: impl AsRef<Path>) -> Result<()> {
        let space = self.font.glyph_space()?;
        let outline = import_file(svg.as_ref(), space)?;
        log::debug!(
            "Imported {} path elements into glyph {}",
            outline.elements().len(),
            self.id.to_u32()
        );
        self.font.edits.entry(self.id).or_default().extend(outline);
        Ok(())
    }
}
