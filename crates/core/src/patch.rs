//! The patch command: swap one glyph's outline for an SVG outline.

use std::path::{Path, PathBuf};

use read_fonts::types::GlyphId;

use crate::{Codepoint, Error, Font, Result, io::copy_font};

/// Inputs of one patch run, as given on the command line.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub input_font: PathBuf,
    pub codepoint: String,
    pub svg_file: PathBuf,
    pub output_font: PathBuf,
}

/// What a successful patch run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The font has no glyph for the codepoint; the input was copied unchanged.
    Copied,
    /// The glyph was replaced and a new font generated.
    Patched { glyph_id: GlyphId },
}

/// Replace the outline of the glyph for `request.codepoint` with the SVG outline.
///
/// Inputs are validated before the font is opened. A font without a glyph
/// for the codepoint is copied to the output unchanged, so the output file
/// always exists after a successful run.
pub fn patch_font(request: &PatchRequest) -> Result<PatchOutcome> {
    let PatchRequest { input_font, codepoint, svg_file, output_font } = request;

    if !input_font.exists() {
        return Err(Error::InputFontNotFound(input_font.clone()));
    }
    if !svg_file.exists() {
        return Err(Error::SvgNotFound(svg_file.clone()));
    }

    let codepoint: Codepoint = codepoint.parse()?;
    println!("Looking for glyph at codepoint: {codepoint}");

    replace_outline(input_font, codepoint, svg_file, output_font).map_err(Error::Patching)
}

fn replace_outline(
    input_font: &Path,
    codepoint: Codepoint,
    svg_file: &Path,
    output_font: &Path,
) -> anyhow::Result<PatchOutcome> {
    println!("Opening font: {}", input_font.display());
    let mut font = Font::open(input_font)?;

    let Some(mut glyph) = font.glyph(codepoint) else {
        println!("Glyph at codepoint {codepoint} not found in font. Copying original font unchanged.");
        copy_font(input_font, output_font)?;
        return Ok(PatchOutcome::Copied);
    };
    let glyph_id = glyph.id();

    println!("Found existing glyph at codepoint {}, patching...", codepoint.to_u32());
    glyph.clear();
    println!("Importing SVG: {}", svg_file.display());
    glyph.import_outlines(svg_file)?;

    println!("Generating patched font: {}", output_font.display());
    font.generate(output_font)?;
    println!("Font patching completed successfully!");

    Ok(PatchOutcome::Patched { glyph_id })
}
