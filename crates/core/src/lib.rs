//! Patch Font Core - replace one glyph outline in a TrueType font with an SVG outline.
//!
//! The [`Font`] handle plays the part of a font editor: open a file, look a
//! glyph up by codepoint, clear it, import outlines into it and generate a
//! new font file. [`patch_font`] drives that sequence for the command line.

mod codepoint;
mod error;
mod font;
mod format;
pub mod io;
mod patch;

pub use codepoint::Codepoint;
pub use error::{Error, Result};
pub use font::{Font, GlyphSlot};
pub use format::OutputFormat;
pub use patch::{PatchOutcome, PatchRequest, patch_font};
pub use patch_font_svg::GlyphSpace;
