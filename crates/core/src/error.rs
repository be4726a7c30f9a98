//! Error types for font patching.

use std::{path::PathBuf, result};

/// Errors reported by [`patch_font`](crate::patch_font).
///
/// Validation errors are detected before the font is opened. Everything the
/// font editing steps raise is folded into [`Error::Patching`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input font '{}' not found", .0.display())]
    InputFontNotFound(PathBuf),

    #[error("SVG file '{}' not found", .0.display())]
    SvgNotFound(PathBuf),

    #[error("Invalid codepoint '{0}'")]
    InvalidCodepoint(String),

    #[error("Error during font patching: {0:#}")]
    Patching(anyhow::Error),
}

impl Error {
    /// `true` for errors caught before touching the font.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::Patching(_))
    }
}

pub type Result<T> = result::Result<T, Error>;
