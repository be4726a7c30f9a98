use std::{ffi::OsStr, fmt, path::Path};

use anyhow::{Result, bail};

/// Font file format, selected from the output file extension.
///
/// Both formats are written as an sfnt with TrueType (glyf) outlines; an
/// `.otf` file with glyf outlines is valid OpenType.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    TrueType,
    OpenType,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(OsStr::to_str).map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ttf") => Ok(Self::TrueType),
            Some("otf") => Ok(Self::OpenType),
            Some(other) => bail!("Unsupported output format '.{other}' (expected .ttf or .otf)"),
            None => bail!(
                "Cannot infer output format from '{}' (expected a .ttf or .otf extension)",
                path.display()
            ),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TrueType => "TrueType",
            Self::OpenType => "OpenType",
        })
    }
}
