//! CLI definitions.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueHint};
use clap_complete::engine::{ArgValueCompleter, PathCompleter};
use patch_font_core::{PatchOutcome, PatchRequest, Result, patch_font};

#[derive(Debug, Parser)]
#[command(name = "patch-font", version)]
#[command(about = "Patch a font by replacing a glyph with an SVG outline.")]
pub struct Cli {
    /// Path to input font (TTF or OTF)
    #[arg(value_hint = ValueHint::FilePath, add = completer(&["ttf", "otf"]))]
    pub input_font: PathBuf,

    /// Unicode codepoint (e.g. 0x2AF8 or 11000)
    #[arg(allow_hyphen_values = true)]
    pub codepoint: String,

    /// Path to SVG file
    #[arg(value_hint = ValueHint::FilePath, add = completer(&["svg"]))]
    pub svg_file: PathBuf,

    /// Path to output patched font (TTF)
    #[arg(value_hint = ValueHint::FilePath, add = completer(&["ttf", "otf"]))]
    pub output_font: PathBuf,
}

/// Complete directories and files with one of `extensions`.
fn completer(extensions: &'static [&'static str]) -> ArgValueCompleter {
    ArgValueCompleter::new(PathCompleter::any().filter(move |path: &Path| {
        path.is_dir() || has_extension(path, extensions)
    }))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

impl Cli {
    pub fn run(self) -> Result<PatchOutcome> {
        let request = PatchRequest::from(self);
        log::debug!("{request:?}");
        patch_font(&request)
    }
}

impl From<Cli> for PatchRequest {
    fn from(cli: Cli) -> Self {
        Self {
            input_font: cli.input_font,
            codepoint: cli.codepoint,
            svg_file: cli.svg_file,
            output_font: cli.output_font,
        }
    }
}
