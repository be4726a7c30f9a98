//! patch-font CLI library.

pub mod cli;

pub use patch_font_core::{PatchOutcome, PatchRequest, patch_font};
