//! Font file I/O.

use std::{
    fs::{self, File, FileTimes},
    path::Path,
};

use anyhow::{Context, Result, bail};

/// Read font data from a file.
pub fn read_font(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read font: {}", path.display()))
}

/// Write font data to a file, replacing any existing file.
pub fn write_font(path: &Path, data: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, data).with_context(|| format!("Failed to write font: {}", path.display()))
}

/// Copy a font file byte-for-byte, keeping permissions and timestamps.
///
/// Timestamps are best-effort: failing to set them only logs a warning.
/// Copying a file onto itself is an error.
pub fn copy_font(input: &Path, output: &Path) -> Result<()> {
    if same_file(input, output) {
        bail!("{} and {} are the same file", input.display(), output.display());
    }

    fs::copy(input, output).with_context(|| {
        format!("Failed to copy {} to {}", input.display(), output.display())
    })?;

    if let Err(e) = copy_times(input, output) {
        log::warn!("Could not preserve timestamps on {}: {e:#}", output.display());
    }
    Ok(())
}

fn copy_times(input: &Path, output: &Path) -> Result<()> {
    let metadata = fs::metadata(input)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    File::open(output)?.set_times(times)?;
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
