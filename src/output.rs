//! Writing the deduplicated content back over the original file
use anyhow::{Context, Result};
use log::debug;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// How the original file gets replaced
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum WriteMode {
    /// Truncate the file and write into it. If writing fails partway, the
    /// file is left truncated or partially written.
    #[default]
    InPlace,
    /// Write a temporary file in the same directory, then rename it over the
    /// original. If writing fails, the original is untouched.
    Atomic,
}

/// Replace the contents of the file at `path` with `contents`
pub fn write_back(path: &Path, contents: &[u8], mode: WriteMode) -> Result<()> {
    debug!("writing {} bytes to {} ({:?})", contents.len(), path.display(), mode);
    let written = match mode {
        WriteMode::InPlace => write_in_place(path, contents),
        WriteMode::Atomic => write_atomic(path, contents),
    };
    written.with_context(|| format!("Can't write file: {}", path.display()))
}

fn write_in_place(path: &Path, contents: &[u8]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(contents)?;
    out.flush()?;
    Ok(())
}

/// `NamedTempFile::persist` is a rename, which only works within one file
/// system, so the temporary file goes in `path`'s own directory.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    if let Ok(metadata) = path.metadata() {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}
