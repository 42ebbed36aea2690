//! The `deduplicate_with` function is the kernel of the application. The `args`
//! module parses the command line, `operand` reads the file, `set` holds its
//! unique lines and `output` writes them back.
//!
//! A "line" is zero or more bytes followed by `\n`, `\r\n` or `\r`, or the
//! non-empty remainder at the end of the file. The three terminators count as
//! one, so `"a\n"` and `"a\r\n"` are the same line, and every line is written
//! back ending in `\n`. Lines are written back in the order of their first
//! occurrence. The file must be UTF-8 or UTF-16; anything else is an error
//! and the file is left untouched.

#![deny(unused_must_use)]
#![deny(clippy::all)]
#![allow(clippy::needless_return)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![deny(missing_docs)]

use anyhow::Result;
use log::info;
use std::io;
use std::path::Path;

pub mod args;
pub mod operand;
pub mod output;
pub mod set;
#[cfg(test)]
mod testing;

use crate::operand::read_operand;
use crate::output::{write_back, WriteMode};
use crate::set::LineSet;

/// The file deduplicated when none is named on the command line
pub const DEFAULT_PATH: &str = "user-claims.txt";

/// Settings for `deduplicate_with`
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct Options {
    /// How to replace the original file
    pub write_mode: WriteMode,
    /// If true, nothing is written
    pub dry_run: bool,
}

/// What `deduplicate_with` found
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Summary {
    /// Lines in the original file, duplicates included
    pub lines_read: usize,
    /// Distinct lines, which is the number of lines now in the file
    pub unique_lines: usize,
}

impl Summary {
    /// How many lines were dropped
    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.lines_read.saturating_sub(self.unique_lines)
    }
}

impl From<&LineSet<'_>> for Summary {
    fn from(set: &LineSet<'_>) -> Self {
        Summary { lines_read: set.lines_read(), unique_lines: set.len() }
    }
}

/// Removes duplicate lines from the file at `path`, overwriting it in place.
/// If the file can't be read, nothing is written.
pub fn deduplicate(path: &Path) -> Result<Summary> {
    deduplicate_with(path, &Options::default())
}

/// Removes duplicate lines from the file at `path`, replacing the file as
/// `options.write_mode` says, or not at all if `options.dry_run` is set.
pub fn deduplicate_with(path: &Path, options: &Options) -> Result<Summary> {
    let (contents, summary) = deduplicated(path)?;
    if !options.dry_run {
        write_back(path, &contents, options.write_mode)?;
    }
    Ok(summary)
}

/// Writes the deduplicated contents of the file at `path` to `out`, leaving
/// the file alone. The output is in the file's own encoding.
pub fn dedup_to(path: &Path, mut out: impl io::Write) -> Result<Summary> {
    let (contents, summary) = deduplicated(path)?;
    out.write_all(&contents)?;
    out.flush()?;
    Ok(summary)
}

/// Reads the file at `path` and returns its unique lines, encoded the way the
/// file was. Nothing is written.
fn deduplicated(path: &Path) -> Result<(Vec<u8>, Summary)> {
    let operand = read_operand(path)?;
    let set = LineSet::from_slice(&operand.bytes);
    let summary = Summary::from(&set);
    info!(
        "{}: {} lines read, {} unique, {} duplicates",
        path.display(),
        summary.lines_read,
        summary.unique_lines,
        summary.duplicates_removed()
    );

    let mut unique = Vec::with_capacity(operand.bytes.len());
    set.output_to(&mut unique)?;
    Ok((operand.encoding.encode(&unique)?, summary))
}
