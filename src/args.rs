//! Code to parse the command line using `clap`, and definitions of the parsed
//! result

use crate::output::WriteMode;
use crate::{Options, DEFAULT_PATH};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Returns the parsed command line
#[must_use]
pub fn parsed() -> Args {
    Args::from(CliArgs::parse())
}

/// The parsed command line
#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    /// `file` is the file to deduplicate
    pub file: PathBuf,
    /// `options` says how to write the result
    pub options: Options,
    /// `log_level` is the default log level, used unless `RUST_LOG` is set
    pub log_level: LevelFilter,
}

#[derive(Debug, Parser)]
#[command(name = "dedup", version)]
/// Remove duplicate lines from a file, rewriting it in place. Each distinct
/// line is kept once, in the order it first appears.
struct CliArgs {
    #[arg(default_value = DEFAULT_PATH)]
    /// The file to deduplicate
    file: PathBuf,
    #[arg(long)]
    /// Write to a temporary file, then rename it over the original
    atomic: bool,
    #[arg(long, short = 'n')]
    /// Print the deduplicated lines instead of rewriting the file
    dry_run: bool,
    #[arg(long, short, action = ArgAction::Count)]
    /// Report what was done (-v), or more (-vv)
    verbose: u8,
}

impl From<CliArgs> for Args {
    fn from(parsed: CliArgs) -> Self {
        let write_mode = if parsed.atomic { WriteMode::Atomic } else { WriteMode::InPlace };
        let log_level = match parsed.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Args {
            file: parsed.file,
            options: Options { write_mode, dry_run: parsed.dry_run },
            log_level,
        }
    }
}
