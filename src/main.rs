use anyhow::Result;
use dedup_lines::{args, dedup_to, deduplicate_with};
use log::debug;
use std::io;

fn main() -> Result<()> {
    let args = args::parsed();
    env_logger::Builder::new().filter_level(args.log_level).parse_default_env().init();
    debug!("{args:?}");

    if args.options.dry_run {
        dedup_to(&args.file, io::BufWriter::new(io::stdout().lock()))?;
    } else {
        deduplicate_with(&args.file, &args.options)?;
    }
    Ok(())
}
