//! `integrity trustcache dump` - Print a trust cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use integrity_trustcache::TrustCache;

use crate::cli::commands::report_error;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Trust cache file
    pub file: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_dump(args: DumpArgs) -> i32 {
    match run_dump(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_error(&e, false),
    }
}

fn run_dump(args: &DumpArgs) -> Result<()> {
    let cache = TrustCache::open(&args.file)
        .with_context(|| format!("failed to decode trust cache: {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cache)?);
        return Ok(());
    }

    println!("version: {}", cache.version().raw());
    println!("uuid:    {}", cache.uuid());
    println!("entries: {}", cache.len());
    for entry in cache.entries() {
        println!(
            "{}  type={} flags={:#04x}",
            hex::encode(entry.digest()),
            entry.hash_type(),
            entry.flags()
        );
    }
    Ok(())
}
