//! `integrity trustcache lookup` - Check whether a hash is trusted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use integrity_core::{HashAlgorithm, TypedHash};
use integrity_trustcache::TrustCache;

use crate::cli::commands::report_error;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Trust cache file
    pub file: PathBuf,

    /// Hex digest to look up, optionally prefixed with `<algorithm>:`
    pub hash: String,

    /// Digest algorithm: sha1, sha256, sha256-truncated or sha384
    #[arg(long, default_value = "sha256")]
    pub algorithm: HashAlgorithm,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn cmd_lookup(args: LookupArgs) -> i32 {
    match run_lookup(&args) {
        Ok(Some(index)) => {
            if !args.quiet {
                println!("found: entry {index}");
            }
            exit_codes::SUCCESS
        }
        Ok(None) => {
            if !args.quiet {
                println!("not found");
            }
            exit_codes::NOT_FOUND
        }
        Err(e) => report_error(&e, args.quiet),
    }
}

fn run_lookup(args: &LookupArgs) -> Result<Option<usize>> {
    let needle = TypedHash::from_hex(args.algorithm, &args.hash)
        .with_context(|| format!("invalid {} digest: {}", args.algorithm, args.hash))?;
    let cache = TrustCache::open(&args.file)
        .with_context(|| format!("failed to decode trust cache: {}", args.file.display()))?;

    Ok(cache.find(&needle).map(|(index, _)| index))
}
