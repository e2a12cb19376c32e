//! `integrity chunklist verify` - Verify a payload against its chunklist.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use integrity_chunklist::{Chunklist, TrustAnchors, VerifySummary};

use super::load_limits;
use crate::cli::commands::report_error;
use crate::exit_codes;

const CHUNKLIST_EXTENSION: &str = "chunklist";

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Payload file to verify
    pub target: PathBuf,

    /// Chunklist file [default: target path with a .chunklist extension]
    #[arg(long)]
    pub chunklist: Option<PathBuf>,

    /// PEM file with one or more trusted RSA public keys
    #[arg(long, env = "INTEGRITY_KEYS", default_value = "keys.pem")]
    pub keys: PathBuf,

    /// JSON file overriding decode limits
    #[arg(long, env = "INTEGRITY_LIMITS")]
    pub limits: Option<PathBuf>,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn cmd_verify(args: VerifyArgs) -> i32 {
    match run_verify(&args) {
        Ok(summary) => {
            if !args.quiet {
                println!(
                    "OK: {} chunks, {} bytes verified (key {})",
                    summary.chunks_verified, summary.bytes_hashed, summary.anchor_id
                );
            }
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e, args.quiet),
    }
}

fn run_verify(args: &VerifyArgs) -> Result<VerifySummary> {
    let chunklist_path = match &args.chunklist {
        Some(path) => path.clone(),
        None => default_chunklist_path(&args.target)?,
    };
    let limits = load_limits(args.limits.as_deref())?;

    let anchors = TrustAnchors::from_pem_file(&args.keys)
        .with_context(|| format!("failed to load trust anchors: {}", args.keys.display()))?;
    let list = Chunklist::open_with_limits(&chunklist_path, &limits)
        .with_context(|| format!("failed to decode chunklist: {}", chunklist_path.display()))?;

    let file = File::open(&args.target)
        .with_context(|| format!("failed to open target: {}", args.target.display()))?;
    let mut target = BufReader::new(file);

    tracing::debug!(
        payload = %args.target.display(),
        chunklist = %chunklist_path.display(),
        anchors = anchors.len(),
        "verifying"
    );
    Ok(list.verify_with_limits(&mut target, &anchors, &limits)?)
}

/// Replace the target's extension with `.chunklist`.
fn default_chunklist_path(target: &Path) -> Result<PathBuf> {
    if target
        .extension()
        .is_some_and(|ext| ext == CHUNKLIST_EXTENSION)
    {
        bail!(
            "target {} is itself a chunklist; pass the payload file",
            target.display()
        );
    }
    Ok(target.with_extension(CHUNKLIST_EXTENSION))
}
