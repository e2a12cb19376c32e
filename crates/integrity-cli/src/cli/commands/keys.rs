//! Trust anchor utilities.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use integrity_chunklist::TrustAnchors;

use crate::cli::commands::report_error;
use crate::exit_codes;

#[derive(Subcommand, Debug)]
pub enum KeysCmd {
    /// Convert a raw kernel key table to PEM public keys
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Key table file: per key a 4-byte header word and a 256-byte big-endian modulus
    pub table: PathBuf,
}

pub fn cmd_keys(cmd: KeysCmd) -> i32 {
    match cmd {
        KeysCmd::Export(args) => match run_export(&args) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => report_error(&e, false),
        },
    }
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let table = std::fs::read(&args.table)
        .with_context(|| format!("failed to read key table: {}", args.table.display()))?;
    let anchors = TrustAnchors::from_key_table(&table)
        .with_context(|| format!("failed to decode key table: {}", args.table.display()))?;

    for anchor in anchors.iter() {
        tracing::debug!(key_id = %anchor.key_id(), "exporting key");
        print!("{}", anchor.to_pem()?);
    }
    Ok(())
}
