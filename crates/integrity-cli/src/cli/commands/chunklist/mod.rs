//! Chunklist commands.

pub mod inspect;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use integrity_chunklist::{DecodeLimits, DecodeLimitsOverrides};

#[derive(Subcommand, Debug)]
pub enum ChunklistCmd {
    /// Verify a payload against its signed chunklist
    Verify(verify::VerifyArgs),

    /// Print the header and chunk table of a chunklist
    Inspect(inspect::InspectArgs),
}

pub fn cmd_chunklist(cmd: ChunklistCmd) -> i32 {
    match cmd {
        ChunklistCmd::Verify(args) => verify::cmd_verify(args),
        ChunklistCmd::Inspect(args) => inspect::cmd_inspect(args),
    }
}

/// Default limits, overridden by the JSON file at `path` if given.
pub(crate) fn load_limits(path: Option<&Path>) -> Result<DecodeLimits> {
    let Some(path) = path else {
        return Ok(DecodeLimits::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read limits file: {}", path.display()))?;
    let overrides = DecodeLimitsOverrides::from_json(&json)
        .with_context(|| format!("failed to parse limits file: {}", path.display()))?;
    Ok(DecodeLimits::default().apply(overrides))
}
