//! `integrity chunklist inspect` - Print a chunklist's header and chunk table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use integrity_chunklist::{Chunklist, ChunklistHeader};

use super::load_limits;
use crate::cli::commands::report_error;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Chunklist file
    pub chunklist: PathBuf,

    /// JSON file overriding decode limits
    #[arg(long, env = "INTEGRITY_LIMITS")]
    pub limits: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ChunkView {
    index: usize,
    /// Zero means "rest of the payload".
    length: u32,
    sha256: String,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    header: &'a ChunklistHeader,
    signed_region_len: usize,
    chunks: Vec<ChunkView>,
}

pub fn cmd_inspect(args: InspectArgs) -> i32 {
    match run_inspect(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_error(&e, false),
    }
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let limits = load_limits(args.limits.as_deref())?;
    let list = Chunklist::open_with_limits(&args.chunklist, &limits)
        .with_context(|| format!("failed to decode chunklist: {}", args.chunklist.display()))?;

    let report = InspectReport {
        header: list.header(),
        signed_region_len: list.signed_region().len(),
        chunks: list
            .chunks()
            .iter()
            .enumerate()
            .map(|(index, chunk)| ChunkView {
                index,
                length: chunk.length.raw(),
                sha256: hex::encode(chunk.hash),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let header = report.header;
    println!("magic:              {:#010x}", header.magic);
    println!("header size:        {}", header.header_size);
    println!("file version:       {}", header.file_version);
    println!("chunk method:       {}", header.chunk_method);
    println!("signature method:   {}", header.signature_method);
    println!("chunk count:        {}", header.chunk_count);
    println!("chunk table offset: {}", header.chunk_table_offset);
    println!("signature offset:   {}", header.signature_offset);
    for chunk in &report.chunks {
        let length = match chunk.length {
            0 => "rest".to_string(),
            n => n.to_string(),
        };
        println!("  #{:<5} {:>10}  {}", chunk.index, length, chunk.sha256);
    }
    Ok(())
}
