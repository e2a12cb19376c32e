use clap::{Parser, Subcommand};

use super::commands::{chunklist::ChunklistCmd, keys::KeysCmd, trustcache::TrustCacheCmd};

#[derive(Parser, Debug)]
#[command(
    name = "integrity",
    version,
    about = "Verify payloads against signed chunklists and inspect trust caches"
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Signed chunklist verification and inspection
    #[command(subcommand)]
    Chunklist(ChunklistCmd),

    /// Trust cache inspection and lookup
    #[command(subcommand)]
    Trustcache(TrustCacheCmd),

    /// Trust anchor utilities
    #[command(subcommand)]
    Keys(KeysCmd),
}
