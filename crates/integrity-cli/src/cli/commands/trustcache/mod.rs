//! Trust cache commands.

pub mod dump;
pub mod lookup;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum TrustCacheCmd {
    /// Print the header and every entry of a trust cache
    Dump(dump::DumpArgs),

    /// Look up a hash in a trust cache (exit 0 if present, 1 if not)
    Lookup(lookup::LookupArgs),
}

pub fn cmd_trustcache(cmd: TrustCacheCmd) -> i32 {
    match cmd {
        TrustCacheCmd::Dump(args) => dump::cmd_dump(args),
        TrustCacheCmd::Lookup(args) => lookup::cmd_lookup(args),
    }
}
