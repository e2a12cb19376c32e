pub mod chunklist;
pub mod keys;
pub mod trustcache;

use integrity_chunklist::{ChunklistError, VerifyFailures};
use integrity_trustcache::TrustCacheError;

use super::args::{Cli, Command};
use crate::exit_codes;

pub fn dispatch(cli: Cli) -> i32 {
    match cli.cmd {
        Command::Chunklist(cmd) => chunklist::cmd_chunklist(cmd),
        Command::Trustcache(cmd) => trustcache::cmd_trustcache(cmd),
        Command::Keys(cmd) => keys::cmd_keys(cmd),
    }
}

/// Pick the exit code for a failed command from the innermost library error.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(failures) = err.downcast_ref::<VerifyFailures>() {
        failures.exit_code()
    } else if let Some(e) = err.downcast_ref::<ChunklistError>() {
        e.exit_code()
    } else if let Some(e) = err.downcast_ref::<TrustCacheError>() {
        e.exit_code()
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        exit_codes::IO_ERROR
    } else {
        exit_codes::CONFIG_ERROR
    }
}

/// Report `err` on stderr unless `quiet`, and return its exit code.
pub(crate) fn report_error(err: &anyhow::Error, quiet: bool) -> i32 {
    if !quiet {
        if let Some(failures) = err.downcast_ref::<VerifyFailures>() {
            for failure in failures {
                eprintln!("error: {failure}");
            }
        } else {
            eprintln!("error: {err:#}");
        }
    }
    exit_code_for(err)
}
