use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
pub mod exit_codes;

use cli::args::Cli;
use cli::commands::dispatch;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() {
                exit_codes::CONFIG_ERROR
            } else {
                exit_codes::SUCCESS
            };
            std::process::exit(code);
        }
    };
    init_logging(cli.verbose);
    std::process::exit(dispatch(cli));
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
