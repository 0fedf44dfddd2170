use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod display;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    init_logging(cli.verbose);

    let ctx = display::Context::detect().with_quiet(cli.command.quiet());

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`; without either only
/// warnings are shown.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
