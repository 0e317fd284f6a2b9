//! CLI for the posthog-wasm host
//!
//! Loads the telemetry plugin, creates a client, captures one event and
//! flushes it. With no flags the hardcoded demonstration event is sent;
//! the API key and host come from `POSTHOG_API_KEY` and `POSTHOG_HOST`.

use clap::Parser;
use posthog_wasm_runtime::HostError;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "posthog-wasm")]
#[command(about = "Send a telemetry event through the posthog-wasm plugin", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    capture: commands::capture::CaptureArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.capture.verbose);

    match commands::capture::run(cli.capture) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Forward the plugin's exit status when the failure came from a plugin call
fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<HostError>()
        .map(HostError::exit_code)
        .unwrap_or(1)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
