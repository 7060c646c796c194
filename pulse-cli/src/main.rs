use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pulse_agent::AgentSupervisor;
use pulse_core::{logging, AgentConfig};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Pulse - multi-tenant telemetry emitter", long_about = None)]
struct Cli {
    /// Path to the agent configuration file
    #[arg(long, env = "PULSE_CONFIG", default_value = "config.yaml")]
    config: PathBuf,
    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_tracing(Some(&cli.log_level)) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    // A configuration the process cannot fully honour aborts startup before
    // any client runner exists.
    let config = match AgentConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!(path = %cli.config.display(), error = %err, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let supervisor = AgentSupervisor::default();
    let handle = match supervisor.start(&config) {
        Ok(handle) => handle,
        Err(err) => {
            error!(error = %err, "failed to start client runners");
            return ExitCode::FAILURE;
        }
    };

    info!(clients = handle.client_count(), "pulse agent running");

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }

    info!("shutdown requested");
    handle.shutdown().await;

    ExitCode::SUCCESS
}
