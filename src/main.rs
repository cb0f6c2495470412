//! Demo runner: picks one demonstration from the command line or the
//! environment, runs it to termination and reports the outcome through the
//! exit code.

use anyhow::{Context, Result};
use clap::Parser;
use reactive_primer::config::{Cli, DemoConfig};
use reactive_primer::demos::sink::TracingSink;
use reactive_primer::demos::{self, DemoKind};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  if cli.list {
    for kind in DemoKind::ALL {
      println!("{kind}");
    }
    return Ok(ExitCode::SUCCESS);
  }

  let config = DemoConfig::try_from(cli).context("Invalid configuration")?;

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_target(false)
    .init();

  let env = config.env(Arc::new(TracingSink));
  match demos::run(config.demo, &env).await {
    Ok(()) => {
      info!(demo = %config.demo, "demo completed");
      Ok(ExitCode::SUCCESS)
    }
    Err(err) => {
      error!(demo = %config.demo, error = %err, "demo failed");
      Ok(ExitCode::FAILURE)
    }
  }
}
