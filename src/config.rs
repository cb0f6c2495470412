//! # Configuration
//!
//! The binary reads its settings from the command line, falling back to
//! environment variables:
//!
//! | Flag | Variable | Default |
//! |---|---|---|
//! | `--demo` | `REACTIVE_DEMO` | `interval-retry` |
//! | `--period-ms` | `REACTIVE_PERIOD_MS` | `1000` |
//! | `--timeout-ms` | `REACTIVE_TIMEOUT_MS` | none |
//! | `--log-filter` | `RUST_LOG` | `info` |
//!
//! [`Cli`] is the raw parse; [`DemoConfig`] is the validated form the runner
//! works with.

use crate::demos::DemoEnv;
use crate::demos::DemoKind;
use crate::demos::sink::LogSink;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Raw command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "reactive-primer")]
#[command(about = "Runs one reactive-streams demonstration", long_about = None)]
#[command(version)]
pub struct Cli {
  /// Demo to run
  #[arg(long, env = "REACTIVE_DEMO", value_enum, default_value_t = DemoKind::IntervalRetry)]
  pub demo: DemoKind,

  /// Tick period of the timed demos, in milliseconds
  #[arg(long, env = "REACTIVE_PERIOD_MS", default_value_t = 1000)]
  pub period_ms: u64,

  /// Cancel the demo after this many milliseconds
  #[arg(long, env = "REACTIVE_TIMEOUT_MS")]
  pub timeout_ms: Option<u64>,

  /// `tracing` filter directives
  #[arg(long, env = "RUST_LOG", default_value = "info")]
  pub log_filter: String,

  /// Print the available demos and exit
  #[arg(long)]
  pub list: bool,
}

/// Invalid settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  /// The tick period was zero.
  #[error("period must be greater than zero")]
  ZeroPeriod,
  /// The timeout was zero.
  #[error("timeout must be greater than zero")]
  ZeroTimeout,
}

/// Validated runner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
  /// Demo to run.
  pub demo: DemoKind,
  /// Tick period of the timed demos.
  pub period: Duration,
  /// Cancel the demo after this long.
  pub timeout: Option<Duration>,
  /// `tracing` filter directives.
  pub log_filter: String,
}

impl DemoConfig {
  /// Builds the environment the demo runs in, writing to `sink`.
  pub fn env(&self, sink: Arc<dyn LogSink>) -> DemoEnv {
    DemoEnv::new(sink)
      .with_period(self.period)
      .with_timeout(self.timeout)
  }
}

impl TryFrom<Cli> for DemoConfig {
  type Error = ConfigError;

  fn try_from(cli: Cli) -> Result<Self, Self::Error> {
    if cli.period_ms == 0 {
      return Err(ConfigError::ZeroPeriod);
    }
    let timeout = match cli.timeout_ms {
      Some(0) => return Err(ConfigError::ZeroTimeout),
      Some(ms) => Some(Duration::from_millis(ms)),
      None => None,
    };
    Ok(Self {
      demo: cli.demo,
      period: Duration::from_millis(cli.period_ms),
      timeout,
      log_filter: cli.log_filter,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_flags_resolve_into_config() {
    let cli = Cli::try_parse_from([
      "reactive-primer",
      "--demo",
      "zip-with-ranges",
      "--period-ms",
      "250",
      "--timeout-ms",
      "5000",
      "--log-filter",
      "debug",
    ])
    .unwrap();
    let config = DemoConfig::try_from(cli).unwrap();
    assert_eq!(
      config,
      DemoConfig {
        demo: DemoKind::ZipWithRanges,
        period: Duration::from_millis(250),
        timeout: Some(Duration::from_secs(5)),
        log_filter: "debug".to_string(),
      }
    );
  }

  #[test]
  fn test_zero_period_is_rejected() {
    let cli = Cli::try_parse_from(["reactive-primer", "--period-ms", "0"]).unwrap();
    assert_eq!(DemoConfig::try_from(cli), Err(ConfigError::ZeroPeriod));
  }

  #[test]
  fn test_zero_timeout_is_rejected() {
    let cli = Cli::try_parse_from(["reactive-primer", "--timeout-ms", "0"]).unwrap();
    assert_eq!(DemoConfig::try_from(cli), Err(ConfigError::ZeroTimeout));
  }

  #[test]
  fn test_unknown_demo_is_a_parse_error() {
    assert!(Cli::try_parse_from(["reactive-primer", "--demo", "nope"]).is_err());
  }

  #[test]
  fn test_env_carries_period() {
    let config = DemoConfig {
      demo: DemoKind::Interval,
      period: Duration::from_millis(10),
      timeout: None,
      log_filter: "info".to_string(),
    };
    let env = config.env(Arc::new(crate::demos::sink::MemorySink::new()));
    assert_eq!(env.period(), Duration::from_millis(10));
  }
}
