//! Logging initialization.
//!
//! - `MARKETSCOUT_LOG_FORMAT=json`: structured JSON lines
//! - otherwise: human-readable, colored when stderr is a terminal
//!
//! Level filtering follows `RUST_LOG` and defaults to `info`. Logs go to
//! stderr so report paths printed on stdout stay pipeable.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "MARKETSCOUT_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_logging() {
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    match format {
        LogFormat::Json => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init();
        }
        LogFormat::Pretty => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_writer(std::io::stderr),
                )
                .try_init();
        }
    }
}
