use anyhow::{Result, anyhow};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::AppConfig;

/// Installs the global subscriber on stderr. `RUST_LOG` wins over the
/// configured level; without it only this crate logs below `warn`.
pub fn init(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE);

    Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn default_filter(level: &str) -> String {
    format!("warn,royale_coach={level}")
}
