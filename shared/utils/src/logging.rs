use anyhow::Result;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber from the logging section of the
/// configuration. `RUST_LOG` wins over the configured level; the format is
/// either `json` or human-readable plain text, optionally appended to a
/// file instead of stderr.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let json = config.format.as_str() == "json";

    match &config.file_path {
        Some(file_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            if json {
                let layer = fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(file);
                registry.with(layer).init();
            } else {
                let layer = fmt::layer().with_span_events(FmtSpan::CLOSE).with_writer(file);
                registry.with(layer).init();
            }
        }
        None => {
            if json {
                let layer = fmt::layer().json().with_span_events(FmtSpan::CLOSE);
                registry.with(layer).init();
            } else {
                let layer = fmt::layer().with_span_events(FmtSpan::CLOSE);
                registry.with(layer).init();
            }
        }
    }

    tracing::info!(level = %config.level, format = %config.format, "logging initialized");
    Ok(())
}
