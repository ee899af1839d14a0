use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Initialize tracing and logging
///
/// Logs go to stderr so that rendered output on stdout stays clean.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_observability(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_filter(env_filter),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr)
                        .with_filter(env_filter),
                )
                .try_init()?;
        }
    }

    tracing::debug!(log_level, format = format.as_ref(), "Observability initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_init_once() {
        let first = init_observability("debug", LogFormat::Pretty);
        assert!(first.is_ok(), "first init should succeed: {:?}", first.err());

        // A global subscriber is already installed
        assert!(init_observability("info", LogFormat::Json).is_err());
    }
}
