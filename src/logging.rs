//! Logging setup
//!
//! The library only emits `tracing` events. Hosts that want them on stderr can
//! call [`init`]; `RUST_LOG` takes precedence over the level passed in.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AnalyticsError;

/// Default filter when neither `RUST_LOG` nor a level is given
pub const DEFAULT_LOG_LEVEL: &str = "watch_flux=info";

/// Install a global fmt subscriber writing to stderr
pub fn init(level: Option<&str>) -> Result<(), AnalyticsError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_LOG_LEVEL)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| AnalyticsError::LoggingInit(e.to_string()))?;

    tracing::debug!("Logging initialized");
    Ok(())
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::info!("still logging");
    }

    #[test]
    fn test_init_after_global_subscriber_fails() {
        init_test();
        assert!(matches!(init(Some("debug")), Err(AnalyticsError::LoggingInit(_))));
    }
}
