//! Tracing subscriber setup

use folio_core::{FolioError, FolioResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive, e.g. `info` or `folio_runtime=debug`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            filter: "info".into(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Default config with the filter taken from `RUST_LOG` when set
    pub fn from_env() -> Self {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(filter) if !filter.trim().is_empty() => TelemetryConfig {
                filter,
                ..Default::default()
            },
            _ => Self::default(),
        }
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    fn env_filter(&self) -> FolioResult<EnvFilter> {
        EnvFilter::try_new(&self.filter).map_err(|e| FolioError::Telemetry(e.to_string()))
    }
}

/// Install the global tracing subscriber.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> FolioResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| FolioError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = TelemetryConfig::default();
        assert_eq!(config.filter, "info");
        assert!(!config.json);
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = TelemetryConfig {
            filter: "folio_runtime=notalevel".into(),
            json: false,
        };
        assert!(matches!(config.env_filter(), Err(FolioError::Telemetry(_))));
        assert!(matches!(
            init_tracing(&config),
            Err(FolioError::Telemetry(_))
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig {
            filter: "warn".into(),
            json: true,
        };
        // Another test may already have installed a subscriber
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
