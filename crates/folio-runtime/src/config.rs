//! Carousel session configuration

use std::time::Duration;

use folio_core::{interval_from_secs, FolioError, FolioResult};
use serde::{Deserialize, Serialize};

/// Carousel session configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Quiet period after an interaction before auto-advance resumes (ms)
    pub quiet_period_ms: u64,
    /// Capacity of the session command channel
    pub command_buffer: usize,
    /// Overrides the provider's swipe interval when set. `0.0` disables
    /// auto-advance.
    pub swipe_interval_secs: Option<f64>,
    /// Overrides the provider's cyclic flag when set
    pub cyclic: Option<bool>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            quiet_period_ms: 500,
            command_buffer: 64,
            swipe_interval_secs: None,
            cyclic: None,
        }
    }
}

impl CarouselConfig {
    /// Manual navigation only: auto-advance is forced off whatever the
    /// provider says
    pub fn manual() -> Self {
        CarouselConfig {
            swipe_interval_secs: Some(0.0),
            ..Default::default()
        }
    }

    pub fn with_swipe_interval(mut self, secs: f64) -> Self {
        self.swipe_interval_secs = Some(secs);
        self
    }

    pub fn with_cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = Some(cyclic);
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period_ms = u64::try_from(quiet_period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Interval override, if any. `Some(None)` means "forced off".
    pub fn swipe_interval_override(&self) -> Option<Option<Duration>> {
        self.swipe_interval_secs.map(interval_from_secs)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> FolioResult<Self> {
        let config: CarouselConfig =
            serde_json::from_str(json).map_err(|e| FolioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FolioResult<()> {
        if self.command_buffer == 0 {
            return Err(FolioError::InvalidConfig(
                "command_buffer must be positive".into(),
            ));
        }
        if self.quiet_period_ms == 0 {
            return Err(FolioError::InvalidConfig(
                "quiet_period_ms must be positive".into(),
            ));
        }
        if let Some(secs) = self.swipe_interval_secs {
            if !secs.is_finite() || secs < 0.0 {
                return Err(FolioError::InvalidInterval(secs));
            }
        }
        Ok(())
    }
}
