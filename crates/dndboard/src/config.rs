#![forbid(unsafe_code)]

//! Tunable board parameters.
//!
//! Groups hit-test hysteresis, measurement bounds, and autoscroll behaviour
//! into a single [`BoardConfig`] that can be loaded from TOML or JSON.
//!
//! ```toml
//! [hit_test]
//! column_threshold = 35.0
//!
//! [measure]
//! timeout_ms = 300
//!
//! [autoscroll]
//! x_threshold = 50.0
//! step = 8.0
//! drag_speed_factor = 1.0
//! ```
//!
//! Missing sections and fields fall back to the defaults above.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level BoardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub hit_test: HitTestConfig,
    pub measure: MeasureConfig,
    pub autoscroll: AutoScrollConfig,
}

impl BoardConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.hit_test.column_threshold >= 0.0) {
            errors.push(format!(
                "hit_test.column_threshold must be >= 0, got {}",
                self.hit_test.column_threshold
            ));
        }

        if self.measure.timeout_ms == 0 {
            errors.push("measure.timeout_ms must be > 0".into());
        }

        if !(self.autoscroll.x_threshold >= 0.0) {
            errors.push(format!(
                "autoscroll.x_threshold must be >= 0, got {}",
                self.autoscroll.x_threshold
            ));
        }
        if !(self.autoscroll.step > 0.0) {
            errors.push(format!(
                "autoscroll.step must be > 0, got {}",
                self.autoscroll.step
            ));
        }
        if !(self.autoscroll.drag_speed_factor > 0.0) {
            errors.push(format!(
                "autoscroll.drag_speed_factor must be > 0, got {}",
                self.autoscroll.drag_speed_factor
            ));
        }

        errors
    }

    /// Return `self` if valid, otherwise every problem at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Vertical slack added above and below each column when hit testing.
    pub column_threshold: f32,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            column_threshold: 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Upper bound on a pending layout measurement.
    pub timeout_ms: u64,
}

impl MeasureConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self { timeout_ms: 300 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Distance from the left/right viewport edge that triggers a scroll.
    pub x_threshold: f32,
    /// Offset change per tick while the pointer stays near an edge.
    pub step: f32,
    pub drag_speed_factor: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            x_threshold: 50.0,
            step: 8.0,
            drag_speed_factor: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
