//! Engine configuration: zoom limits, drag scale, rename rules, layout padding.
//!
//! Every section has `#[serde(default)]` so a `config.json` only needs the
//! keys it overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::layout::lanes::LanePolicy;

/// Zoom limits and step sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Zoom change per unit of wheel delta.
    pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 5.0,
            default: 1.0,
            step: 0.1,
            wheel_sensitivity: 0.001,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, level: f64) -> f64 {
        if level.is_nan() {
            return self.default;
        }
        level.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub pixels_per_day: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            pixels_per_day: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Auto-save delay after the last keystroke.
    pub debounce_ms: u64,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 2000,
            min_len: 1,
            max_len: 100,
        }
    }
}

impl RenameConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Calendar days added before the earliest and after the latest date.
    pub padding_days: u32,
    pub lane_policy: LanePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_days: 2,
            lane_policy: LanePolicy::default(),
        }
    }
}

/// All overridable engine constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom: ZoomConfig,
    pub drag: DragConfig,
    pub rename: RenameConfig,
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Load `config.json` from the OS config directory, falling back to
    /// defaults when it is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("no config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    /// Parse a config file and repair any nonsensical values.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(config.validated())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "timeline-lanes", "TimelineLanes")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Replace values the engine cannot work with by their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        let zoom_ok = self.zoom.min > 0.0
            && self.zoom.min.is_finite()
            && self.zoom.max.is_finite()
            && self.zoom.min <= self.zoom.max;
        if !zoom_ok {
            warn!(min = self.zoom.min, max = self.zoom.max, "invalid zoom range, using defaults");
            self.zoom.min = defaults.zoom.min;
            self.zoom.max = defaults.zoom.max;
        }
        if !(self.zoom.min..=self.zoom.max).contains(&self.zoom.default) {
            warn!(default = self.zoom.default, "default zoom outside range, clamping");
            self.zoom.default = self.zoom.clamp(self.zoom.default);
        }
        if !(self.zoom.step > 0.0 && self.zoom.step.is_finite()) {
            warn!(step = self.zoom.step, "invalid zoom step, using default");
            self.zoom.step = defaults.zoom.step;
        }
        if !self.zoom.wheel_sensitivity.is_finite() {
            self.zoom.wheel_sensitivity = defaults.zoom.wheel_sensitivity;
        }

        if !(self.drag.pixels_per_day > 0.0 && self.drag.pixels_per_day.is_finite()) {
            warn!(
                pixels_per_day = self.drag.pixels_per_day,
                "pixels per day must be positive, using default"
            );
            self.drag.pixels_per_day = defaults.drag.pixels_per_day;
        }

        if self.rename.min_len == 0 {
            warn!("minimum name length of zero allows blank names, using 1");
            self.rename.min_len = 1;
        }
        if self.rename.max_len < self.rename.min_len {
            warn!(
                min_len = self.rename.min_len,
                max_len = self.rename.max_len,
                "max name length below min, raising it"
            );
            self.rename.max_len = self.rename.min_len;
        }

        self
    }
}
