//! Editor configuration: zoom bounds and polling cadence.
//!
//! Defaults match the shipped editor. Hosts that run natively may override
//! them through `FLOORPLAN_*` environment variables via [`EditorConfig::from_env`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts::{
    DEFAULT_DOTS_INTERVAL_MS, DEFAULT_INITIAL_SCALE, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_ZOOM_STEP,
};
use crate::viewport::ScaleLimits;

/// Tuning knobs for the viewport and the job poller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Scale applied on load and on view reset.
    pub initial_scale: f64,
    /// Lower zoom bound.
    pub min_scale: f64,
    /// Upper zoom bound.
    pub max_scale: f64,
    /// Scale added or removed per zoom step.
    pub zoom_step: f64,
    /// Interval between job status requests, in milliseconds.
    pub poll_interval_ms: u64,
    /// Progress indicator cadence, in milliseconds.
    pub dots_interval_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_scale: DEFAULT_INITIAL_SCALE,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            dots_interval_ms: DEFAULT_DOTS_INTERVAL_MS,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `FLOORPLAN_INITIAL_SCALE`: default 1.5
    /// - `FLOORPLAN_MIN_SCALE`: default 0.2
    /// - `FLOORPLAN_MAX_SCALE`: default 8
    /// - `FLOORPLAN_ZOOM_STEP`: default 0.1
    /// - `FLOORPLAN_POLL_INTERVAL_MS`: default 3000
    /// - `FLOORPLAN_DOTS_INTERVAL_MS`: default 500
    ///
    /// Unparseable or out-of-range values are replaced by their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            initial_scale: env_parse("FLOORPLAN_INITIAL_SCALE", defaults.initial_scale),
            min_scale: env_parse("FLOORPLAN_MIN_SCALE", defaults.min_scale),
            max_scale: env_parse("FLOORPLAN_MAX_SCALE", defaults.max_scale),
            zoom_step: env_parse("FLOORPLAN_ZOOM_STEP", defaults.zoom_step),
            poll_interval_ms: env_parse("FLOORPLAN_POLL_INTERVAL_MS", defaults.poll_interval_ms),
            dots_interval_ms: env_parse("FLOORPLAN_DOTS_INTERVAL_MS", defaults.dots_interval_ms),
        };
        config.sanitized()
    }

    /// Replace values that would break the viewport or poller with defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let limits_valid = self.min_scale.is_finite()
            && self.max_scale.is_finite()
            && self.min_scale > 0.0
            && self.min_scale <= self.max_scale;
        let (min_scale, max_scale) = if limits_valid {
            (self.min_scale, self.max_scale)
        } else {
            (defaults.min_scale, defaults.max_scale)
        };
        let initial_scale = if self.initial_scale.is_finite() && self.initial_scale > 0.0 {
            self.initial_scale.clamp(min_scale, max_scale)
        } else {
            defaults.initial_scale.clamp(min_scale, max_scale)
        };
        let zoom_step = if self.zoom_step.is_finite() && self.zoom_step > 0.0 {
            self.zoom_step
        } else {
            defaults.zoom_step
        };
        Self {
            initial_scale,
            min_scale,
            max_scale,
            zoom_step,
            poll_interval_ms: self.poll_interval_ms.max(1),
            dots_interval_ms: self.dots_interval_ms.max(1),
        }
    }

    /// Zoom bounds as a [`ScaleLimits`].
    #[must_use]
    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits::new(self.min_scale, self.max_scale)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn dots_interval(&self) -> Duration {
        Duration::from_millis(self.dots_interval_ms)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
