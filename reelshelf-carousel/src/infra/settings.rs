//! Carousel settings
//!
//! Loaded from `<config_dir>/reelshelf/carousel.json` when present, then
//! overridden by `REELSHELF_CAROUSEL_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::carousel::auto_advance::AdvanceDirection;
use crate::carousel::transition::Easing;
use crate::infra::constants::carousel::{
    auto_advance, layout, paging, visibility,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse carousel settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value '{value}' for {key}")]
    Override { key: &'static str, value: String },

    #[error("invalid carousel settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAdvanceSettings {
    pub interval_ms: u64,
    pub step: f32,
    pub direction: AdvanceDirection,
}

impl Default for AutoAdvanceSettings {
    fn default() -> Self {
        Self {
            interval_ms: auto_advance::TICK_MS,
            step: auto_advance::STEP,
            direction: AdvanceDirection::Forward,
        }
    }
}

impl AutoAdvanceSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    /// Item width plus spacing.
    pub stride: f32,
    pub overscan: usize,
    pub page_fraction: f32,
    pub transition_ms: u64,
    pub frame_ms: u64,
    pub easing: Easing,
    pub edge_tolerance: f32,
    pub auto_advance: AutoAdvanceSettings,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            stride: layout::ITEM_STRIDE,
            overscan: layout::OVERSCAN_ITEMS,
            page_fraction: paging::PAGE_FRACTION,
            transition_ms: paging::TRANSITION_MS,
            frame_ms: paging::FRAME_MS,
            easing: Easing::EaseOut,
            edge_tolerance: visibility::EDGE_TOLERANCE,
            auto_advance: AutoAdvanceSettings::default(),
        }
    }
}

impl CarouselSettings {
    pub const ENV_STRIDE: &'static str = "REELSHELF_CAROUSEL_STRIDE";
    pub const ENV_TRANSITION_MS: &'static str =
        "REELSHELF_CAROUSEL_TRANSITION_MS";
    pub const ENV_AUTO_ADVANCE_INTERVAL_MS: &'static str =
        "REELSHELF_CAROUSEL_AUTO_ADVANCE_INTERVAL_MS";
    pub const ENV_AUTO_ADVANCE_STEP: &'static str =
        "REELSHELF_CAROUSEL_AUTO_ADVANCE_STEP";
    pub const ENV_AUTO_ADVANCE_DIRECTION: &'static str =
        "REELSHELF_CAROUSEL_AUTO_ADVANCE_DIRECTION";

    /// Default settings file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("reelshelf").join("carousel.json"))
    }

    /// Settings file (when present) plus environment overrides, validated.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path)?,
            _ => Self::default(),
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_json_str(&content)?;
        log::debug!("Loaded carousel settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `REELSHELF_CAROUSEL_*` overrides using `lookup` as the
    /// environment.
    pub fn apply_env_overrides<F>(
        &mut self,
        lookup: F,
    ) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(Self::ENV_STRIDE) {
            self.stride = parse_override(Self::ENV_STRIDE, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_TRANSITION_MS) {
            self.transition_ms =
                parse_override(Self::ENV_TRANSITION_MS, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_AUTO_ADVANCE_INTERVAL_MS) {
            self.auto_advance.interval_ms =
                parse_override(Self::ENV_AUTO_ADVANCE_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_AUTO_ADVANCE_STEP) {
            self.auto_advance.step =
                parse_override(Self::ENV_AUTO_ADVANCE_STEP, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_AUTO_ADVANCE_DIRECTION) {
            self.auto_advance.direction =
                parse_override(Self::ENV_AUTO_ADVANCE_DIRECTION, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.stride.is_finite() || self.stride <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "stride must be positive, got {}",
                self.stride
            )));
        }
        if !(self.page_fraction > 0.0 && self.page_fraction <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "page_fraction must be in (0, 1], got {}",
                self.page_fraction
            )));
        }
        if self.transition_ms == 0 || self.frame_ms == 0 {
            return Err(SettingsError::Invalid(
                "transition_ms and frame_ms must be non-zero".to_string(),
            ));
        }
        if self.auto_advance.interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "auto_advance.interval_ms must be non-zero".to_string(),
            ));
        }
        if !self.auto_advance.step.is_finite() || self.auto_advance.step < 0.0
        {
            return Err(SettingsError::Invalid(format!(
                "auto_advance.step must be a non-negative number, got {}",
                self.auto_advance.step
            )));
        }
        if !self.edge_tolerance.is_finite() || self.edge_tolerance < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "edge_tolerance must be non-negative, got {}",
                self.edge_tolerance
            )));
        }
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Stride guarded against degenerate values.
    pub fn effective_stride(&self) -> f32 {
        if self.stride.is_finite() {
            self.stride.max(1.0)
        } else {
            layout::ITEM_STRIDE
        }
    }
}

fn parse_override<T: std::str::FromStr>(
    key: &'static str,
    value: &str,
) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::Override {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let settings = CarouselSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.transition_duration(), Duration::from_millis(300));
        assert_eq!(settings.auto_advance.interval(), Duration::from_millis(20));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = CarouselSettings::from_json_str(
            r#"{"stride": 200.0, "auto_advance": {"direction": "backward"}}"#,
        )
        .unwrap();
        assert_eq!(settings.stride, 200.0);
        assert_eq!(settings.page_fraction, paging::PAGE_FRACTION);
        assert_eq!(
            settings.auto_advance.direction,
            AdvanceDirection::Backward
        );
        assert_eq!(settings.auto_advance.interval_ms, auto_advance::TICK_MS);
    }

    #[test]
    fn rejects_non_positive_stride() {
        let err = CarouselSettings::from_json_str(r#"{"stride": 0.0}"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn env_overrides_apply_and_report_bad_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (CarouselSettings::ENV_STRIDE, "180"),
            (CarouselSettings::ENV_AUTO_ADVANCE_DIRECTION, "backward"),
        ]);
        let mut settings = CarouselSettings::default();
        settings
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.stride, 180.0);
        assert_eq!(
            settings.auto_advance.direction,
            AdvanceDirection::Backward
        );

        let err = settings
            .apply_env_overrides(|k| {
                (k == CarouselSettings::ENV_TRANSITION_MS)
                    .then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Override { key, .. }
                if key == CarouselSettings::ENV_TRANSITION_MS
        ));
    }
}
