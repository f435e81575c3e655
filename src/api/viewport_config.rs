use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ClampFn, ClampMode, FilterSettings, ScaleKind, TruncationPolicy, XPadding};
use crate::error::{ChartError, ChartResult};
use crate::interaction::DispatcherSettings;

/// Domain value wheel zoom keeps fixed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomAnchor {
    /// Item under the pointer.
    #[default]
    Mouse,
    LastVisibleItem,
    RightDomain,
    LastDataItem,
}

/// How configuration errors surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Fail with an error.
    Strict,
    /// Log a warning and recover.
    Lenient,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

impl ValidationMode {
    #[must_use]
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

/// Interaction and density toggles of the viewport.
///
/// Serializable so hosts can persist chart setup; a custom clamp function is
/// runtime-only and skipped by serde.
#[derive(Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_true")]
    pub mouse_move_event: bool,
    #[serde(default = "default_true")]
    pub pan_event: bool,
    #[serde(default = "default_true")]
    pub zoom_event: bool,
    #[serde(default = "default_zoom_multiplier")]
    pub zoom_multiplier: f64,
    #[serde(default)]
    pub zoom_anchor: ZoomAnchor,
    #[serde(default)]
    pub clamp: ClampMode,
    #[serde(skip)]
    pub custom_clamp: Option<ClampFn>,
    #[serde(default = "default_points_per_px_threshold")]
    pub points_per_px_threshold: f64,
    #[serde(default = "default_min_points_per_px_threshold")]
    pub min_points_per_px_threshold: f64,
    #[serde(default)]
    pub flip_x_scale: bool,
    #[serde(default = "default_true")]
    pub maintain_points_per_pixel_on_resize: bool,
    #[serde(default)]
    pub disable_interaction: bool,
    #[serde(default)]
    pub x_scale_kind: ScaleKind,
    #[serde(default = "default_x_padding")]
    pub x_padding: XPadding,
    /// `Some(true)` forces whole-data mode, `Some(false)` forbids it.
    #[serde(default)]
    pub plot_full: Option<bool>,
    #[serde(default)]
    pub validation: ValidationMode,
    #[serde(default)]
    pub truncation: TruncationPolicy,
    #[serde(default = "default_double_click_window_ms")]
    pub double_click_window_ms: f64,
    #[serde(default = "default_wheel_pan_end_delay_ms")]
    pub wheel_pan_end_delay_ms: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            mouse_move_event: true,
            pan_event: true,
            zoom_event: true,
            zoom_multiplier: default_zoom_multiplier(),
            zoom_anchor: ZoomAnchor::default(),
            clamp: ClampMode::default(),
            custom_clamp: None,
            points_per_px_threshold: default_points_per_px_threshold(),
            min_points_per_px_threshold: default_min_points_per_px_threshold(),
            flip_x_scale: false,
            maintain_points_per_pixel_on_resize: true,
            disable_interaction: false,
            x_scale_kind: ScaleKind::default(),
            x_padding: default_x_padding(),
            plot_full: None,
            validation: ValidationMode::default(),
            truncation: TruncationPolicy::default(),
            double_click_window_ms: default_double_click_window_ms(),
            wheel_pan_end_delay_ms: default_wheel_pan_end_delay_ms(),
        }
    }
}

impl fmt::Debug for ViewportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportConfig")
            .field("mouse_move_event", &self.mouse_move_event)
            .field("pan_event", &self.pan_event)
            .field("zoom_event", &self.zoom_event)
            .field("zoom_multiplier", &self.zoom_multiplier)
            .field("zoom_anchor", &self.zoom_anchor)
            .field("clamp", &self.clamp)
            .field("custom_clamp", &self.custom_clamp.is_some())
            .field("points_per_px_threshold", &self.points_per_px_threshold)
            .field("min_points_per_px_threshold", &self.min_points_per_px_threshold)
            .field("flip_x_scale", &self.flip_x_scale)
            .field(
                "maintain_points_per_pixel_on_resize",
                &self.maintain_points_per_pixel_on_resize,
            )
            .field("disable_interaction", &self.disable_interaction)
            .field("x_scale_kind", &self.x_scale_kind)
            .field("x_padding", &self.x_padding)
            .field("plot_full", &self.plot_full)
            .field("validation", &self.validation)
            .field("truncation", &self.truncation)
            .finish_non_exhaustive()
    }
}

impl ViewportConfig {
    #[must_use]
    pub fn with_zoom_multiplier(mut self, multiplier: f64) -> Self {
        self.zoom_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_zoom_anchor(mut self, anchor: ZoomAnchor) -> Self {
        self.zoom_anchor = anchor;
        self
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: ClampMode) -> Self {
        self.clamp = clamp;
        self
    }

    /// Custom clamp `(requested_domain, data_bounds) -> domain`; wins over `clamp`.
    #[must_use]
    pub fn with_custom_clamp(
        mut self,
        clamp: impl Fn((f64, f64), (f64, f64)) -> (f64, f64) + Send + Sync + 'static,
    ) -> Self {
        self.custom_clamp = Some(Arc::new(clamp));
        self
    }

    #[must_use]
    pub fn with_points_per_px_thresholds(mut self, max: f64, min: f64) -> Self {
        self.points_per_px_threshold = max;
        self.min_points_per_px_threshold = min;
        self
    }

    #[must_use]
    pub fn with_flip_x_scale(mut self, flip: bool) -> Self {
        self.flip_x_scale = flip;
        self
    }

    #[must_use]
    pub fn with_maintain_points_per_pixel_on_resize(mut self, maintain: bool) -> Self {
        self.maintain_points_per_pixel_on_resize = maintain;
        self
    }

    #[must_use]
    pub fn with_disable_interaction(mut self, disabled: bool) -> Self {
        self.disable_interaction = disabled;
        self
    }

    #[must_use]
    pub fn with_x_scale_kind(mut self, kind: ScaleKind) -> Self {
        self.x_scale_kind = kind;
        self
    }

    #[must_use]
    pub fn with_x_padding(mut self, padding: XPadding) -> Self {
        self.x_padding = padding;
        self
    }

    #[must_use]
    pub fn with_plot_full(mut self, plot_full: Option<bool>) -> Self {
        self.plot_full = plot_full;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.zoom_multiplier.is_finite() || self.zoom_multiplier <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "zoom multiplier must be finite and > 0".to_owned(),
            ));
        }
        if !self.points_per_px_threshold.is_finite() || self.points_per_px_threshold <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "points per px threshold must be finite and > 0".to_owned(),
            ));
        }
        if !self.min_points_per_px_threshold.is_finite() || self.min_points_per_px_threshold <= 0.0
        {
            return Err(ChartError::InvalidConfig(
                "min points per px threshold must be finite and > 0".to_owned(),
            ));
        }
        if self.min_points_per_px_threshold >= self.points_per_px_threshold {
            return Err(ChartError::InvalidConfig(
                "min points per px threshold must be below the max threshold".to_owned(),
            ));
        }
        let (left, right) = self.x_padding.sides();
        if !left.is_finite() || !right.is_finite() || left < 0.0 || right < 0.0 {
            return Err(ChartError::InvalidConfig(
                "x padding must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("double click window", self.double_click_window_ms),
            ("wheel pan end delay", self.wheel_pan_end_delay_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize viewport config: {e}"))
        })
    }

    #[must_use]
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            use_whole_data: self.plot_full.unwrap_or(false),
            clamp: self.clamp,
            points_per_px_threshold: self.points_per_px_threshold,
            min_points_per_px_threshold: self.min_points_per_px_threshold,
            flip_x_scale: self.flip_x_scale,
            truncation: self.truncation,
        }
    }

    #[must_use]
    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            mouse_move: self.mouse_move_event,
            pan: self.pan_event,
            zoom: self.zoom_event,
            disabled: self.disable_interaction,
            double_click_window_ms: self.double_click_window_ms,
            wheel_pan_end_delay_ms: self.wheel_pan_end_delay_ms,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_zoom_multiplier() -> f64 {
    1.1
}

fn default_points_per_px_threshold() -> f64 {
    2.0
}

fn default_min_points_per_px_threshold() -> f64 {
    1.0 / 100.0
}

fn default_x_padding() -> XPadding {
    XPadding::Symmetric(0.0)
}

fn default_double_click_window_ms() -> f64 {
    400.0
}

fn default_wheel_pan_end_delay_ms() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::{ValidationMode, ViewportConfig, ZoomAnchor};

    #[test]
    fn defaults_match_documented_values() {
        let config = ViewportConfig::default();
        assert!((config.zoom_multiplier - 1.1).abs() <= 1e-12);
        assert!((config.points_per_px_threshold - 2.0).abs() <= 1e-12);
        assert!((config.min_points_per_px_threshold - 0.01).abs() <= 1e-12);
        assert!(config.maintain_points_per_pixel_on_resize);
        assert_eq!(config.zoom_anchor, ZoomAnchor::Mouse);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn validation_rejects_inverted_thresholds() {
        let config = ViewportConfig::default().with_points_per_px_thresholds(0.5, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let config = ViewportConfig::from_json_str(r#"{"zoom_multiplier": 1.5, "validation": "Lenient"}"#)
            .expect("parse");
        assert!((config.zoom_multiplier - 1.5).abs() <= 1e-12);
        assert_eq!(config.validation, ValidationMode::Lenient);
        assert!(config.pan_event);
    }
}
