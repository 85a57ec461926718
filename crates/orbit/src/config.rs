use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, serde_as};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// How the menu reacts when it would be clipped by the viewport.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EdgeBehavior {
    /// Move the center inward until the menu fits.
    Shift,
    /// Mirror the layout toward the roomier side.
    #[default]
    Flip,
    None,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    pub spring_load: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub spring_load_delay: Duration,
    pub drag_through: bool,
    /// Outward speed (px/s) that enters a submenu without waiting.
    pub drag_through_velocity: f64,
    /// Fraction of the current outer radius the pointer must be past.
    pub drag_through_distance_ratio: f64,
    pub back_dwell: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub back_dwell_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub error_clear_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub trail_duration: Duration,
    pub trail_max_points: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            spring_load: true,
            spring_load_delay: Duration::from_millis(500),
            drag_through: true,
            drag_through_velocity: 600.0,
            drag_through_distance_ratio: 0.5,
            back_dwell: true,
            back_dwell_delay: Duration::from_millis(400),
            error_clear_delay: Duration::from_millis(2000),
            trail_duration: Duration::from_millis(300),
            trail_max_points: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuConfig {
    pub radius: f64,
    pub inner_radius: f64,
    /// Angular gap between neighbouring sectors, in radians.
    pub gap: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub infinite_selection: bool,
    pub center_deadzone: f64,
    /// Maximum hover distance with infinite selection; `0` means unbounded.
    pub infinite_threshold: f64,
    pub edge_behavior: EdgeBehavior,
    pub edge_padding: f64,
    /// Width of each nested ring. Defaults to `radius - inner_radius`.
    pub radius_step: Option<f64>,
    pub gestures: GestureConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            inner_radius: 40.0,
            gap: 0.05,
            start_angle: -FRAC_PI_2,
            sweep_angle: TAU,
            infinite_selection: true,
            center_deadzone: 30.0,
            infinite_threshold: 0.0,
            edge_behavior: EdgeBehavior::Flip,
            edge_padding: 8.0,
            radius_step: None,
            gestures: GestureConfig::default(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{0}` must be a finite number")]
    NotFinite(&'static str),
    #[error("inner radius {inner} must be in [0, {outer})")]
    InvalidRadii { inner: f64, outer: f64 },
    #[error("sweep angle {0} must be in (0, 2π]")]
    InvalidSweep(f64),
    #[error("radius step {0} must be positive")]
    InvalidRadiusStep(f64),
}

// float slack so a sweep computed as 2π in user code still passes
const SWEEP_EPSILON: f64 = 1e-9;

impl MenuConfig {
    pub fn ring_step(&self) -> f64 {
        self.radius_step.unwrap_or(self.radius - self.inner_radius)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("radius", self.radius),
            ("innerRadius", self.inner_radius),
            ("gap", self.gap),
            ("startAngle", self.start_angle),
            ("sweepAngle", self.sweep_angle),
            ("centerDeadzone", self.center_deadzone),
            ("infiniteThreshold", self.infinite_threshold),
            ("edgePadding", self.edge_padding),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(*name));
        }

        if self.inner_radius < 0.0 || self.inner_radius >= self.radius {
            return Err(ConfigError::InvalidRadii {
                inner: self.inner_radius,
                outer: self.radius,
            });
        }
        if self.sweep_angle <= 0.0 || self.sweep_angle > TAU + SWEEP_EPSILON {
            return Err(ConfigError::InvalidSweep(self.sweep_angle));
        }
        let step = self.ring_step();
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InvalidRadiusStep(step));
        }
        Ok(())
    }

    /// Repairs degenerate values instead of rejecting them.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        let radius = finite_or(self.radius, defaults.radius).max(1.0);
        let inner = finite_or(self.inner_radius, defaults.inner_radius).max(0.0);
        let inner_radius = if inner < radius { inner } else { radius * 0.5 };
        let sweep = finite_or(self.sweep_angle, TAU);
        let sweep_angle = if sweep <= 0.0 { TAU } else { sweep.min(TAU) };
        let radius_step = self
            .radius_step
            .filter(|step| step.is_finite() && *step > 0.0);

        Self {
            radius,
            inner_radius,
            gap: finite_or(self.gap, defaults.gap).max(0.0),
            start_angle: finite_or(self.start_angle, defaults.start_angle),
            sweep_angle,
            center_deadzone: finite_or(self.center_deadzone, defaults.center_deadzone).max(0.0),
            infinite_threshold: finite_or(self.infinite_threshold, 0.0).max(0.0),
            edge_padding: finite_or(self.edge_padding, defaults.edge_padding).max(0.0),
            radius_step,
            ..self.clone()
        }
    }
}
