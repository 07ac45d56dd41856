//! Tiered smoothing
//!
//! Small inputs are averaged over a short window, large inputs pass through,
//! and inputs between the two thresholds get a proportional mix. Slow, shaky
//! movements are steadied without adding latency to fast flicks, and there is
//! no hard cutoff to snap across.

use nalgebra::Vector2;

use crate::average::TimedMovingAverage;
use crate::math::{abs, clamp, inverse_lerp};
use crate::types::SmoothingSettings;

/// Fraction of the input that bypasses smoothing, 0 at `threshold_smooth`
/// and 1 at `threshold_direct`
fn direct_weight(settings: &SmoothingSettings, magnitude: f32) -> f32 {
    clamp(
        inverse_lerp(settings.threshold_smooth, settings.threshold_direct, magnitude),
        0.0,
        1.0,
    )
}

fn is_bypassed(settings: &SmoothingSettings) -> bool {
    settings.time <= 0.0 || settings.threshold_direct <= settings.threshold_smooth
}

/// Tiered smoothing for a single axis
///
/// # Example
/// ```
/// use gyro_controls::{SmoothingSettings, TieredSmoothing1D};
///
/// let mut smoothing = TieredSmoothing1D::with_settings(SmoothingSettings {
///     time: 0.1,
///     threshold_smooth: 0.02,
///     threshold_direct: 0.04,
///     inputs_per_second: 256,
/// });
///
/// // above the direct threshold: untouched
/// assert_eq!(smoothing.apply(0.5, 0.01), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct TieredSmoothing1D {
    settings: SmoothingSettings,
    average: TimedMovingAverage,
}

impl TieredSmoothing1D {
    pub fn new() -> Self {
        Self::with_settings(SmoothingSettings::default())
    }

    pub fn with_settings(settings: SmoothingSettings) -> Self {
        Self {
            settings,
            average: TimedMovingAverage::new(settings.time, settings.inputs_per_second),
        }
    }

    pub fn settings(&self) -> SmoothingSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: SmoothingSettings) {
        self.settings = settings;
        self.average.set_time_window(settings.time);
        self.average.set_inputs_per_second(settings.inputs_per_second);
    }

    /// Smooths `input`, which arrived `delta_time` seconds after the previous one
    pub fn apply(&mut self, input: f32, delta_time: f32) -> f32 {
        if is_bypassed(&self.settings) {
            return input;
        }

        let weight = direct_weight(&self.settings, abs(input));
        let direct = input * weight;
        let smoothed = self.average.add(delta_time, input * (1.0 - weight));
        if weight >= 1.0 {
            // the window still records the gap, but residue from earlier
            // smoothed samples must not leak into a direct input
            return input;
        }
        direct + smoothed
    }

    pub fn reset(&mut self) {
        self.average.reset();
    }
}

impl Default for TieredSmoothing1D {
    fn default() -> Self {
        Self::new()
    }
}

/// Tiered smoothing for two axes
///
/// Both axes share one weight derived from the vector's length, so the
/// direction of a movement is smoothed consistently.
#[derive(Debug, Clone)]
pub struct TieredSmoothing2D {
    settings: SmoothingSettings,
    average_x: TimedMovingAverage,
    average_y: TimedMovingAverage,
}

impl TieredSmoothing2D {
    pub fn new() -> Self {
        Self::with_settings(SmoothingSettings::default())
    }

    pub fn with_settings(settings: SmoothingSettings) -> Self {
        Self {
            settings,
            average_x: TimedMovingAverage::new(settings.time, settings.inputs_per_second),
            average_y: TimedMovingAverage::new(settings.time, settings.inputs_per_second),
        }
    }

    pub fn settings(&self) -> SmoothingSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: SmoothingSettings) {
        self.settings = settings;
        for average in [&mut self.average_x, &mut self.average_y] {
            average.set_time_window(settings.time);
            average.set_inputs_per_second(settings.inputs_per_second);
        }
    }

    pub fn apply(&mut self, input: Vector2<f32>, delta_time: f32) -> Vector2<f32> {
        if is_bypassed(&self.settings) {
            return input;
        }

        let weight = direct_weight(&self.settings, input.norm());
        let direct = input * weight;
        let smoothed = Vector2::new(
            self.average_x.add(delta_time, input.x * (1.0 - weight)),
            self.average_y.add(delta_time, input.y * (1.0 - weight)),
        );
        if weight >= 1.0 {
            return input;
        }
        direct + smoothed
    }

    pub fn reset(&mut self) {
        self.average_x.reset();
        self.average_y.reset();
    }
}

impl Default for TieredSmoothing2D {
    fn default() -> Self {
        Self::new()
    }
}
