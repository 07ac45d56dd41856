//! Gyro acceleration: speed-dependent sensitivity

use nalgebra::Vector2;

use crate::math::remap;
use crate::types::AccelerationSettings;

/// Two-point sensitivity curve
///
/// Slow turns get `sensitivity_slow`, fast turns get `sensitivity_fast`, and
/// speeds between the thresholds are interpolated linearly. Precise aim at
/// low speeds while still allowing large turns.
///
/// # Example
/// ```
/// use nalgebra::Vector2;
/// use gyro_controls::{AccelerationSettings, GyroAcceleration};
///
/// let acceleration = GyroAcceleration::with_settings(AccelerationSettings {
///     threshold_slow: 1.0,
///     threshold_fast: 3.0,
///     sensitivity_slow: 1.0,
///     sensitivity_fast: 2.0,
/// });
///
/// assert_eq!(acceleration.transform(Vector2::new(0.5, 0.0)), Vector2::new(0.5, 0.0));
/// assert_eq!(acceleration.transform(Vector2::new(4.0, 0.0)), Vector2::new(8.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroAcceleration {
    settings: AccelerationSettings,
}

impl GyroAcceleration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AccelerationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> AccelerationSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: AccelerationSettings) {
        self.settings = settings;
    }

    /// Scales `input` by the sensitivity for its speed
    pub fn transform(&self, input: Vector2<f32>) -> Vector2<f32> {
        let s = &self.settings;
        if s.threshold_fast <= s.threshold_slow {
            return input * s.sensitivity_slow;
        }

        let sensitivity = remap(
            input.norm(),
            s.threshold_slow,
            s.threshold_fast,
            s.sensitivity_slow,
            s.sensitivity_fast,
        );
        input * sensitivity
    }
}
