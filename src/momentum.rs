//! Momentum: keep turning after the player lets go

use nalgebra::Vector2;

use crate::math::{abs, copysign};
use crate::types::MomentumSettings;

/// Carries the last live motion forward while active, slowing it down by a
/// per-axis friction
///
/// While inactive the input passes through and becomes the baseline. Once
/// activated (a "ratchet" button held, for example) the input is ignored and
/// the stored speed decays linearly to zero without changing sign.
///
/// # Example
/// ```
/// use nalgebra::Vector2;
/// use gyro_controls::{GyroMomentum, MomentumSettings};
///
/// let mut momentum = GyroMomentum::with_settings(MomentumSettings {
///     friction: Vector2::new(1.0, 1.0),
/// });
///
/// momentum.update(Vector2::new(2.0, -2.0), 0.1);
/// momentum.set_active(true);
///
/// let result = momentum.update(Vector2::zeros(), 0.5);
/// assert_eq!(result, Vector2::new(1.5, -1.5));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GyroMomentum {
    settings: MomentumSettings,
    active: bool,
    momentum: Vector2<f32>,
}

impl GyroMomentum {
    pub fn new() -> Self {
        Self::with_settings(MomentumSettings::default())
    }

    pub fn with_settings(settings: MomentumSettings) -> Self {
        Self {
            settings,
            active: false,
            momentum: Vector2::zeros(),
        }
    }

    pub fn settings(&self) -> MomentumSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: MomentumSettings) {
        self.settings = settings;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Stored speed in radians per second
    pub fn momentum(&self) -> Vector2<f32> {
        self.momentum
    }

    pub fn update(&mut self, input: Vector2<f32>, delta_time: f32) -> Vector2<f32> {
        if !self.active {
            self.momentum = input;
            return input;
        }

        let friction = self.settings.friction * delta_time;
        for axis in 0..2 {
            let speed = (abs(self.momentum[axis]) - friction[axis]).max(0.0);
            self.momentum[axis] = copysign(speed, self.momentum[axis]);
        }
        self.momentum
    }

    pub fn reset(&mut self) {
        self.momentum = Vector2::zeros();
    }
}

impl Default for GyroMomentum {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn momentum(friction: Vector2<f32>) -> GyroMomentum {
        GyroMomentum::with_settings(MomentumSettings { friction })
    }

    #[test]
    fn test_inactive_passes_through() {
        let mut momentum = momentum(Vector2::new(1.0, 1.0));
        let input = Vector2::new(0.7, -0.2);
        assert_eq!(momentum.update(input, 0.1), input);
        assert_eq!(momentum.momentum(), input);
    }

    #[test]
    fn test_active_ignores_input_and_decays() {
        let mut momentum = momentum(Vector2::new(2.0, 0.5));
        momentum.update(Vector2::new(1.0, -1.0), 0.01);
        momentum.set_active(true);

        let result = momentum.update(Vector2::new(100.0, 100.0), 0.25);
        assert!((result.x - 0.5).abs() < EPSILON);
        assert!((result.y + 0.875).abs() < EPSILON);
    }

    #[test]
    fn test_active_never_crosses_zero() {
        let mut momentum = momentum(Vector2::new(1.0, 3.0));
        momentum.update(Vector2::new(-1.0, 2.0), 0.01);
        momentum.set_active(true);

        let mut previous = momentum.momentum();
        for _ in 0..50 {
            let result = momentum.update(Vector2::zeros(), 0.05);
            for axis in 0..2 {
                assert!(abs(result[axis]) <= abs(previous[axis]));
                assert!(result[axis] * previous[axis] >= 0.0);
            }
            previous = result;
        }
        assert_eq!(abs(previous.x), 0.0);
        assert_eq!(abs(previous.y), 0.0);
    }

    #[test]
    fn test_resumes_from_live_input() {
        let mut momentum = momentum(Vector2::new(1.0, 1.0));
        momentum.update(Vector2::new(4.0, 0.0), 0.01);
        momentum.set_active(true);
        momentum.update(Vector2::zeros(), 1.0);

        momentum.set_active(false);
        momentum.update(Vector2::new(0.0, 2.0), 0.01);
        momentum.set_active(true);
        let result = momentum.update(Vector2::zeros(), 0.5);
        assert_eq!(result, Vector2::new(0.0, 1.5));
    }

    #[test]
    fn test_reset() {
        let mut momentum = momentum(Vector2::new(1.0, 1.0));
        momentum.update(Vector2::new(4.0, 4.0), 0.01);
        momentum.set_active(true);
        momentum.reset();
        assert_eq!(momentum.update(Vector2::zeros(), 0.1), Vector2::zeros());
    }
}
