//! Flick stick
//!
//! Pushing the stick past a threshold turns the camera to face the stick's
//! direction with a short animation. Rotating the stick while it is held
//! keeps turning the camera by the same angle. Releasing the stick does
//! nothing; it only arms the next flick.
//!
//! Stick Y is down-positive, so `(0, -1)` is straight ahead and an angle of
//! zero. Positive angles turn to the left.

use nalgebra::Vector2;

use crate::math::{PI, abs, atan2, ease_out_cubic, lerp, round, wrap_delta_angle};
use crate::smoothing::TieredSmoothing1D;
use crate::types::{FlickSnapping, FlickStickSettings};

/// Stick to camera-yaw gesture
///
/// # Example
/// ```
/// use nalgebra::Vector2;
/// use gyro_controls::{FlickStick, FlickStickSettings};
///
/// let mut flick = FlickStick::with_settings(FlickStickSettings {
///     flick_time: 0.0,
///     ..Default::default()
/// });
///
/// // flick right: a quarter turn clockwise
/// let delta = flick.update(Vector2::new(1.0, 0.0), 0.016);
/// assert!((delta + core::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// assert!(flick.is_flicking());
///
/// flick.update(Vector2::zeros(), 0.016);
/// assert!(!flick.is_flicking());
/// ```
#[derive(Debug, Clone)]
pub struct FlickStick {
    settings: FlickStickSettings,
    flicking: bool,
    /// 0 at the start of a flick animation, 1 when there is none pending
    flick_progress: f32,
    /// Target angle of the current flick
    flick_angle: f32,
    /// Stick angle on the previous update, `None` while idle
    last_stick_angle: Option<f32>,
    smoothing: TieredSmoothing1D,
}

impl FlickStick {
    pub fn new() -> Self {
        Self::with_settings(FlickStickSettings::default())
    }

    pub fn with_settings(settings: FlickStickSettings) -> Self {
        Self {
            settings,
            flicking: false,
            flick_progress: 1.0,
            flick_angle: 0.0,
            last_stick_angle: None,
            smoothing: TieredSmoothing1D::with_settings(settings.smoothing),
        }
    }

    pub fn settings(&self) -> FlickStickSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: FlickStickSettings) {
        self.settings = settings;
        self.smoothing.set_settings(settings.smoothing);
    }

    /// Whether the stick is currently held past the flick threshold
    pub fn is_flicking(&self) -> bool {
        self.flicking
    }

    /// Returns the yaw change in radians for this frame
    pub fn update(&mut self, stick: Vector2<f32>, delta_time: f32) -> f32 {
        let mut result = 0.0;
        let threshold = self.settings.flick_threshold;

        if stick.norm_squared() >= threshold * threshold {
            let stick_angle = atan2(-stick.x, -stick.y);

            if !self.flicking {
                self.flicking = true;
                self.flick_angle = self.snap(stick_angle);
                self.flick_progress = 0.0;
                log::debug!(
                    "flick started: stick angle {}, target {}",
                    stick_angle,
                    self.flick_angle
                );

                if self.settings.flick_time <= 0.0 {
                    result += self.flick_angle;
                }
            } else {
                // keep turning with the stick after the flick
                let last = self.last_stick_angle.unwrap_or(stick_angle);
                let delta_angle = wrap_delta_angle(stick_angle - last);
                result += self.smoothing.apply(delta_angle, delta_time);
            }

            self.last_stick_angle = Some(stick_angle);
        } else if self.flicking {
            log::debug!("flick released");
            self.flicking = false;
            self.last_stick_angle = None;
            self.smoothing.reset();
        }

        let flick_time = self.settings.flick_time;
        if self.flick_progress < 1.0 && flick_time > 0.0 {
            let last_progress = self.flick_progress;
            self.flick_progress = (self.flick_progress + delta_time / flick_time).min(1.0);

            let eased = ease_out_cubic(self.flick_progress) - ease_out_cubic(last_progress);
            result += eased * self.flick_angle;
        }

        result
    }

    /// Cancels any flick in progress and returns to idle
    pub fn reset(&mut self) {
        self.flicking = false;
        self.flick_progress = 1.0;
        self.flick_angle = 0.0;
        self.last_stick_angle = None;
        self.smoothing.reset();
    }

    fn snap(&self, angle: f32) -> f32 {
        let strength = self.settings.snapping_strength;
        let interval = match self.settings.snapping {
            FlickSnapping::None => return angle,
            FlickSnapping::Two => PI,
            FlickSnapping::Four => PI / 2.0,
            FlickSnapping::Six => PI / 3.0,
            FlickSnapping::Eight => PI / 4.0,
            FlickSnapping::ForwardOnly => {
                return if abs(angle) < self.settings.snapping_forward_deadzone {
                    lerp(angle, 0.0, strength)
                } else {
                    angle
                };
            }
        };

        let snapped = round(angle / interval) * interval;
        lerp(angle, snapped, strength)
    }
}

impl Default for FlickStick {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DEG_TO_RAD;

    const EPSILON: f32 = 1e-5;

    fn snapping(snapping: FlickSnapping, strength: f32) -> FlickStick {
        FlickStick::with_settings(FlickStickSettings {
            snapping,
            snapping_strength: strength,
            ..Default::default()
        })
    }

    #[test]
    fn test_snap_none() {
        let flick = snapping(FlickSnapping::None, 1.0);
        assert_eq!(flick.snap(0.3), 0.3);
    }

    #[test]
    fn test_snap_intervals() {
        let angle = 50.0 * DEG_TO_RAD;
        assert!((snapping(FlickSnapping::Two, 1.0).snap(angle)).abs() < EPSILON);
        assert!((snapping(FlickSnapping::Four, 1.0).snap(angle) - PI / 2.0).abs() < EPSILON);
        assert!((snapping(FlickSnapping::Six, 1.0).snap(angle) - PI / 3.0).abs() < EPSILON);
        assert!((snapping(FlickSnapping::Eight, 1.0).snap(angle) - PI / 4.0).abs() < EPSILON);

        // near the back: snaps to π
        let back = 170.0 * DEG_TO_RAD;
        assert!((snapping(FlickSnapping::Two, 1.0).snap(back) - PI).abs() < EPSILON);
        assert!((snapping(FlickSnapping::Four, 1.0).snap(-back) + PI).abs() < EPSILON);
    }

    #[test]
    fn test_snap_strength() {
        let angle = 50.0 * DEG_TO_RAD;
        let half = snapping(FlickSnapping::Eight, 0.5).snap(angle);
        assert!((half - 47.5 * DEG_TO_RAD).abs() < EPSILON);

        let off = snapping(FlickSnapping::Eight, 0.0).snap(angle);
        assert!((off - angle).abs() < EPSILON);
    }

    #[test]
    fn test_snap_forward_only() {
        let flick = snapping(FlickSnapping::ForwardOnly, 1.0);
        assert_eq!(flick.snap(5.0 * DEG_TO_RAD), 0.0);
        assert_eq!(flick.snap(-5.0 * DEG_TO_RAD), 0.0);
        assert_eq!(flick.snap(10.0 * DEG_TO_RAD), 10.0 * DEG_TO_RAD);

        let half = snapping(FlickSnapping::ForwardOnly, 0.5).snap(4.0 * DEG_TO_RAD);
        assert!((half - 2.0 * DEG_TO_RAD).abs() < EPSILON);
    }

    #[test]
    fn test_instant_flick() {
        let mut flick = FlickStick::with_settings(FlickStickSettings {
            flick_time: 0.0,
            ..Default::default()
        });
        // stick left
        let delta = flick.update(Vector2::new(-1.0, 0.0), 0.01);
        assert!((delta - PI / 2.0).abs() < EPSILON);

        // held still: no further output
        assert_eq!(flick.update(Vector2::new(-1.0, 0.0), 0.01), 0.0);
    }

    #[test]
    fn test_animated_flick_reaches_target() {
        let mut flick = FlickStick::new();
        let mut total = 0.0;
        let mut previous = f32::MAX;
        for _ in 0..20 {
            let delta = flick.update(Vector2::new(1.0, 0.0), 0.013);
            // ease-out: each step no larger than the one before
            assert!(abs(delta) <= previous + EPSILON);
            previous = abs(delta);
            total += delta;
        }
        assert!((total + PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_animation_continues_after_release() {
        let mut flick = FlickStick::new();
        let mut total = flick.update(Vector2::new(1.0, 0.0), 0.02);
        for _ in 0..10 {
            total += flick.update(Vector2::zeros(), 0.02);
        }
        assert!(!flick.is_flicking());
        assert!((total + PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_below_threshold_is_idle() {
        let mut flick = FlickStick::new();
        assert_eq!(flick.update(Vector2::new(0.5, 0.5), 0.01), 0.0);
        assert!(!flick.is_flicking());
    }

    #[test]
    fn test_reset_cancels_animation() {
        let mut flick = FlickStick::new();
        flick.update(Vector2::new(1.0, 0.0), 0.01);
        flick.reset();
        assert!(!flick.is_flicking());
        assert_eq!(flick.update(Vector2::zeros(), 0.01), 0.0);
    }
}
