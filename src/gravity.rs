//! Gravity estimation
//!
//! The fusion stage only needs to know which way is down. How that is worked
//! out is left to a [`GravityEstimator`]; [`ComplementaryGravity`] is the
//! default implementation.

use alloc::boxed::Box;
use nalgebra::{ComplexField, Quaternion, UnitQuaternion, Vector3};

use crate::math::{DEG_TO_RAD, Vector3Ext};
use crate::types::ComplementarySettings;

/// Algorithm constants
const INITIAL_GAIN: f32 = 10.0;
const INITIALISATION_PERIOD: f32 = 3.0; // seconds
const RECOVERY_DECREMENT: i32 = 9;

/// An algorithm that fuses gyro and accelerometer samples into a gravity direction
///
/// The result does not need to be normalized; the fusion stage normalizes it
/// and treats an exact zero vector as "no estimate yet".
pub trait GravityEstimator {
    /// Feeds one sample and returns the current down direction in the sensor frame
    ///
    /// # Arguments
    /// * `gyro` - Unbiased gyro in radians per second
    /// * `accelerometer` - Last accelerometer reading, any unit
    /// * `delta_time` - Seconds since the previous gyro sample, zero for the first
    fn update(
        &mut self,
        gyro: Vector3<f32>,
        accelerometer: Vector3<f32>,
        delta_time: f32,
    ) -> Vector3<f32>;

    /// Forgets all history
    fn reset(&mut self);
}

impl<G: GravityEstimator + ?Sized> GravityEstimator for Box<G> {
    fn update(
        &mut self,
        gyro: Vector3<f32>,
        accelerometer: Vector3<f32>,
        delta_time: f32,
    ) -> Vector3<f32> {
        (**self).update(gyro, accelerometer, delta_time)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Complementary filter gravity estimator
///
/// Integrates the gyro into an orientation quaternion and continuously pulls
/// it toward the accelerometer's idea of "up". A high gain during the first
/// seconds lets it converge quickly; afterwards accelerometer readings that
/// disagree too much with the estimate (shaking, swinging the controller)
/// can be rejected.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use gyro_controls::{ComplementaryGravity, GravityEstimator};
///
/// let mut estimator = ComplementaryGravity::new();
/// let accelerometer = Vector3::new(0.0, 9.81, 0.0); // controller lying flat
///
/// let mut down = Vector3::zeros();
/// for _ in 0..500 {
///     down = estimator.update(Vector3::zeros(), accelerometer, 0.01);
/// }
/// assert!((down - Vector3::new(0.0, -1.0, 0.0)).norm() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct ComplementaryGravity {
    settings: ComplementarySettings,
    /// Sensor orientation in a Z-up world frame
    quaternion: UnitQuaternion<f32>,
    /// Whether an accelerometer reading has been fused since the last reset
    has_reference: bool,
    initialising: bool,
    /// Ramped gain value during initialization
    ramped_gain: f32,
    /// Gain ramping step size per update
    ramped_gain_step: f32,
    /// Accelerometer feedback, already halved by the half-gravity reference
    half_accelerometer_feedback: Vector3<f32>,
    accelerometer_ignored: bool,
    /// Rejected samples pending recovery
    acceleration_recovery_trigger: i32,
    /// Squared feedback magnitude above which the accelerometer is rejected
    acceleration_rejection_squared: f32,
}

impl ComplementaryGravity {
    pub fn new() -> Self {
        Self::with_settings(ComplementarySettings::default())
    }

    pub fn with_settings(settings: ComplementarySettings) -> Self {
        let mut estimator = Self {
            settings,
            quaternion: UnitQuaternion::identity(),
            has_reference: false,
            initialising: true,
            ramped_gain: INITIAL_GAIN,
            ramped_gain_step: 0.0,
            half_accelerometer_feedback: Vector3::zeros(),
            accelerometer_ignored: false,
            acceleration_recovery_trigger: 0,
            acceleration_rejection_squared: f32::MAX,
        };
        estimator.process_settings();
        estimator
    }

    pub fn settings(&self) -> ComplementarySettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: ComplementarySettings) {
        self.settings = settings;
        self.process_settings();
    }

    /// Current orientation estimate
    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        self.quaternion
    }

    /// Whether the filter is still in its high-gain start-up phase
    pub fn is_initialising(&self) -> bool {
        self.initialising
    }

    /// Whether the last accelerometer reading was rejected
    pub fn accelerometer_ignored(&self) -> bool {
        self.accelerometer_ignored
    }

    /// Down direction implied by the current orientation, or zero before the
    /// first accelerometer reading
    pub fn down(&self) -> Vector3<f32> {
        if self.has_reference {
            -self.calculate_half_gravity() * 2.0
        } else {
            Vector3::zeros()
        }
    }

    fn process_settings(&mut self) {
        let rejection = self.settings.acceleration_rejection;
        self.acceleration_rejection_squared = if rejection > 0.0 && rejection < 90.0 {
            let half_sin = 0.5 * <f32 as ComplexField>::sin(rejection * DEG_TO_RAD);
            half_sin * half_sin
        } else {
            f32::MAX
        };
    }

    fn ramp_gain(&mut self) {
        if !self.initialising {
            return;
        }

        if self.ramped_gain > self.settings.gain {
            self.ramped_gain -= self.ramped_gain_step;
            if self.ramped_gain < self.settings.gain {
                self.ramped_gain = self.settings.gain;
            }
        } else {
            self.initialising = false;
            log::debug!("gravity filter initialised, gain {}", self.settings.gain);
        }
    }

    fn fuse_accelerometer(&mut self, accelerometer: Vector3<f32>) {
        self.half_accelerometer_feedback = Vector3::zeros();

        let accelerometer = accelerometer.safe_normalize();
        if accelerometer == Vector3::zeros() {
            return;
        }
        self.has_reference = true;

        let feedback = calculate_feedback(accelerometer, self.calculate_half_gravity());
        let accepted = self.initialising
            || feedback.magnitude_squared() <= self.acceleration_rejection_squared;

        if accepted {
            self.half_accelerometer_feedback = feedback;
            self.acceleration_recovery_trigger =
                (self.acceleration_recovery_trigger - RECOVERY_DECREMENT).max(0);
            if self.accelerometer_ignored {
                log::debug!("accelerometer accepted again");
                self.accelerometer_ignored = false;
            }
            return;
        }

        self.acceleration_recovery_trigger += 1;
        let period = self.settings.recovery_trigger_period;
        if period > 0 && self.acceleration_recovery_trigger as u32 > period {
            // rejected for too long: the estimate is more likely wrong than the sensor
            log::debug!("accelerometer recovery after {period} rejected samples");
            self.half_accelerometer_feedback = feedback;
            self.acceleration_recovery_trigger = 0;
            self.accelerometer_ignored = false;
        } else {
            if !self.accelerometer_ignored {
                log::debug!("accelerometer rejected");
            }
            self.accelerometer_ignored = true;
        }
    }

    /// Half of the up direction in the sensor frame, taken from the third
    /// row of the rotation matrix
    fn calculate_half_gravity(&self) -> Vector3<f32> {
        let q = self.quaternion.as_ref();
        let qw = q.w;
        let qx = q.i;
        let qy = q.j;
        let qz = q.k;

        Vector3::new(
            qx * qz - qw * qy,
            qy * qz + qw * qx,
            qw * qw - 0.5 + qz * qz,
        )
    }

    fn integrate_quaternion(&mut self, half_gyroscope: Vector3<f32>, delta_time: f32) {
        let gyro_quat = Quaternion::from_parts(0.0, half_gyroscope);

        // dq/dt = 0.5 * q * ω, first-order step
        let derivative = self.quaternion.as_ref() * gyro_quat;
        let integrated = self.quaternion.as_ref() + derivative * delta_time;

        self.quaternion = UnitQuaternion::from_quaternion(integrated);
    }
}

/// Error between a measured direction and the expected half-length reference.
/// Opposing vectors get a normalized cross product so the correction does
/// not vanish when the estimate is upside down.
fn calculate_feedback(sensor: Vector3<f32>, reference: Vector3<f32>) -> Vector3<f32> {
    let cross = sensor.cross(&reference);
    if sensor.dot(&reference) < 0.0 {
        cross.safe_normalize()
    } else {
        cross
    }
}

impl GravityEstimator for ComplementaryGravity {
    fn update(
        &mut self,
        gyro: Vector3<f32>,
        accelerometer: Vector3<f32>,
        delta_time: f32,
    ) -> Vector3<f32> {
        if self.ramped_gain_step == 0.0 && delta_time > 0.0 {
            self.ramped_gain_step =
                (INITIAL_GAIN - self.settings.gain) / INITIALISATION_PERIOD * delta_time;
        }

        self.ramp_gain();
        self.fuse_accelerometer(accelerometer);

        let half_gyroscope = gyro * 0.5;
        let adjusted = half_gyroscope + self.half_accelerometer_feedback * self.ramped_gain;
        self.integrate_quaternion(adjusted, delta_time);

        self.down()
    }

    fn reset(&mut self) {
        self.quaternion = UnitQuaternion::identity();
        self.has_reference = false;
        self.initialising = true;
        self.ramped_gain = INITIAL_GAIN;
        self.ramped_gain_step = 0.0;
        self.half_accelerometer_feedback = Vector3::zeros();
        self.accelerometer_ignored = false;
        self.acceleration_recovery_trigger = 0;
    }
}

impl Default for ComplementaryGravity {
    fn default() -> Self {
        Self::new()
    }
}
