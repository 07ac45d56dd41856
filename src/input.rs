//! Gyro calibration and sensor fusion
//!
//! [`GyroInput`] is the ingestion end of the pipeline: it removes gyro bias,
//! folds the samples of one frame into a single reading and keeps the
//! gravity estimate up to date.

use nalgebra::Vector3;

use crate::average::SampleAverage;
use crate::gravity::{ComplementaryGravity, GravityEstimator};
use crate::math::Vector3Ext;
use crate::types::{GyroState, SensorSample};

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;

/// Calibration and fusion stage
///
/// Call [`begin`](Self::begin) once per frame, feed every sensor sample that
/// arrived since the previous frame, then read [`gyro_state`](Self::gyro_state).
///
/// While calibrating, gyro samples only feed the bias estimate and no motion
/// state is produced. Keep the controller still on a flat surface for a
/// second or two, then leave calibration; the bias stays frozen until the
/// next calibration or [`reset`](Self::reset).
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use gyro_controls::GyroInput;
///
/// let mut input = GyroInput::new();
/// let drift = Vector3::new(0.01, -0.02, 0.005);
///
/// input.set_calibrating(true);
/// for i in 0..100 {
///     input.input_gyro(drift, i * 5_000_000);
/// }
/// input.set_calibrating(false);
///
/// input.begin();
/// input.input_gyro(drift, 500_000_000);
/// assert!(input.gyro_state().gyro.norm() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct GyroInput<G = ComplementaryGravity> {
    calibrating: bool,
    /// Unbiased gyro averaged since `begin()`
    gyro: Vector3<f32>,
    accelerometer: Vector3<f32>,
    /// Normalized down direction, or zero
    gravity: Vector3<f32>,
    bias: Vector3<f32>,
    /// `None` until a gyro sample has been fused since the last clear
    prev_timestamp: Option<u64>,
    estimator: G,
    bias_average: SampleAverage,
    frame_average: SampleAverage,
}

impl GyroInput<ComplementaryGravity> {
    /// Creates a fusion stage using the complementary gravity filter
    pub fn new() -> Self {
        Self::with_estimator(ComplementaryGravity::new())
    }
}

impl Default for GyroInput<ComplementaryGravity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GravityEstimator> GyroInput<G> {
    /// Creates a fusion stage using a custom gravity estimator
    pub fn with_estimator(estimator: G) -> Self {
        Self {
            calibrating: false,
            gyro: Vector3::zeros(),
            accelerometer: Vector3::zeros(),
            gravity: Vector3::zeros(),
            bias: Vector3::zeros(),
            prev_timestamp: None,
            estimator,
            bias_average: SampleAverage::new(),
            frame_average: SampleAverage::new(),
        }
    }

    /// Snapshot of the current fused reading
    pub fn gyro_state(&self) -> GyroState {
        GyroState {
            gyro: self.gyro,
            accelerometer: self.accelerometer,
            gravity: self.gravity,
            timestamp: self.prev_timestamp,
        }
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }

    /// Enters or leaves bias calibration. Switching either way restarts the
    /// bias average; the current bias is kept until a new sample replaces it.
    pub fn set_calibrating(&mut self, calibrating: bool) {
        if self.calibrating != calibrating {
            self.bias_average.reset();
            if calibrating {
                log::debug!("gyro calibration started");
            } else {
                log::debug!(
                    "gyro calibration finished, bias = ({}, {}, {})",
                    self.bias.x,
                    self.bias.y,
                    self.bias.z
                );
            }
        }

        self.calibrating = calibrating;
    }

    /// Current gyro bias in radians per second
    pub fn bias(&self) -> Vector3<f32> {
        self.bias
    }

    pub fn gravity_estimator(&self) -> &G {
        &self.estimator
    }

    pub fn gravity_estimator_mut(&mut self) -> &mut G {
        &mut self.estimator
    }

    /// Starts a new frame. Call before feeding the samples received since
    /// the previous frame.
    pub fn begin(&mut self) {
        self.frame_average.reset();
    }

    /// Feeds one gyro sample
    ///
    /// # Arguments
    /// * `gyro` - Angular velocity in radians per second
    /// * `timestamp` - Monotonic timestamp in nanoseconds
    pub fn input_gyro(&mut self, gyro: Vector3<f32>, timestamp: u64) {
        if self.calibrating {
            self.bias = self.bias_average.add(gyro);
            self.clear_state();
            return;
        }

        let gyro = gyro - self.bias;
        self.gyro = self.frame_average.add(gyro);

        let delta_time = match self.prev_timestamp {
            Some(prev) => {
                if timestamp < prev {
                    log::trace!("gyro timestamp went backwards: {timestamp} < {prev}");
                }
                timestamp.saturating_sub(prev) as f32 / NANOS_PER_SECOND
            }
            None => 0.0,
        };

        self.gravity = self
            .estimator
            .update(gyro, self.accelerometer, delta_time)
            .safe_normalize();
        self.prev_timestamp = Some(timestamp);
    }

    /// Feeds one accelerometer sample. It is reused for every gyro sample
    /// until the next one arrives.
    ///
    /// # Arguments
    /// * `accelerometer` - Acceleration in meters per second squared
    /// * `_timestamp` - Monotonic timestamp in nanoseconds
    pub fn input_accelerometer(&mut self, accelerometer: Vector3<f32>, _timestamp: u64) {
        self.accelerometer = accelerometer;
    }

    /// Feeds a combined sample: accelerometer first, so the gyro update
    /// fuses against it
    pub fn input_sample(&mut self, sample: &SensorSample) {
        self.input_accelerometer(sample.accelerometer, sample.timestamp);
        self.input_gyro(sample.gyro, sample.timestamp);
    }

    /// Clears all fused state and the calibrated bias
    pub fn reset(&mut self) {
        self.clear_state();
        self.bias = Vector3::zeros();
        self.bias_average.reset();
        log::debug!("gyro input reset");
    }

    fn clear_state(&mut self) {
        self.gyro = Vector3::zeros();
        self.accelerometer = Vector3::zeros();
        self.gravity = Vector3::zeros();
        self.prev_timestamp = None;
        self.frame_average.reset();
        self.estimator.reset();
    }
}
