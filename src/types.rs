//! Core types and settings for the gyro pipeline

use nalgebra::{Vector2, Vector3};

use crate::error::{ConfigError, Result};
use crate::math::DEG_TO_RAD;

/// A single sensor reading as delivered by the host
///
/// Gyro and accelerometer may arrive at different rates; hosts that receive
/// them separately can call [`GyroInput::input_gyro`](crate::GyroInput::input_gyro)
/// and [`GyroInput::input_accelerometer`](crate::GyroInput::input_accelerometer) directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Angular velocity in radians per second
    pub gyro: Vector3<f32>,
    /// Acceleration in meters per second squared
    pub accelerometer: Vector3<f32>,
    /// Monotonic timestamp in nanoseconds
    pub timestamp: u64,
}

/// Fused sensor reading for one frame
///
/// Produced by [`GyroInput::gyro_state`](crate::GyroInput::gyro_state) and
/// consumed by [`GyroProcessor::update`](crate::GyroProcessor::update).
/// It is a snapshot: modifying it does not affect the fusion stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroState {
    /// Unbiased gyro in radians per second, averaged over the samples
    /// received since the last `begin()`
    pub gyro: Vector3<f32>,
    /// Last accelerometer reading in meters per second squared
    pub accelerometer: Vector3<f32>,
    /// Normalized down direction in the sensor frame, or exactly zero
    /// when no estimate is available yet
    pub gravity: Vector3<f32>,
    /// Timestamp of the last gyro sample used for fusion, in nanoseconds.
    /// `None` until the first sample after a reset.
    pub timestamp: Option<u64>,
}

impl Default for GyroState {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros(), Vector3::zeros())
    }
}

impl GyroState {
    pub fn new(gyro: Vector3<f32>, accelerometer: Vector3<f32>, gravity: Vector3<f32>) -> Self {
        Self {
            gyro,
            accelerometer,
            gravity,
            timestamp: None,
        }
    }
}

/// Controller rotation axis
///
/// The discriminant is the component index in the gyro vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GyroAxis {
    /// Rotation around X, nodding the controller up and down
    #[default]
    Pitch = 0,
    /// Rotation around Y, turning the controller left and right
    Yaw = 1,
    /// Rotation around Z, tilting the controller like a steering wheel
    Roll = 2,
}

impl GyroAxis {
    /// Component index in a gyro vector
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for GyroAxis {
    type Error = ConfigError;

    /// # Example
    /// ```
    /// use gyro_controls::{ConfigError, GyroAxis};
    ///
    /// assert_eq!(GyroAxis::try_from(1usize), Ok(GyroAxis::Yaw));
    /// assert_eq!(GyroAxis::try_from(3usize), Err(ConfigError::InvalidAxis(3)));
    /// ```
    fn try_from(index: usize) -> Result<Self> {
        match index {
            0 => Ok(GyroAxis::Pitch),
            1 => Ok(GyroAxis::Yaw),
            2 => Ok(GyroAxis::Roll),
            other => Err(ConfigError::InvalidAxis(other)),
        }
    }
}

/// Flick angle snapping policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlickSnapping {
    /// Flick to the exact stick angle
    #[default]
    None,
    /// Snap to forward or backward (multiples of π)
    Two,
    /// Snap to the four cardinal directions (multiples of π/2)
    Four,
    /// Snap to multiples of π/3
    Six,
    /// Snap to cardinals and diagonals (multiples of π/4)
    Eight,
    /// Only relax angles near straight ahead toward zero
    ForwardOnly,
}

/// Tiered smoothing settings
///
/// Inputs with magnitude at or below `threshold_smooth` are fully smoothed,
/// inputs at or above `threshold_direct` pass through untouched, and
/// everything in between is a blend of the two.
///
/// # Example
/// ```
/// use gyro_controls::SmoothingSettings;
///
/// let settings = SmoothingSettings {
///     threshold_smooth: 0.1,  // rad/s
///     threshold_direct: 0.2,  // rad/s
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingSettings {
    /// Length of the averaging window in seconds. Zero or less disables smoothing.
    pub time: f32,
    /// Magnitudes at or below this are fully smoothed
    pub threshold_smooth: f32,
    /// Magnitudes at or above this are not smoothed.
    /// Must be greater than `threshold_smooth`, otherwise smoothing is bypassed.
    pub threshold_direct: f32,
    /// Expected input rate, used only to size the averaging buffer
    pub inputs_per_second: u32,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            time: 0.1,
            threshold_smooth: 0.0,
            threshold_direct: 0.0,
            inputs_per_second: 256,
        }
    }
}

/// Gyro acceleration (sensitivity curve) settings
///
/// Gain is `sensitivity_slow` below `threshold_slow`, `sensitivity_fast`
/// above `threshold_fast`, and interpolated by angular speed in between.
/// Thresholds are in radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationSettings {
    pub threshold_slow: f32,
    pub threshold_fast: f32,
    pub sensitivity_slow: f32,
    pub sensitivity_fast: f32,
}

impl Default for AccelerationSettings {
    fn default() -> Self {
        Self {
            threshold_slow: 0.0,
            threshold_fast: 0.0,
            sensitivity_slow: 1.0,
            sensitivity_fast: 1.0,
        }
    }
}

/// Gyro momentum settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumSettings {
    /// Per-axis deceleration applied while momentum is active, in radians
    /// per second per second
    pub friction: Vector2<f32>,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            friction: Vector2::zeros(),
        }
    }
}

/// Motion pipeline settings
///
/// # Example
/// ```
/// use gyro_controls::{AccelerationSettings, ProcessorSettings, SmoothingSettings};
///
/// let settings = ProcessorSettings {
///     tightening_threshold: 0.05,
///     smoothing: SmoothingSettings {
///         threshold_smooth: 0.1,
///         threshold_direct: 0.2,
///         ..Default::default()
///     },
///     acceleration: AccelerationSettings {
///         threshold_slow: 0.5,
///         threshold_fast: 2.0,
///         sensitivity_slow: 1.0,
///         sensitivity_fast: 2.5,
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessorSettings {
    /// Angular speeds below this are scaled linearly toward zero, in
    /// radians per second. Zero disables tightening.
    pub tightening_threshold: f32,
    pub smoothing: SmoothingSettings,
    pub acceleration: AccelerationSettings,
    pub momentum: MomentumSettings,
}

/// Flick stick settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickStickSettings {
    /// Stick magnitude that starts a flick
    pub flick_threshold: f32,
    /// Duration of the flick animation in seconds. Zero turns instantly.
    pub flick_time: f32,
    pub snapping: FlickSnapping,
    /// Half-width of the forward snap zone in radians, used by
    /// [`FlickSnapping::ForwardOnly`]
    pub snapping_forward_deadzone: f32,
    /// How far a flick is pulled toward its snapped angle, 0 to 1
    pub snapping_strength: f32,
    /// Smoothing of stick rotation after the initial flick. Thresholds are
    /// in radians of stick rotation per update and absorb stick resolution.
    pub smoothing: SmoothingSettings,
}

impl Default for FlickStickSettings {
    fn default() -> Self {
        Self {
            flick_threshold: 0.9,
            flick_time: 0.1,
            snapping: FlickSnapping::None,
            snapping_forward_deadzone: 7.0 * DEG_TO_RAD,
            snapping_strength: 1.0,
            smoothing: SmoothingSettings {
                time: 0.064,
                threshold_smooth: 0.02,
                threshold_direct: 0.04,
                inputs_per_second: 256,
            },
        }
    }
}

/// Complementary gravity filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplementarySettings {
    /// How strongly the accelerometer pulls the estimate, typically 0.5
    pub gain: f32,
    /// Angle in degrees between measured and expected gravity above which
    /// the accelerometer is ignored. Zero or 90 or more disables rejection.
    pub acceleration_rejection: f32,
    /// Consecutive rejected samples before the accelerometer is forced back
    /// in. Zero disables recovery.
    pub recovery_trigger_period: u32,
}

impl Default for ComplementarySettings {
    fn default() -> Self {
        Self {
            gain: 0.5,
            acceleration_rejection: 90.0,
            recovery_trigger_period: 0,
        }
    }
}
