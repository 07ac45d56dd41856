//! Gyro processor: fused gyro state in, camera rotation out

use nalgebra::Vector2;

use crate::acceleration::GyroAcceleration;
use crate::momentum::GyroMomentum;
use crate::smoothing::TieredSmoothing2D;
use crate::space::{GyroSpace, PlayerTurnSpace};
use crate::types::{GyroState, ProcessorSettings};

/// Turns a [`GyroState`] into the camera rotation for one frame
///
/// Stages, in order: coordinate space, tiered smoothing, tightening,
/// acceleration, momentum. Everything up to momentum works in radians per
/// second; the result is integrated over `delta_time` into radians.
///
/// # Example
/// ```
/// use nalgebra::{Vector2, Vector3};
/// use gyro_controls::{GyroProcessor, GyroState, LocalSpace};
///
/// let mut processor = GyroProcessor::with_space(LocalSpace::default());
/// let state = GyroState::new(Vector3::new(1.0, 2.0, 0.0), Vector3::zeros(), Vector3::zeros());
///
/// let delta = processor.update(&state, 0.5);
/// assert_eq!(delta, Vector2::new(0.5, 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct GyroProcessor<S: GyroSpace = PlayerTurnSpace> {
    space: S,
    tightening_threshold: f32,
    smoothing: TieredSmoothing2D,
    acceleration: GyroAcceleration,
    momentum: GyroMomentum,
}

impl GyroProcessor<PlayerTurnSpace> {
    /// Creates a processor in player-turn space with default settings
    pub fn new() -> Self {
        Self::with_space(PlayerTurnSpace::default())
    }
}

impl Default for GyroProcessor<PlayerTurnSpace> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GyroSpace> GyroProcessor<S> {
    pub fn with_space(space: S) -> Self {
        Self::with_settings(space, ProcessorSettings::default())
    }

    pub fn with_settings(space: S, settings: ProcessorSettings) -> Self {
        Self {
            space,
            tightening_threshold: settings.tightening_threshold,
            smoothing: TieredSmoothing2D::with_settings(settings.smoothing),
            acceleration: GyroAcceleration::with_settings(settings.acceleration),
            momentum: GyroMomentum::with_settings(settings.momentum),
        }
    }

    pub fn settings(&self) -> ProcessorSettings {
        ProcessorSettings {
            tightening_threshold: self.tightening_threshold,
            smoothing: self.smoothing.settings(),
            acceleration: self.acceleration.settings(),
            momentum: self.momentum.settings(),
        }
    }

    /// Applies new settings without dropping smoothing or momentum state
    pub fn set_settings(&mut self, settings: ProcessorSettings) {
        self.tightening_threshold = settings.tightening_threshold;
        self.smoothing.set_settings(settings.smoothing);
        self.acceleration.set_settings(settings.acceleration);
        self.momentum.set_settings(settings.momentum);
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut S {
        &mut self.space
    }

    pub fn set_space(&mut self, space: S) {
        self.space = space;
    }

    pub fn momentum_active(&self) -> bool {
        self.momentum.is_active()
    }

    pub fn set_momentum_active(&mut self, active: bool) {
        self.momentum.set_active(active);
    }

    /// Returns the rotation in radians for a frame lasting `delta_time` seconds
    pub fn update(&mut self, state: &GyroState, delta_time: f32) -> Vector2<f32> {
        let velocity = self.space.transform(state);
        let velocity = self.smoothing.apply(velocity, delta_time);
        let velocity = Self::apply_tightening(velocity, self.tightening_threshold);
        let velocity = self.acceleration.transform(velocity);
        let velocity = self.momentum.update(velocity, delta_time);

        velocity * delta_time
    }

    /// Scales speeds below `threshold` linearly toward zero
    ///
    /// A soft deadzone: direction is preserved and there is no step at the
    /// threshold. A threshold of zero leaves the input untouched.
    pub fn apply_tightening(input: Vector2<f32>, threshold: f32) -> Vector2<f32> {
        let magnitude = input.norm();
        if magnitude < threshold {
            input * (magnitude / threshold)
        } else {
            input
        }
    }

    /// Clears smoothing history and stored momentum
    pub fn reset(&mut self) {
        self.smoothing.reset();
        self.momentum.reset();
    }
}
