//! Gyro spaces: reducing a 3-axis reading to 2-axis camera motion
//!
//! Output X is vertical camera motion (pitch), output Y is horizontal camera
//! motion (yaw). How device rotation maps onto those depends on how the
//! controller is held, which is what the different spaces account for.

use nalgebra::{Vector2, Vector3};

use crate::error::Result;
use crate::math::{abs, clamp, sign, sqrt};
use crate::types::{GyroAxis, GyroState};

/// An algorithm for converting a fused gyro reading into 2-axis motion
pub trait GyroSpace {
    /// Angular velocity in radians per second: x is pitch, y is yaw
    fn transform(&self, state: &GyroState) -> Vector2<f32>;
}

/// Device-local axes
///
/// Picks two gyro axes directly and ignores gravity. Correct only when the
/// controller's orientation relative to the player is fixed, such as a
/// handheld with a built-in screen.
///
/// # Example
/// ```
/// use nalgebra::{Vector2, Vector3};
/// use gyro_controls::{GyroSpace, GyroState, LocalSpace};
///
/// // use roll instead of yaw for horizontal motion
/// let space = LocalSpace::from_indices(0, 2).unwrap();
/// let state = GyroState::new(Vector3::new(1.0, 2.0, 3.0), Vector3::zeros(), Vector3::zeros());
/// assert_eq!(space.transform(&state), Vector2::new(1.0, 3.0));
///
/// assert!(LocalSpace::from_indices(0, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSpace {
    /// Gyro axis used for vertical motion
    pub axis_x: GyroAxis,
    /// Gyro axis used for horizontal motion
    pub axis_y: GyroAxis,
    /// Negate roll before selecting axes
    pub invert_roll: bool,
}

impl LocalSpace {
    /// Builds a mapping from raw axis indices (0 pitch, 1 yaw, 2 roll)
    pub fn from_indices(axis_x: usize, axis_y: usize) -> Result<Self> {
        Ok(Self {
            axis_x: GyroAxis::try_from(axis_x)?,
            axis_y: GyroAxis::try_from(axis_y)?,
            invert_roll: false,
        })
    }
}

impl Default for LocalSpace {
    fn default() -> Self {
        Self {
            axis_x: GyroAxis::Pitch,
            axis_y: GyroAxis::Yaw,
            invert_roll: false,
        }
    }
}

impl GyroSpace for LocalSpace {
    fn transform(&self, state: &GyroState) -> Vector2<f32> {
        let mut gyro = state.gyro;
        if self.invert_roll {
            gyro[GyroAxis::Roll.index()] = -gyro[GyroAxis::Roll.index()];
        }
        Vector2::new(gyro[self.axis_x.index()], gyro[self.axis_y.index()])
    }
}

/// Magnitude of the yaw and roll components only
fn yaw_roll_magnitude(gyro: &Vector3<f32>) -> f32 {
    sqrt(gyro.y * gyro.y + gyro.z * gyro.z)
}

/// Player space, turn style
///
/// Turning the controller left and right relative to the player moves the
/// camera horizontally, however the controller is tilted. The direction
/// comes from the gyro projected onto gravity; the magnitude is capped by the
/// combined yaw and roll speed, so tilting never amplifies motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTurnSpace {
    /// Scales the gravity-projected yaw before capping it
    pub yaw_relax_factor: f32,
}

impl Default for PlayerTurnSpace {
    fn default() -> Self {
        Self {
            yaw_relax_factor: 2.0,
        }
    }
}

impl GyroSpace for PlayerTurnSpace {
    fn transform(&self, state: &GyroState) -> Vector2<f32> {
        let gyro = state.gyro;
        let gravity = state.gravity;

        // world yaw gives the direction, local yaw and roll give the magnitude
        let world_yaw = gyro.y * gravity.y + gyro.z * gravity.z;
        let magnitude = yaw_roll_magnitude(&gyro);

        let yaw = -sign(world_yaw) * (abs(world_yaw) * self.yaw_relax_factor).min(magnitude);
        Vector2::new(gyro.x, yaw)
    }
}

/// Player space, lean style
///
/// Tilting the controller like a steering wheel relative to the player moves
/// the camera horizontally. Near orientations where the pitch axis lines up
/// with gravity the roll axis is undefined, so horizontal output fades out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerLeanSpace {
    /// Scales the world roll before capping it
    pub roll_relax_factor: f32,
    /// Flatness/uprightness below which horizontal output is zero
    pub side_reduction_start: f32,
    /// Range above `side_reduction_start` over which output fades in
    pub side_reduction_width: f32,
}

impl Default for PlayerLeanSpace {
    fn default() -> Self {
        Self {
            roll_relax_factor: 1.15,
            side_reduction_start: 0.125,
            side_reduction_width: 0.125,
        }
    }
}

impl PlayerLeanSpace {
    fn side_reduction(&self, gravity: &Vector3<f32>) -> f32 {
        let flatness = abs(gravity.y); // 1 when lying flat
        let upness = abs(gravity.z); // 1 when standing upright
        let orientation = flatness.max(upness);

        if self.side_reduction_width <= 0.0 {
            return if orientation >= self.side_reduction_start { 1.0 } else { 0.0 };
        }
        clamp(
            (orientation - self.side_reduction_start) / self.side_reduction_width,
            0.0,
            1.0,
        )
    }
}

impl GyroSpace for PlayerLeanSpace {
    fn transform(&self, state: &GyroState) -> Vector2<f32> {
        let gyro = state.gyro;
        let gravity = state.gravity;

        // pitch axis projected onto the plane perpendicular to gravity
        let pitch_vector = Vector3::x() - gravity * gravity.x;
        let roll_vector = pitch_vector.cross(&gravity);

        // zero when pitch and gravity are parallel
        if roll_vector == Vector3::zeros() {
            return Vector2::new(gyro.x, 0.0);
        }
        let roll_vector = roll_vector.normalize();

        let side_reduction = self.side_reduction(&gravity);
        let world_roll = gyro.y * roll_vector.y + gyro.z * roll_vector.z;
        let magnitude = yaw_roll_magnitude(&gyro);

        let yaw = -sign(world_roll)
            * side_reduction
            * (abs(world_roll) * self.roll_relax_factor).min(magnitude);
        Vector2::new(gyro.x, yaw)
    }
}

/// Any of the built-in spaces, for switching at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GyroSpaceKind {
    Local(LocalSpace),
    PlayerTurn(PlayerTurnSpace),
    PlayerLean(PlayerLeanSpace),
}

impl Default for GyroSpaceKind {
    fn default() -> Self {
        GyroSpaceKind::PlayerTurn(PlayerTurnSpace::default())
    }
}

impl GyroSpace for GyroSpaceKind {
    fn transform(&self, state: &GyroState) -> Vector2<f32> {
        match self {
            GyroSpaceKind::Local(space) => space.transform(state),
            GyroSpaceKind::PlayerTurn(space) => space.transform(state),
            GyroSpaceKind::PlayerLean(space) => space.transform(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    const EPSILON: f32 = 1e-6;

    fn state(gyro: Vector3<f32>, gravity: Vector3<f32>) -> GyroState {
        GyroState::new(gyro, Vector3::zeros(), gravity)
    }

    #[test]
    fn test_local_default_axes() {
        let space = LocalSpace::default();
        let result = space.transform(&state(Vector3::new(1.0, 2.0, 3.0), Vector3::zeros()));
        assert_eq!(result, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_local_invert_roll() {
        let space = LocalSpace {
            axis_y: GyroAxis::Roll,
            invert_roll: true,
            ..Default::default()
        };
        let result = space.transform(&state(Vector3::new(1.0, 2.0, 3.0), Vector3::zeros()));
        assert_eq!(result, Vector2::new(1.0, -3.0));

        // only roll is affected
        let swapped = LocalSpace {
            axis_x: GyroAxis::Yaw,
            axis_y: GyroAxis::Pitch,
            invert_roll: true,
        };
        let result = swapped.transform(&state(Vector3::new(1.0, 2.0, 3.0), Vector3::zeros()));
        assert_eq!(result, Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_local_rejects_invalid_axis() {
        assert_eq!(LocalSpace::from_indices(3, 1), Err(ConfigError::InvalidAxis(3)));
        assert_eq!(LocalSpace::from_indices(0, 9), Err(ConfigError::InvalidAxis(9)));
    }

    #[test]
    fn test_player_turn_flat() {
        // lying flat, gravity along -Y: yaw rotation maps fully to output yaw
        let space = PlayerTurnSpace::default();
        let gravity = Vector3::new(0.0, -1.0, 0.0);

        let result = space.transform(&state(Vector3::new(0.5, 1.0, 0.0), gravity));
        assert!((result.x - 0.5).abs() < EPSILON);
        assert!((result.y - 1.0).abs() < EPSILON);

        let result = space.transform(&state(Vector3::new(0.0, -1.0, 0.0), gravity));
        assert!((result.y + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_player_turn_magnitude_capped() {
        let space = PlayerTurnSpace::default();
        // tilted 45 degrees: world yaw is scaled up by the relax factor but
        // never exceeds the local yaw/roll speed
        let s = core::f32::consts::FRAC_1_SQRT_2;
        let gravity = Vector3::new(0.0, -s, -s);
        let gyro = Vector3::new(0.0, 1.0, 0.0);
        let result = space.transform(&state(gyro, gravity));
        assert!((result.y - 1.0).abs() < EPSILON);

        // nearly perpendicular to gravity: small world yaw, relaxed by 2x
        let gravity = Vector3::new(0.0, -0.1, -sqrt(0.99));
        let result = space.transform(&state(Vector3::new(0.0, 1.0, 0.0), gravity));
        assert!((result.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_player_turn_zero_gravity() {
        let space = PlayerTurnSpace::default();
        let result = space.transform(&state(Vector3::new(0.3, 1.0, 1.0), Vector3::zeros()));
        assert_eq!(result, Vector2::new(0.3, 0.0));
    }

    #[test]
    fn test_player_lean_degenerate_roll_axis() {
        let space = PlayerLeanSpace::default();
        // gravity along the pitch axis: no roll axis can be derived
        let result = space.transform(&state(Vector3::new(0.4, 1.0, 1.0), Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(result, Vector2::new(0.4, 0.0));

        let result = space.transform(&state(Vector3::new(0.4, 1.0, 1.0), Vector3::zeros()));
        assert_eq!(result, Vector2::new(0.4, 0.0));
    }

    #[test]
    fn test_player_lean_upright() {
        let space = PlayerLeanSpace::default();
        // standing upright, gravity along -Z: roll vector lies along Y
        let gravity = Vector3::new(0.0, 0.0, -1.0);
        let result = space.transform(&state(Vector3::new(0.2, 1.0, 0.0), gravity));
        assert!((result.x - 0.2).abs() < EPSILON);
        assert!((result.y.abs() - 1.0).abs() < EPSILON);

        // rolling the opposite way flips the output
        let opposite = space.transform(&state(Vector3::new(0.2, -1.0, 0.0), gravity));
        assert!((opposite.y + result.y).abs() < EPSILON);
    }

    #[test]
    fn test_player_lean_side_reduction() {
        let space = PlayerLeanSpace::default();
        // mostly on its side: flatness and upness both small
        let gravity = Vector3::new(0.99, 0.1, 0.0).normalize();
        let result = space.transform(&state(Vector3::new(0.0, 0.0, 1.0), gravity));
        assert_eq!(result.y, 0.0);

        // at 0.1875 the fade is half way
        assert!((space.side_reduction(&Vector3::new(0.0, 0.1875, 0.0)) - 0.5).abs() < EPSILON);
        assert_eq!(space.side_reduction(&Vector3::new(0.0, 0.0, 0.9)), 1.0);
    }

    #[test]
    fn test_space_kind_dispatch() {
        let gyro_state = state(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, -1.0, 0.0));
        let local = GyroSpaceKind::Local(LocalSpace::default());
        assert_eq!(local.transform(&gyro_state), Vector2::new(1.0, 2.0));

        let turn = GyroSpaceKind::default();
        assert_eq!(
            turn.transform(&gyro_state),
            PlayerTurnSpace::default().transform(&gyro_state)
        );
    }
}
