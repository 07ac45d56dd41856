#![no_std]

//! Gyro Controls - turning controller motion sensors into camera aim
//!
//! This library takes raw gyroscope and accelerometer samples from a game
//! controller and produces per-frame camera rotation, plus a flick stick
//! mapping for the right stick.
//!
//! # Pipeline
//!
//! 1. [`GyroInput`] removes gyro bias, averages the samples of a frame and
//!    estimates gravity through a pluggable [`GravityEstimator`].
//! 2. [`GyroProcessor`] maps the fused reading into a [`GyroSpace`], then
//!    applies tiered smoothing, tightening, acceleration and momentum.
//! 3. [`FlickStick`] turns stick deflection into yaw snaps.
//!
//! # Features
//!
//! - Bias calibration with a running average
//! - Complementary gravity filter with accelerometer rejection
//! - Local, player-turn and player-lean gyro spaces
//! - Magnitude-dependent smoothing that leaves fast motion untouched
//! - `#![no_std]` compatible (requires `alloc`)
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::{Vector2, Vector3};
//! use gyro_controls::{FlickStick, GyroInput, GyroProcessor};
//!
//! let mut input = GyroInput::new();
//! let mut processor = GyroProcessor::new();
//! let mut flick = FlickStick::new();
//!
//! // One frame: feed every sample received since the last frame
//! input.begin();
//! input.input_accelerometer(Vector3::new(0.0, 9.81, 0.0), 0);
//! input.input_gyro(Vector3::new(0.0, 0.5, 0.0), 0); // rad/s, ns
//! input.input_accelerometer(Vector3::new(0.0, 9.81, 0.0), 4_000_000);
//! input.input_gyro(Vector3::new(0.0, 0.5, 0.0), 4_000_000);
//!
//! // Camera rotation for a 16ms frame, in radians (x: pitch, y: yaw)
//! let aim = processor.update(&input.gyro_state(), 0.016);
//!
//! // Yaw added by the right stick
//! let turn = flick.update(Vector2::new(0.0, 0.0), 0.016);
//! # let _ = (aim, turn);
//! ```

extern crate alloc;

mod acceleration;
mod average;
pub mod error;
mod flick;
mod gravity;
mod input;
pub mod math;
mod momentum;
mod processor;
mod smoothing;
pub mod space;
mod types;

// Re-export all public types
pub use acceleration::GyroAcceleration;
pub use average::{SampleAverage, TimedMovingAverage};
pub use error::{ConfigError, Result};
pub use flick::FlickStick;
pub use gravity::{ComplementaryGravity, GravityEstimator};
pub use input::GyroInput;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext};
pub use momentum::GyroMomentum;
pub use processor::GyroProcessor;
pub use smoothing::{TieredSmoothing1D, TieredSmoothing2D};
pub use space::{GyroSpace, GyroSpaceKind, LocalSpace, PlayerLeanSpace, PlayerTurnSpace};
pub use types::*;
