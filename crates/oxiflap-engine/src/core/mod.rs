//! Core data types and physics constants for the obstacle-course world.
//!
//! The world uses a fixed-tick physics model: one tick corresponds to one
//! frame at a nominal 60 Hz, and every constant below is expressed per tick.
//! A variable-timestep model would change obstacle-clearance geometry, so it
//! is deliberately not supported; reproducibility of trials depends on every
//! run advancing in identical steps.

pub use self::{bird::*, obstacle::*};

mod bird;
mod obstacle;

/// Playfield width in pixels.
pub const SCREEN_WIDTH: f32 = 568.0;
/// Playfield height in pixels.
pub const SCREEN_HEIGHT: f32 = 512.0;

/// Fixed horizontal position of the bird's leading edge.
pub const BIRD_X: f32 = 60.0;
/// Width of the bird's bounding box.
pub const BIRD_WIDTH: f32 = 32.0;
/// Height of the bird's bounding box.
pub const BIRD_HEIGHT: f32 = 32.0;

/// Downward acceleration applied every tick.
pub const GRAVITY: f32 = 0.5;
/// Vertical velocity set by a flap (negative is upward).
pub const FLAP_IMPULSE: f32 = -8.0;

/// Leftward scroll speed of obstacles, in pixels per tick.
pub const SCROLL_SPEED: f32 = 3.0;
/// Horizontal extent of an obstacle column.
pub const OBSTACLE_WIDTH: f32 = 80.0;
/// Vertical extent of the gap the bird must fly through.
pub const GAP_HEIGHT: f32 = 150.0;
/// Minimum distance between the gap and the floor or ceiling.
pub const MIN_CLEARANCE: f32 = 50.0;
/// Ticks between consecutive obstacle spawns.
pub const SPAWN_INTERVAL: u64 = 90;
