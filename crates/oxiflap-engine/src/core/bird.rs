use serde::{Deserialize, Serialize};

use super::{BIRD_HEIGHT, FLAP_IMPULSE, GRAVITY, SCREEN_HEIGHT};

/// The controlled agent: a vertical position and velocity.
///
/// The bird's horizontal position is fixed ([`BIRD_X`](super::BIRD_X)); only
/// obstacles move horizontally. Vertical position is the top edge of the
/// bounding box, with the y axis growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    y: f32,
    velocity: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    /// Creates a bird centered vertically with zero velocity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            y: (SCREEN_HEIGHT - BIRD_HEIGHT) / 2.0,
            velocity: 0.0,
        }
    }

    /// Returns the top edge of the bounding box.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Returns the current vertical velocity (negative is upward).
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Returns the vertical center of the bounding box.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + BIRD_HEIGHT / 2.0
    }

    /// Returns the bottom edge of the bounding box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + BIRD_HEIGHT
    }

    /// Replaces the vertical velocity with the fixed upward flap impulse.
    pub fn flap(&mut self) {
        self.velocity = FLAP_IMPULSE;
    }

    /// Advances one tick: accelerate under gravity, then integrate position.
    ///
    /// Position is never clamped; leaving the vertical play area is detected
    /// by collision checks, not prevented here.
    pub fn fall(&mut self) {
        self.velocity += GRAVITY;
        self.y += self.velocity;
    }

    /// Returns whether the bird has left the vertical play area.
    #[must_use]
    pub fn is_out_of_bounds(&self) -> bool {
        self.y < 0.0 || self.bottom() > SCREEN_HEIGHT
    }
}
