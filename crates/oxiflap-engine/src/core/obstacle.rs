use serde::{Deserialize, Serialize};

use super::{BIRD_X, BIRD_WIDTH, Bird, GAP_HEIGHT, OBSTACLE_WIDTH, SCROLL_SPEED};

/// A scrolling obstacle column with a vertical gap the bird must pass through.
///
/// Obstacles spawn at the right edge of the screen and scroll left at a fixed
/// speed. The column is solid above `gap_top` and below `gap_bottom`. Once the
/// trailing edge crosses the bird's horizontal position the obstacle counts as
/// passed and scores a point; once it scrolls fully off-screen it is retired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    x: f32,
    gap_top: f32,
    gap_bottom: f32,
    passed: bool,
}

impl Obstacle {
    /// Creates an obstacle at horizontal position `x` with the gap centered
    /// on `gap_center`.
    #[must_use]
    pub fn new(x: f32, gap_center: f32) -> Self {
        Self {
            x,
            gap_top: gap_center - GAP_HEIGHT / 2.0,
            gap_bottom: gap_center + GAP_HEIGHT / 2.0,
            passed: false,
        }
    }

    /// Returns the horizontal position of the leading (left) edge.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Returns the top of the gap (bottom edge of the upper column).
    #[must_use]
    pub fn gap_top(&self) -> f32 {
        self.gap_top
    }

    /// Returns the bottom of the gap (top edge of the lower column).
    #[must_use]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_bottom
    }

    /// Returns the vertical center of the gap.
    #[must_use]
    pub fn gap_center(&self) -> f32 {
        (self.gap_top + self.gap_bottom) / 2.0
    }

    /// Returns the horizontal position of the trailing (right) edge.
    #[must_use]
    pub fn trailing_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Returns whether the bird has already been scored against this obstacle.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Marks this obstacle as passed so it is scored exactly once.
    pub fn mark_passed(&mut self) {
        self.passed = true;
    }

    /// Scrolls the obstacle one tick to the left.
    pub fn advance(&mut self) {
        self.x -= SCROLL_SPEED;
    }

    /// Returns whether the obstacle has scrolled fully off the left edge.
    #[must_use]
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Checks whether the bird's bounding box overlaps this obstacle's solid
    /// (non-gap) region.
    #[must_use]
    pub fn is_colliding(&self, bird: &Bird) -> bool {
        let horizontal_overlap = BIRD_X < self.trailing_edge() && BIRD_X + BIRD_WIDTH > self.x;
        if !horizontal_overlap {
            return false;
        }
        bird.y() < self.gap_top || bird.bottom() > self.gap_bottom
    }
}
