//! Feature extraction: normalizing raw world state for the controllers.
//!
//! Every controller consumes the same fixed observation: six features derived
//! from the world snapshot, each scaled into a roughly unit range so that no
//! single input dominates the network's weighted sums.
//!
//! Velocity is derived from the previous tick's bird position rather than
//! read from the simulator, so a controller sees exactly what it could have
//! measured itself. The previous position is owned by the caller (the trial
//! runner) and passed in explicitly; on the first tick of a trial there is no
//! previous position and the velocity feature is zero.

use oxiflap_engine::WorldSnapshot;

/// Number of features in an observation.
pub const NUM_FEATURES: usize = 6;

/// Divisor for the signed gap-center offset (half the screen height).
const GAP_OFFSET_SCALE: f32 = 256.0;
/// Divisor for the horizontal distance (screen width).
const HORIZONTAL_SCALE: f32 = 568.0;
/// Divisor for the bird's vertical position (screen height).
const HEIGHT_SCALE: f32 = 512.0;
/// Divisor for the derived per-tick velocity.
const VELOCITY_SCALE: f32 = 10.0;
/// Raw gap-offset magnitude below which the bird counts as aligned.
const ALIGNMENT_THRESHOLD: f32 = 50.0;

/// A fixed-size normalized feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation(pub [f32; NUM_FEATURES]);

impl Observation {
    /// Extracts the observation for one tick.
    ///
    /// `previous_y` is the bird's vertical position on the previous tick, or
    /// `None` on the first tick of a trial.
    ///
    /// Features, in order:
    ///
    /// 1. signed gap-center offset (negative: bird below the gap)
    /// 2. horizontal distance to the next obstacle
    /// 3. bird vertical position
    /// 4. vertical velocity derived from `previous_y`
    /// 5. urgency: the horizontal distance capped at 1.0
    /// 6. alignment flag: 1.0 when the bird is nearly level with the gap
    #[must_use]
    pub fn from_snapshot(snapshot: &WorldSnapshot, previous_y: Option<f32>) -> Self {
        let velocity = previous_y.map_or(0.0, |prev| snapshot.bird_y - prev);
        let horizontal = snapshot.horizontal_distance / HORIZONTAL_SCALE;
        Self([
            snapshot.gap_offset / GAP_OFFSET_SCALE,
            horizontal,
            snapshot.bird_y / HEIGHT_SCALE,
            velocity / VELOCITY_SCALE,
            horizontal.min(1.0),
            if snapshot.gap_offset.abs() < ALIGNMENT_THRESHOLD {
                1.0
            } else {
                0.0
            },
        ])
    }

    /// Returns the features as a slice.
    #[must_use]
    pub fn features(&self) -> &[f32; NUM_FEATURES] {
        &self.0
    }
}
