use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::core::{
    BIRD_X, Bird, GAP_HEIGHT, MIN_CLEARANCE, Obstacle, SCREEN_HEIGHT, SCREEN_WIDTH, SPAWN_INTERVAL,
};

/// Upper bound on simultaneously live obstacles.
///
/// With the configured scroll speed and spawn cadence at most three obstacles
/// are ever on screen; the capacity leaves generous headroom so `push` can
/// never overflow even if the tuning constants change moderately.
const MAX_OBSTACLES: usize = 8;

/// Trial state machine: a world runs until its first collision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum WorldStatus {
    Running,
    Terminated,
}

/// Seed for deterministic obstacle placement.
///
/// Gap positions are the only source of randomness in a trial, so two worlds
/// created from the same seed and driven by the same decision sequence
/// produce identical tick-by-tick states. This enables reproducible fitness
/// trials, replayable runs, and deterministic tests.
///
/// # Example
///
/// ```
/// use oxiflap_engine::{World, WorldSeed};
/// use rand::Rng as _;
///
/// // Generate a random seed, then replay the same world twice.
/// let seed: WorldSeed = rand::rng().random();
/// let world1 = World::with_seed(seed);
/// let world2 = World::with_seed(seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl From<u64> for WorldSeed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Allows generating random `WorldSeed` values with `rng.random()`.
impl Distribution<WorldSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WorldSeed {
        WorldSeed(rng.random())
    }
}

/// Per-tick read-only view of the world, for controllers and renderers.
///
/// `gap_offset` and `horizontal_distance` are measured against the *next*
/// obstacle: the first obstacle, in spawn order, whose trailing edge has not
/// yet passed the bird. Exactly one such obstacle exists while the world is
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldSnapshot {
    /// Top edge of the bird's bounding box.
    pub bird_y: f32,
    /// Bird's vertical velocity (negative is upward).
    pub bird_velocity: f32,
    /// Gap center minus bird center: negative when the bird is below the gap.
    pub gap_offset: f32,
    /// Distance from the bird to the next obstacle's leading edge.
    pub horizontal_distance: f32,
    /// Elapsed ticks in this trial.
    pub ticks: u64,
    /// Obstacles cleared so far.
    pub score: u64,
    pub status: WorldStatus,
}

/// One trial's complete simulation state.
///
/// The world owns the bird, the live obstacles (kept sorted by horizontal
/// position: spawns happen at the right edge, retirement at the left), and
/// the seeded RNG driving gap placement. All mutation happens inside
/// [`step`](Self::step); everything else is read-only access.
#[derive(Debug, Clone)]
pub struct World {
    rng: Pcg32,
    bird: Bird,
    obstacles: ArrayVec<Obstacle, MAX_OBSTACLES>,
    ticks: u64,
    score: u64,
    ticks_since_spawn: u64,
    status: WorldStatus,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world with a random seed.
    ///
    /// For reproducible trials, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic
    /// obstacle placement.
    ///
    /// The bird starts centered with zero velocity and one obstacle is
    /// pre-spawned at the right edge of the screen.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::seed_from_u64(seed.0),
            bird: Bird::new(),
            obstacles: ArrayVec::new(),
            ticks: 0,
            score: 0,
            ticks_since_spawn: 0,
            status: WorldStatus::Running,
        };
        this.spawn_obstacle();
        this
    }

    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Returns the live obstacles, ordered left to right.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the number of obstacles cleared so far.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> WorldStatus {
        self.status
    }

    /// Returns the obstacle the bird must clear next.
    ///
    /// # Panics
    ///
    /// Panics if no unpassed obstacle exists. The spawn cadence guarantees
    /// one is always live, so this only fires on a broken invariant.
    #[must_use]
    pub fn next_obstacle(&self) -> &Obstacle {
        self.obstacles
            .iter()
            .find(|o| !o.is_passed())
            .expect("an unpassed obstacle should always be live")
    }

    /// Returns the per-tick state snapshot for controllers and renderers.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let next = self.next_obstacle();
        WorldSnapshot {
            bird_y: self.bird.y(),
            bird_velocity: self.bird.velocity(),
            gap_offset: next.gap_center() - self.bird.center_y(),
            horizontal_distance: next.x() - BIRD_X,
            ticks: self.ticks,
            score: self.score,
            status: self.status,
        }
    }

    /// Advances the world by one tick.
    ///
    /// Sub-steps run in a fixed order: flap impulse, gravity integration,
    /// obstacle scroll, retirement, pass scoring, spawn, collision detection.
    /// Once terminated, further calls leave the world unchanged.
    pub fn step(&mut self, flap: bool) -> WorldStatus {
        if self.status.is_terminated() {
            return self.status;
        }
        self.ticks += 1;

        if flap {
            self.bird.flap();
        }
        self.bird.fall();

        for obstacle in &mut self.obstacles {
            obstacle.advance();
        }
        self.obstacles.retain(|o| !o.is_offscreen());

        for obstacle in &mut self.obstacles {
            if !obstacle.is_passed() && obstacle.trailing_edge() < BIRD_X {
                obstacle.mark_passed();
                self.score += 1;
            }
        }

        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= SPAWN_INTERVAL {
            self.spawn_obstacle();
            self.ticks_since_spawn = 0;
        }

        if self.is_colliding() {
            self.status = WorldStatus::Terminated;
        }
        self.status
    }

    /// Spawns a new obstacle at the right edge with a uniformly random gap
    /// position that leaves minimum clearance to floor and ceiling.
    fn spawn_obstacle(&mut self) {
        let min_center = MIN_CLEARANCE + GAP_HEIGHT / 2.0;
        let max_center = SCREEN_HEIGHT - MIN_CLEARANCE - GAP_HEIGHT / 2.0;
        let gap_center = self.rng.random_range(min_center..=max_center);
        self.obstacles.push(Obstacle::new(SCREEN_WIDTH, gap_center));
    }

    fn is_colliding(&self) -> bool {
        self.bird.is_out_of_bounds() || self.obstacles.iter().any(|o| o.is_colliding(&self.bird))
    }
}
