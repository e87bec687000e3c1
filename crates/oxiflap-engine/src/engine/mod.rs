//! Tick-based simulation engine.
//!
//! This module orchestrates the core data types into a playable world:
//!
//! - [`World`] - One trial's complete simulation state
//! - [`WorldSnapshot`] - Per-tick read-only view for controllers and renderers
//! - [`WorldStatus`] - Trial state machine (`Running` / `Terminated`)
//! - [`WorldSeed`] - Seed for deterministic obstacle placement
//!
//! # Trial Flow
//!
//! 1. Create a [`World`] (optionally from a [`WorldSeed`] for reproducibility)
//! 2. Each tick, read [`World::snapshot`] and decide whether to flap
//! 3. Call [`World::step`] with the decision
//! 4. Repeat until the status becomes `Terminated`
//!
//! Termination is the normal end of a trial, not an error: the final tick
//! count and score are the trial's result.
//!
//! A renderer drives the same loop one step per animation frame; batch
//! training runs it as a tight synchronous loop with no per-tick yielding.
//!
//! # Example
//!
//! ```
//! use oxiflap_engine::{World, WorldSeed};
//!
//! let mut world = World::with_seed(WorldSeed::from(42));
//! while world.status().is_running() && world.ticks() < 1000 {
//!     let snapshot = world.snapshot();
//!     // flap whenever the bird has sunk below the gap center
//!     world.step(snapshot.gap_offset < 0.0);
//! }
//! ```

pub use self::world::*;

mod world;
