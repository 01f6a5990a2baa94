//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by bubble ID)
//! - Handlers never overlap; the host serializes every trigger and tap
//! - No rendering or platform dependencies

pub mod bubble;
pub mod clock;
pub mod movement;
pub mod placement;
pub mod registry;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, BubbleId, Variant};
pub use clock::{Clock, Trigger};
pub use movement::{advance, ramp_velocity};
pub use placement::{PlacementError, PlacementStrategy, Rect, place};
pub use registry::BubbleRegistry;
pub use scoring::score;
pub use spawn::{SpawnWeights, SpawnWeightsError, choose_variant};
pub use state::{GameError, GameEvent, GameMode, GamePhase, GameState, RemovalCause};
pub use tick::{end_game, movement_tick, phase_tick, spawn_tick, tap};
