//! Bubble Pop - an arcade bubble-popping game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, placement, scoring, game loop)
//! - `settings`: Session configuration
//! - `highscores`: Ranking store contract and per-player high score table
//! - `autoplay`: Demo player used by the headless runner

pub mod autoplay;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreTable, RankingStore, ScoreUpdateError};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Bubble diameter (all variants share it)
    pub const BUBBLE_SIZE: i32 = 50;
    /// Placement gives up after this many candidate positions
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 500;

    /// Seconds shown before the game starts
    pub const LAUNCH_COUNTDOWN_SECS: u32 = 3;
    /// Remaining time under which the clock is flagged as low
    pub const LOW_TIME_SECS: u32 = 10;

    /// Falling bubbles start at this many units per movement tick
    pub const INITIAL_VELOCITY: i32 = 1;
    /// Velocity gained at each ramp step
    pub const VELOCITY_STEP: i32 = 1;
    /// Velocity ramps every this many seconds of remaining time
    pub const VELOCITY_RAMP_SECS: u32 = 10;

    /// Microseconds per second (clock resolution)
    pub const MICROS_PER_SEC: u64 = 1_000_000;
    /// Movement tick period in expert mode (100 Hz)
    pub const MOVEMENT_PERIOD_MICROS: u64 = 10_000;

    /// Adjacency bonus multiplier, as a ratio (3/2 = 1.5x)
    pub const BONUS_NUMERATOR: u32 = 3;
    pub const BONUS_DENOMINATOR: u32 = 2;
}
