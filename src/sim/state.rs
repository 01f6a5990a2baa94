//! Session state and core simulation types
//!
//! Everything mutable about a running game lives in `GameState`. Handlers in
//! `tick` take it by `&mut` one at a time.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::{Bubble, BubbleId, Variant};
use super::placement::{PlacementError, PlacementStrategy, Rect, place};
use super::registry::BubbleRegistry;
use super::spawn::choose_variant;
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Game mode selected before the session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Static bubbles, refreshed every second
    #[default]
    Classic,
    /// Bubbles spawn at the top and fall
    Expert,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "static" => Some(GameMode::Classic),
            "expert" | "falling" => Some(GameMode::Expert),
            _ => None,
        }
    }

    /// Whether bubbles move in this mode
    pub fn is_falling(&self) -> bool {
        matches!(self, GameMode::Expert)
    }
}

/// Current phase of the session. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Launch countdown, nothing spawns or moves
    Countdown,
    /// Active gameplay
    Running,
    /// Session over (terminal)
    Ended,
}

/// Why a bubble left the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Tapped by the player
    Popped,
    /// Swapped out by the classic-mode refresh
    Refreshed,
    /// Fell through the floor in expert mode
    Exited,
    /// Flushed at the end of the session
    Cleared,
}

/// Notifications for the presentation layer, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CountdownChanged(u32),
    PhaseChanged(GamePhase),
    TimeChanged { remaining: u32, low: bool },
    BubbleSpawned { id: BubbleId, variant: Variant, pos: IVec2 },
    BubbleRemoved { id: BubbleId, cause: RemovalCause },
    ScoreChanged { total: u32, gained: u32 },
    /// Running total passed the stored best for this mode
    HighScoreBeaten(u32),
    VelocityChanged(i32),
    SessionComplete { score: u32, mode: GameMode },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub settings: Settings,
    /// Play area supplied by the presentation surface
    pub area: Rect,
    pub strategy: PlacementStrategy,
    pub phase: GamePhase,
    /// Seconds left in the launch countdown
    pub launch_countdown: u32,
    /// Seconds left in the running phase
    pub remaining_secs: u32,
    /// Fall speed in units per movement tick (expert mode)
    pub velocity: i32,
    pub previous_variant: Option<Variant>,
    pub total_score: u32,
    /// Best stored score for the mode when the session started
    pub highest_score: u32,
    pub high_score_beaten: bool,
    pub registry: BubbleRegistry,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the countdown phase.
    ///
    /// Fails when the settings (including spawn weights) do not validate.
    pub fn new(
        settings: &Settings,
        area: Rect,
        seed: u64,
        highest_score: u32,
    ) -> Result<Self, GameError> {
        settings.validate()?;

        log::info!(
            "New {} session: {}s, max {} bubbles, area {}x{}, seed {}",
            settings.mode.as_str(),
            settings.game_duration_secs,
            settings.max_bubbles,
            area.width(),
            area.height(),
            seed
        );

        Ok(Self {
            seed,
            settings: settings.clone(),
            area,
            strategy: PlacementStrategy::for_mode(settings.mode),
            phase: GamePhase::Countdown,
            launch_countdown: LAUNCH_COUNTDOWN_SECS,
            remaining_secs: settings.game_duration_secs,
            velocity: INITIAL_VELOCITY.min(settings.max_velocity),
            previous_variant: None,
            total_score: 0,
            highest_score,
            high_score_beaten: false,
            registry: BubbleRegistry::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }

    /// Number of live bubbles
    pub fn bubble_count(&self) -> usize {
        self.registry.len()
    }

    /// Live bubbles in ID order (current positions)
    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.registry.all_live()
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.emit(GameEvent::PhaseChanged(phase));
    }

    /// Pick a variant, place it and register it.
    ///
    /// Does not check the bubble cap; see `tick::spawn_tick`.
    pub fn spawn_bubble(&mut self) -> Result<BubbleId, PlacementError> {
        let variant = choose_variant(&self.settings.spawn_weights, &mut self.rng);
        let existing = self.registry.rects();
        let pos = place(
            self.strategy,
            variant.size(),
            &self.area,
            &existing,
            &mut self.rng,
        )?;
        let id = self.registry.insert(variant, pos);
        self.emit(GameEvent::BubbleSpawned { id, variant, pos });
        Ok(id)
    }

    /// Remove a bubble without scoring it. Absent IDs are ignored.
    pub fn remove_bubble(&mut self, id: BubbleId, cause: RemovalCause) -> Option<Bubble> {
        let removed = self.registry.remove(id)?;
        self.emit(GameEvent::BubbleRemoved { id, cause });
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 100, 375, 700)
    }

    #[test]
    fn test_new_session_starts_in_countdown() {
        let state = GameState::new(&Settings::default(), area(), 42, 17).unwrap();
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.launch_countdown, 3);
        assert_eq!(state.remaining_secs, 60);
        assert_eq!(state.velocity, 1);
        assert_eq!(state.highest_score, 17);
        assert_eq!(state.bubble_count(), 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            max_bubbles: 0,
            ..Default::default()
        };
        assert!(GameState::new(&settings, area(), 1, 0).is_err());
    }

    #[test]
    fn test_spawn_and_remove_emit_events() {
        let mut state = GameState::new(&Settings::default(), area(), 5, 0).unwrap();
        let id = state.spawn_bubble().unwrap();
        assert_eq!(state.bubble_count(), 1);
        assert!(state.remove_bubble(id, RemovalCause::Refreshed).is_some());
        assert!(state.remove_bubble(id, RemovalCause::Refreshed).is_none());

        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::BubbleSpawned { id: 0, .. }));
        assert_eq!(
            events[1],
            GameEvent::BubbleRemoved {
                id: 0,
                cause: RemovalCause::Refreshed
            }
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(&Settings::default(), area(), 99, 0).unwrap();
        let mut b = GameState::new(&Settings::default(), area(), 99, 0).unwrap();
        for _ in 0..10 {
            let _ = a.spawn_bubble();
            let _ = b.spawn_bubble();
        }
        let a_bubbles: Vec<_> = a.bubbles().cloned().collect();
        let b_bubbles: Vec<_> = b.bubbles().cloned().collect();
        assert_eq!(a_bubbles, b_bubbles);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(GameMode::from_str("Expert"), Some(GameMode::Expert));
        assert_eq!(GameMode::from_str("static"), Some(GameMode::Classic));
        assert_eq!(GameMode::from_str("zen"), None);
        assert!(GameMode::Expert.is_falling());
    }
}
