//! Periodic triggers driving the game loop
//!
//! Three fixed-period triggers share one timeline: the 1 Hz phase tick, the
//! spawn cadence and (expert mode only) the 100 Hz movement tick. `advance`
//! fires every callback that falls due, strictly in due-time order and one at
//! a time, so handlers never overlap. Time is counted in microseconds.

use std::time::Duration;

use super::state::GameState;
use super::tick::{movement_tick, phase_tick, spawn_tick};
use crate::consts::{MICROS_PER_SEC, MOVEMENT_PERIOD_MICROS};
use crate::highscores::RankingStore;

/// A repeating timer. First fires one period after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub period_micros: u64,
    pub next_due_micros: u64,
    pub active: bool,
}

impl Trigger {
    pub fn every(period_micros: u64) -> Self {
        let period_micros = period_micros.max(1);
        Self {
            period_micros,
            next_due_micros: period_micros,
            active: true,
        }
    }

    fn due_at_or_before(&self, now: u64) -> Option<u64> {
        (self.active && self.next_due_micros <= now).then_some(self.next_due_micros)
    }

    fn reschedule(&mut self) {
        self.next_due_micros += self.period_micros;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerKind {
    Phase,
    Spawn,
    Movement,
}

/// The session's timeline
#[derive(Debug, Clone)]
pub struct Clock {
    now_micros: u64,
    phase: Trigger,
    spawn: Trigger,
    movement: Option<Trigger>,
}

impl Clock {
    /// Build the triggers for a session. The movement trigger only exists in
    /// falling mode.
    pub fn new(state: &GameState) -> Self {
        let per_second = u64::from(state.settings.bubbles_per_second.max(1));
        Self {
            now_micros: 0,
            phase: Trigger::every(MICROS_PER_SEC),
            spawn: Trigger::every(MICROS_PER_SEC / per_second),
            movement: state
                .mode()
                .is_falling()
                .then(|| Trigger::every(MOVEMENT_PERIOD_MICROS)),
        }
    }

    /// Elapsed time since the session was created
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.now_micros)
    }

    /// Whether any trigger is still armed
    pub fn is_running(&self) -> bool {
        self.phase.active || self.spawn.active || self.movement.is_some_and(|m| m.active)
    }

    /// Stop every trigger. Later `advance` calls do nothing.
    pub fn cancel(&mut self) {
        self.phase.cancel();
        self.spawn.cancel();
        if let Some(movement) = self.movement.as_mut() {
            movement.cancel();
        }
    }

    /// Earliest due trigger; ties resolve phase, then spawn, then movement
    fn next_due(&self, until: u64) -> Option<(u64, TriggerKind)> {
        let candidates = [
            self.phase.due_at_or_before(until).map(|t| (t, TriggerKind::Phase)),
            self.spawn.due_at_or_before(until).map(|t| (t, TriggerKind::Spawn)),
            self.movement
                .and_then(|m| m.due_at_or_before(until))
                .map(|t| (t, TriggerKind::Movement)),
        ];
        candidates
            .into_iter()
            .flatten()
            .min_by_key(|(t, _)| *t)
    }

    /// Move time forward by `dt`, firing every handler that falls due.
    pub fn advance(&mut self, state: &mut GameState, dt: Duration, store: &mut dyn RankingStore) {
        if !self.is_running() {
            return;
        }
        let until = self.now_micros + dt.as_micros() as u64;

        while let Some((due, kind)) = self.next_due(until) {
            self.now_micros = due;
            match kind {
                TriggerKind::Phase => {
                    self.phase.reschedule();
                    phase_tick(state, store);
                }
                TriggerKind::Spawn => {
                    self.spawn.reschedule();
                    spawn_tick(state);
                }
                TriggerKind::Movement => {
                    if let Some(movement) = self.movement.as_mut() {
                        movement.reschedule();
                    }
                    movement_tick(state);
                }
            }

            if state.is_ended() {
                log::info!("Session ended after {:.2}s, stopping timers", self.elapsed().as_secs_f32());
                self.cancel();
                return;
            }
        }

        self.now_micros = until;
    }
}
