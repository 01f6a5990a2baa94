//! Demo player for headless runs
//!
//! Taps a random live bubble now and then. Uses its own RNG so it never
//! disturbs the session's spawn sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameState, tap};

#[derive(Debug, Clone)]
pub struct AutoTapper {
    rng: Pcg32,
    /// Chance of tapping on each step (0-1)
    pub tap_chance: f32,
    /// Only tap bubbles of the same variant as the last pop when possible
    pub chase_bonus: bool,
    pub taps: u32,
}

impl AutoTapper {
    pub fn new(seed: u64, tap_chance: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tap_chance: tap_chance.clamp(0.0, 1.0),
            chase_bonus: true,
            taps: 0,
        }
    }

    /// Maybe tap one bubble. Returns the points scored, if any.
    pub fn step(&mut self, state: &mut GameState) -> Option<u32> {
        if !self.rng.random_bool(f64::from(self.tap_chance)) {
            return None;
        }

        // Prefer a bubble that keeps the adjacency bonus going
        let same_color = if self.chase_bonus {
            state
                .previous_variant
                .and_then(|prev| state.bubbles().find(|b| b.variant == prev).map(|b| b.id))
        } else {
            None
        };
        let target = match same_color {
            Some(id) => Some(id),
            None => state.registry.pick_random(&mut self.rng).map(|b| b.id),
        }?;

        let gained = tap(state, target)?;
        self.taps += 1;
        log::debug!("Auto tap on bubble {} for {} points", target, gained);
        Some(gained)
    }
}
