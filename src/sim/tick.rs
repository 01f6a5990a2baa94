//! Game loop handlers
//!
//! One function per trigger: the 1 Hz phase tick, the spawn cadence, the
//! expert-mode movement tick, and player taps. Each runs to completion on the
//! state before the next is dispatched, and every handler is a no-op once the
//! session has ended.

use rand::Rng;

use super::bubble::BubbleId;
use super::movement::{advance, ramp_velocity};
use super::scoring::score;
use super::state::{GameEvent, GamePhase, GameState, RemovalCause};
use crate::consts::LOW_TIME_SECS;
use crate::highscores::RankingStore;

/// Once-per-second tick: countdown, game clock, refresh/velocity ramp, end.
pub fn phase_tick(state: &mut GameState, store: &mut dyn RankingStore) {
    match state.phase {
        GamePhase::Countdown => {
            state.launch_countdown = state.launch_countdown.saturating_sub(1);
            state.emit(GameEvent::CountdownChanged(state.launch_countdown));
            if state.launch_countdown == 0 {
                state.set_phase(GamePhase::Running);
            }
        }

        GamePhase::Running => {
            state.remaining_secs = state.remaining_secs.saturating_sub(1);
            state.emit(GameEvent::TimeChanged {
                remaining: state.remaining_secs,
                low: state.remaining_secs < LOW_TIME_SECS,
            });

            if state.mode().is_falling() {
                let velocity =
                    ramp_velocity(state.velocity, state.remaining_secs, state.settings.max_velocity);
                if velocity != state.velocity {
                    log::debug!("Velocity {} -> {}", state.velocity, velocity);
                    state.velocity = velocity;
                    state.emit(GameEvent::VelocityChanged(velocity));
                }
            } else {
                refresh_bubbles(state);
            }

            if state.remaining_secs == 0 {
                end_game(state, store);
            }
        }

        GamePhase::Ended => {}
    }
}

/// Classic mode: swap a random share of the live bubbles for new ones.
///
/// Replaces `floor(count * ratio) + 1` bubbles, ratio drawn from
/// `[0, max_refresh_ratio]`.
fn refresh_bubbles(state: &mut GameState) {
    let max_ratio = state.settings.max_refresh_ratio;
    let ratio = if max_ratio > 0.0 {
        state.rng.random_range(0.0..=max_ratio)
    } else {
        0.0
    };
    let count = (state.bubble_count() as f32 * ratio) as usize + 1;
    log::debug!("Refreshing {} of {} bubbles", count, state.bubble_count());

    for _ in 0..count {
        let Some(id) = state.registry.pick_random(&mut state.rng).map(|b| b.id) else {
            break;
        };
        state.remove_bubble(id, RemovalCause::Refreshed);
        spawn_tick(state);
    }
}

/// Spawn cadence: add one bubble if the session is below its cap.
pub fn spawn_tick(state: &mut GameState) {
    if state.phase != GamePhase::Running || state.bubble_count() >= state.settings.max_bubbles {
        return;
    }
    if let Err(e) = state.spawn_bubble() {
        log::debug!("Spawn skipped: {}", e);
    }
}

/// Expert mode movement tick: drop every bubble and discard those that exit.
pub fn movement_tick(state: &mut GameState) {
    if state.phase != GamePhase::Running || !state.mode().is_falling() {
        return;
    }
    let exited = advance(
        state.registry.all_live_mut(),
        state.velocity,
        state.area.max.y,
    );
    for id in exited {
        log::trace!("Bubble {} left the play area", id);
        state.remove_bubble(id, RemovalCause::Exited);
    }
}

/// Player tapped bubble `id`. Returns the points awarded, or `None` when the
/// tap was ignored (not running, or the bubble is already gone).
pub fn tap(state: &mut GameState, id: BubbleId) -> Option<u32> {
    if state.phase != GamePhase::Running {
        return None;
    }
    let variant = state.registry.get(id)?.variant;

    let gained = score(variant, state.previous_variant);
    state.previous_variant = Some(variant);
    state.total_score += gained;
    state.remove_bubble(id, RemovalCause::Popped);
    state.emit(GameEvent::ScoreChanged {
        total: state.total_score,
        gained,
    });

    if !state.high_score_beaten && state.total_score > state.highest_score {
        state.high_score_beaten = true;
        state.emit(GameEvent::HighScoreBeaten(state.total_score));
    }

    Some(gained)
}

/// Enter the terminal phase: flush bubbles, report the score, signal completion.
///
/// Calling it again after the session ended does nothing.
pub fn end_game(state: &mut GameState, store: &mut dyn RankingStore) {
    if state.phase == GamePhase::Ended {
        return;
    }
    state.set_phase(GamePhase::Ended);

    for bubble in state.registry.drain() {
        state.emit(GameEvent::BubbleRemoved {
            id: bubble.id,
            cause: RemovalCause::Cleared,
        });
    }

    let mode = state.mode();
    let score = state.total_score;
    match store.update_high_score(&state.settings.player_name, score, mode) {
        Ok(true) => log::info!(
            "New best for {} in {} mode: {}",
            state.settings.player_name,
            mode.as_str(),
            score
        ),
        Ok(false) => log::info!("Final score {} (best unchanged)", score),
        Err(e) => log::warn!("Failed to record high score: {}", e),
    }

    state.emit(GameEvent::SessionComplete { score, mode });
}
