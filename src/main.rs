//! Bubble Pop headless runner
//!
//! Plays one session with the demo tapper at a fixed 10 ms step and records
//! the result in the leaderboard.
//!
//! Usage: `bubble-pop [settings.json] [highscores.json]`
//! `BUBBLE_POP_MODE=classic|expert` overrides the mode from the settings file.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::time::Duration;

    use bubble_pop::autoplay::AutoTapper;
    use bubble_pop::sim::{Clock, GameEvent, GameMode, GameState, Rect};
    use bubble_pop::{HighScoreTable, RankingStore, Settings};

    env_logger::init();
    log::info!("Bubble Pop (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let scores_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("highscores.json"));

    let mut settings = Settings::load_or_default(&settings_path);
    if let Ok(mode) = std::env::var("BUBBLE_POP_MODE") {
        match GameMode::from_str(&mode) {
            Some(mode) => settings.mode = mode,
            None => log::warn!("Invalid BUBBLE_POP_MODE '{}', using {}", mode, settings.mode.as_str()),
        }
    }
    if !settings.uses_default_limits() {
        log::warn!("Custom time or bubble limits: scores are not comparable with stock games");
    }

    let mut table = HighScoreTable::open(&scores_path);
    if let Err(e) = table.register_player(&settings.player_name) {
        log::warn!("Could not register {}: {}", settings.player_name, e);
    }

    // Portrait phone-sized play area
    let area = Rect::new(0, 0, 375, 600);
    let seed = settings.resolve_seed();
    let highest = table.highest_score(settings.mode);
    let mut state = match GameState::new(&settings, area, seed, highest) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Cannot start session: {e}");
            std::process::exit(1);
        }
    };
    let mut clock = Clock::new(&state);
    let mut tapper = AutoTapper::new(seed.wrapping_add(1), 0.05);

    let step = Duration::from_millis(10);
    while clock.is_running() {
        clock.advance(&mut state, step, &mut table);
        tapper.step(&mut state);

        for event in state.drain_events() {
            match event {
                GameEvent::CountdownChanged(secs) if secs > 0 => println!("{secs}..."),
                GameEvent::PhaseChanged(phase) => println!("== {phase:?} =="),
                GameEvent::TimeChanged { remaining, low } => {
                    let marker = if low { "!" } else { "" };
                    println!("time {remaining}{marker}  score {}", state.total_score);
                }
                GameEvent::HighScoreBeaten(score) => println!("New high score: {score}"),
                GameEvent::SessionComplete { score, mode } => {
                    println!("Final score ({}): {score}", mode.as_str());
                }
                _ => {}
            }
        }
    }

    println!("\nLeaderboard ({}):", settings.mode.as_str());
    for (rank, player) in table.leaderboard(settings.mode).iter().enumerate() {
        println!("{:>3}. {:<16} {}", rank + 1, player.name, player.score(settings.mode));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
