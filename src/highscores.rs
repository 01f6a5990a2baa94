//! High score ranking
//!
//! `RankingStore` is what the game loop talks to at session start and end.
//! `HighScoreTable` keeps one record per player with a best score per mode,
//! optionally persisted as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

#[derive(Debug, thiserror::Error)]
pub enum ScoreUpdateError {
    #[error("player name is empty")]
    EmptyName,
    #[error("player {0:?} does not exist")]
    UnknownPlayer(String),
    #[error("failed to save high scores: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode high scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent ranking used by the game loop
pub trait RankingStore {
    /// Best score recorded by anyone in `mode` (0 when none)
    fn highest_score(&self, mode: GameMode) -> u32;

    /// Record `score` for `name`. Only persisted when it beats the player's
    /// stored best for `mode`; returns whether it did.
    fn update_high_score(
        &mut self,
        name: &str,
        score: u32,
        mode: GameMode,
    ) -> Result<bool, ScoreUpdateError>;
}

/// A single player's record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub classic_score: u32,
    pub expert_score: u32,
    /// Unix timestamp (ms) of the last session start
    pub last_played_ms: u64,
}

impl PlayerRecord {
    pub fn new(name: &str, now_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            classic_score: 0,
            expert_score: 0,
            last_played_ms: now_ms,
        }
    }

    pub fn score(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Classic => self.classic_score,
            GameMode::Expert => self.expert_score,
        }
    }

    pub fn set_score(&mut self, score: u32, mode: GameMode) {
        match mode {
            GameMode::Classic => self.classic_score = score,
            GameMode::Expert => self.expert_score = score,
        }
    }
}

/// Per-player high score table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScoreTable {
    pub players: Vec<PlayerRecord>,
    /// Backing file; `None` keeps the table in memory only
    #[serde(skip)]
    path: Option<PathBuf>,
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl HighScoreTable {
    /// Empty in-memory table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table stored at `path`, or start fresh if there is none.
    /// Later saves go to the same file.
    pub fn open(path: &Path) -> Self {
        let mut table = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScoreTable>(&json) {
                Ok(table) => {
                    log::info!("Loaded {} players from {}", table.players.len(), path.display());
                    table
                }
                Err(e) => {
                    log::warn!("Unreadable high scores at {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Cannot read high scores at {}: {}", path.display(), e);
                Self::new()
            }
        };
        table.path = Some(path.to_path_buf());
        table
    }

    /// Write the table to its backing file, if any
    pub fn save(&self) -> Result<(), ScoreUpdateError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(self)?;
            std::fs::write(path, json)?;
            log::info!("High scores saved ({} players)", self.players.len());
        }
        Ok(())
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Create the player, or mark an existing one as just played
    pub fn register_player(&mut self, name: &str) -> Result<(), ScoreUpdateError> {
        self.register_player_at(name, now_ms())
    }

    pub fn register_player_at(&mut self, name: &str, now_ms: u64) -> Result<(), ScoreUpdateError> {
        if name.trim().is_empty() {
            return Err(ScoreUpdateError::EmptyName);
        }
        match self.players.iter().position(|p| p.name == name) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.players[index].last_played_ms, now_ms);
                if let Err(e) = self.save() {
                    self.players[index].last_played_ms = previous;
                    return Err(e);
                }
            }
            None => {
                log::info!("New player {}", name);
                self.players.push(PlayerRecord::new(name, now_ms));
                if let Err(e) = self.save() {
                    self.players.pop();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Players ranked by best score in `mode`, highest first
    pub fn leaderboard(&self, mode: GameMode) -> Vec<&PlayerRecord> {
        let mut ranked: Vec<&PlayerRecord> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score(mode).cmp(&a.score(mode)));
        ranked
    }

    /// Most recently registered player (used to prefill the name)
    pub fn last_player(&self) -> Option<&PlayerRecord> {
        self.players.iter().max_by_key(|p| p.last_played_ms)
    }
}

impl RankingStore for HighScoreTable {
    fn highest_score(&self, mode: GameMode) -> u32 {
        self.players.iter().map(|p| p.score(mode)).max().unwrap_or(0)
    }

    fn update_high_score(
        &mut self,
        name: &str,
        score: u32,
        mode: GameMode,
    ) -> Result<bool, ScoreUpdateError> {
        let index = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ScoreUpdateError::UnknownPlayer(name.to_string()))?;
        let previous = self.players[index].score(mode);
        if score <= previous {
            return Ok(false);
        }

        // Only keep the new best once it is on disk
        self.players[index].set_score(score, mode);
        if let Err(e) = self.save() {
            self.players[index].set_score(previous, mode);
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = HighScoreTable::new();
        assert_eq!(table.highest_score(GameMode::Classic), 0);
        assert!(table.leaderboard(GameMode::Expert).is_empty());
        assert!(table.last_player().is_none());
    }

    #[test]
    fn test_update_only_when_better() {
        let mut table = HighScoreTable::new();
        table.register_player("ana").unwrap();

        assert!(table.update_high_score("ana", 40, GameMode::Classic).unwrap());
        assert!(!table.update_high_score("ana", 30, GameMode::Classic).unwrap());
        assert!(!table.update_high_score("ana", 40, GameMode::Classic).unwrap());
        assert_eq!(table.player("ana").unwrap().classic_score, 40);
        assert_eq!(table.player("ana").unwrap().expert_score, 0);
    }

    #[test]
    fn test_unknown_and_empty_names() {
        let mut table = HighScoreTable::new();
        assert!(matches!(
            table.update_high_score("ghost", 10, GameMode::Expert),
            Err(ScoreUpdateError::UnknownPlayer(_))
        ));
        assert!(matches!(table.register_player(""), Err(ScoreUpdateError::EmptyName)));
    }

    #[test]
    fn test_leaderboard_per_mode() {
        let mut table = HighScoreTable::new();
        for (name, classic, expert) in [("a", 10, 50), ("b", 30, 5), ("c", 20, 25)] {
            table.register_player(name).unwrap();
            table.update_high_score(name, classic, GameMode::Classic).unwrap();
            table.update_high_score(name, expert, GameMode::Expert).unwrap();
        }
        let classic: Vec<&str> = table
            .leaderboard(GameMode::Classic)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let expert: Vec<&str> = table
            .leaderboard(GameMode::Expert)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(classic, vec!["b", "c", "a"]);
        assert_eq!(expert, vec!["a", "c", "b"]);
        assert_eq!(table.highest_score(GameMode::Expert), 50);
    }

    #[test]
    fn test_last_player() {
        let mut table = HighScoreTable::new();
        table.register_player_at("old", 1_000).unwrap();
        table.register_player_at("new", 2_000).unwrap();
        assert_eq!(table.last_player().unwrap().name, "new");
        table.register_player_at("old", 3_000).unwrap();
        assert_eq!(table.last_player().unwrap().name, "old");
        assert_eq!(table.players.len(), 2);
    }

    #[test]
    fn test_persisted_table_reloads() {
        let path = std::env::temp_dir().join(format!("bubble-pop-{}-scores.json", std::process::id()));
        let mut table = HighScoreTable::open(&path);
        table.register_player("zoe").unwrap();
        table.update_high_score("zoe", 77, GameMode::Expert).unwrap();

        let reloaded = HighScoreTable::open(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reloaded.highest_score(GameMode::Expert), 77);
        assert_eq!(reloaded.player("zoe").unwrap().classic_score, 0);
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bubble-pop-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_failed_save_keeps_previous_best() {
        let path = temp_path("blocked-scores.json");
        let _ = std::fs::remove_file(&path);
        let mut table = HighScoreTable::open(&path);
        table.register_player("zoe").unwrap();

        // A directory in place of the file makes every save fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        let result = table.update_high_score("zoe", 50, GameMode::Classic);
        assert!(matches!(result, Err(ScoreUpdateError::Io(_))));
        assert_eq!(table.player("zoe").unwrap().classic_score, 0);
        assert!(matches!(table.register_player("max"), Err(ScoreUpdateError::Io(_))));
        assert!(table.player("max").is_none());

        // Once the file can be written again the same score is stored
        std::fs::remove_dir(&path).unwrap();
        assert!(table.update_high_score("zoe", 50, GameMode::Classic).unwrap());
        let reloaded = HighScoreTable::open(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reloaded.highest_score(GameMode::Classic), 50);
    }

    #[test]
    fn test_unreadable_path_starts_empty() {
        let path = temp_path("scores-dir");
        std::fs::create_dir_all(&path).unwrap();
        let table = HighScoreTable::open(&path);
        std::fs::remove_dir(&path).unwrap();
        assert!(table.players.is_empty());
        assert_eq!(table.highest_score(GameMode::Expert), 0);
    }
}
