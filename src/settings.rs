//! Session settings
//!
//! Persisted as JSON. Every field has a default so partial files load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;
use crate::sim::spawn::{SpawnWeights, SpawnWeightsError};

/// Stock session length; custom lengths are flagged by `uses_default_limits`
pub const DEFAULT_GAME_DURATION_SECS: u32 = 60;
/// Stock bubble cap
pub const DEFAULT_MAX_BUBBLES: usize = 15;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("invalid spawn weights: {0}")]
    Weights(#[from] SpawnWeightsError),
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name the score is recorded under
    pub player_name: String,
    pub mode: GameMode,

    // === Limits ===
    /// Maximum live bubbles
    pub max_bubbles: usize,
    /// Length of the running phase
    pub game_duration_secs: u32,

    // === Pacing ===
    /// Spawn attempts per second
    pub bubbles_per_second: u32,
    /// Upper bound of the share of bubbles refreshed each second (classic)
    pub max_refresh_ratio: f32,
    /// Fall speed cap in units per movement tick (expert)
    pub max_velocity: i32,

    /// Variant distribution
    pub spawn_weights: SpawnWeights,
    /// Fixed RNG seed; drawn from the clock when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            mode: GameMode::Classic,

            max_bubbles: DEFAULT_MAX_BUBBLES,
            game_duration_secs: DEFAULT_GAME_DURATION_SECS,

            bubbles_per_second: 2,
            max_refresh_ratio: 0.5,
            max_velocity: 5,

            spawn_weights: SpawnWeights::default(),
            seed: None,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

impl Settings {
    /// Check option ranges. Spawn weights are already validated on construction.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_bubbles == 0 {
            return Err(invalid("max_bubbles", "must be at least 1"));
        }
        if self.game_duration_secs == 0 {
            return Err(invalid("game_duration_secs", "must be at least 1"));
        }
        if self.bubbles_per_second == 0 {
            return Err(invalid("bubbles_per_second", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.max_refresh_ratio) {
            return Err(invalid(
                "max_refresh_ratio",
                format!("{} is outside [0, 1]", self.max_refresh_ratio),
            ));
        }
        if self.max_velocity < 1 {
            return Err(invalid("max_velocity", "must be at least 1"));
        }
        if self.player_name.trim().is_empty() {
            return Err(invalid("player_name", "please enter a username"));
        }
        Ok(())
    }

    /// True when the session uses the stock 60 s / 15 bubble limits
    pub fn uses_default_limits(&self) -> bool {
        self.game_duration_secs == DEFAULT_GAME_DURATION_SECS
            && self.max_bubbles == DEFAULT_MAX_BUBBLES
    }

    /// Configured seed, or one derived from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Variant;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bubble-pop-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_bubbles, 15);
        assert_eq!(settings.game_duration_secs, 60);
        assert_eq!(settings.bubbles_per_second, 2);
        assert_eq!(settings.max_refresh_ratio, 0.5);
        assert_eq!(settings.max_velocity, 5);
        assert_eq!(settings.mode, GameMode::Classic);
        assert!(settings.validate().is_ok());
        assert!(settings.uses_default_limits());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"mode": "expert", "game_duration_secs": 30}"#).unwrap();
        assert_eq!(settings.mode, GameMode::Expert);
        assert_eq!(settings.game_duration_secs, 30);
        assert_eq!(settings.max_bubbles, 15);
        assert!(!settings.uses_default_limits());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            Settings { max_bubbles: 0, ..Default::default() },
            Settings { game_duration_secs: 0, ..Default::default() },
            Settings { bubbles_per_second: 0, ..Default::default() },
            Settings { max_refresh_ratio: 1.5, ..Default::default() },
            Settings { max_velocity: 0, ..Default::default() },
            Settings { player_name: "  ".to_string(), ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(SettingsError::InvalidValue { .. })),
                "{settings:?}"
            );
        }
    }

    #[test]
    fn test_bad_weights_fail_to_load() {
        let path = temp_path("bad-weights.json");
        std::fs::write(&path, r#"{"spawn_weights": {"red": 0.9}}"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = temp_path("settings.json");
        let settings = Settings {
            player_name: "Malena".to_string(),
            mode: GameMode::Expert,
            spawn_weights: SpawnWeights::new([(Variant::Blue, 0.5), (Variant::Black, 0.5)]).unwrap(),
            seed: Some(3),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.player_name, "Malena");
        assert_eq!(loaded.spawn_weights.weight(Variant::Black), 0.5);
        assert_eq!(loaded.resolve_seed(), 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_path("does-not-exist.json");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
