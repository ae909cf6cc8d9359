//! Game settings and policy constants
//!
//! Persisted as JSON next to the progress file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// How long resolution beats take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PacingPreset {
    /// No delays; every intent resolves synchronously
    Instant,
    #[default]
    Normal,
    Relaxed,
}

impl PacingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingPreset::Instant => "Instant",
            PacingPreset::Normal => "Normal",
            PacingPreset::Relaxed => "Relaxed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "instant" | "none" => Some(PacingPreset::Instant),
            "normal" => Some(PacingPreset::Normal),
            "relaxed" | "slow" => Some(PacingPreset::Relaxed),
            _ => None,
        }
    }

    /// Beat length as a percentage of the normal pacing
    pub fn scale_percent(&self) -> u32 {
        match self {
            PacingPreset::Instant => 0,
            PacingPreset::Normal => 100,
            PacingPreset::Relaxed => 150,
        }
    }
}

/// Delays between resolution steps, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Human placement -> AI placement
    pub ai_placement_ms: u32,
    /// Explosion shown before the hit/miss is revealed
    pub explosion_ms: u32,
    /// Revealed chicken shown before it bounces back
    pub reveal_ms: u32,
    /// Pause before the next attack or turn
    pub follow_up_ms: u32,
    /// Winner shown in the arena before game over
    pub arena_reveal_ms: u32,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            ai_placement_ms: 500,
            explosion_ms: 500,
            reveal_ms: 500,
            follow_up_ms: 300,
            arena_reveal_ms: 500,
        }
    }
}

impl Pacing {
    /// Zero-delay pacing
    pub const INSTANT: Pacing = Pacing {
        ai_placement_ms: 0,
        explosion_ms: 0,
        reveal_ms: 0,
        follow_up_ms: 0,
        arena_reveal_ms: 0,
    };

    pub fn scaled(&self, percent: u32) -> Self {
        let scale = |ms: u32| ms.saturating_mul(percent) / 100;
        Self {
            ai_placement_ms: scale(self.ai_placement_ms),
            explosion_ms: scale(self.explosion_ms),
            reveal_ms: scale(self.reveal_ms),
            follow_up_ms: scale(self.follow_up_ms),
            arena_reveal_ms: scale(self.arena_reveal_ms),
        }
    }

    pub fn is_instant(&self) -> bool {
        *self == Self::INSTANT
    }
}

/// Level unlock and scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Points awarded per completed level
    pub score_per_level: u64,
    /// Highest level that can be unlocked
    pub level_cap: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score_per_level: 100,
            level_cap: 10,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub pacing_preset: PacingPreset,
    /// Collapse all beats regardless of preset
    pub reduced_motion: bool,
    #[serde(default)]
    pub progression: Progression,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacing_preset: PacingPreset::Normal,
            reduced_motion: false,
            progression: Progression::default(),
        }
    }
}

impl Settings {
    /// Default file name for stored settings
    pub const STORAGE_FILE: &'static str = "crazy_bird_eggs_settings.json";

    pub fn from_preset(preset: PacingPreset) -> Self {
        Self {
            pacing_preset: preset,
            ..Self::default()
        }
    }

    /// Effective pacing (respects reduced_motion)
    pub fn pacing(&self) -> Pacing {
        if self.reduced_motion {
            Pacing::INSTANT
        } else {
            Pacing::default().scaled(self.pacing_preset.scale_percent())
        }
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(PacingPreset::from_str("Instant"), Some(PacingPreset::Instant));
        assert_eq!(PacingPreset::from_str("SLOW"), Some(PacingPreset::Relaxed));
        assert_eq!(PacingPreset::from_str("fast"), None);
        assert_eq!(PacingPreset::Normal.as_str(), "Normal");
    }

    #[test]
    fn test_pacing_from_settings() {
        assert_eq!(Settings::default().pacing(), Pacing::default());
        assert!(Settings::from_preset(PacingPreset::Instant).pacing().is_instant());

        let relaxed = Settings::from_preset(PacingPreset::Relaxed).pacing();
        assert_eq!(relaxed.explosion_ms, 750);
        assert_eq!(relaxed.follow_up_ms, 450);

        let reduced = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(reduced.pacing().is_instant());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::STORAGE_FILE);

        let mut settings = Settings::from_preset(PacingPreset::Relaxed);
        settings.progression.level_cap = 5;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_load_missing_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("missing.json"));
        assert_eq!(settings, Settings::default());
    }
}
