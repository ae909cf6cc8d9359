//! Level progression and score
//!
//! Persisted to a JSON file, tracks unlocked and completed levels.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::settings::Progression;

/// Receiver for match results
pub trait ProgressSink {
    /// Called once per match the human wins
    fn on_level_completed(&mut self, level_id: u32);

    /// Whether a level may be started; every level is open by default
    fn is_unlocked(&self, _level_id: u32) -> bool {
        true
    }
}

/// Unlocked levels, completed levels and total score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked_levels: u32,
    pub completed_levels: BTreeSet<u32>,
    pub total_score: u64,
    #[serde(skip)]
    rules: Progression,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(Progression::default())
    }
}

impl Progress {
    /// Default file name for stored progress
    pub const STORAGE_FILE: &'static str = "crazy_bird_eggs_progress.json";

    /// Fresh progress: only level 1 unlocked
    pub fn new(rules: Progression) -> Self {
        Self {
            unlocked_levels: 1,
            completed_levels: BTreeSet::new(),
            total_score: 0,
            rules,
        }
    }

    pub fn rules(&self) -> Progression {
        self.rules
    }

    pub fn with_rules(mut self, rules: Progression) -> Self {
        self.rules = rules;
        self
    }

    /// Mark a level completed, unlock the next one and award points
    pub fn complete_level(&mut self, level_id: u32) {
        self.completed_levels.insert(level_id);

        if level_id == self.unlocked_levels && self.unlocked_levels < self.rules.level_cap {
            self.unlocked_levels = level_id + 1;
            log::info!("Unlocked level {}", self.unlocked_levels);
        }

        self.add_score(self.rules.score_per_level);
    }

    pub fn add_score(&mut self, points: u64) {
        self.total_score = self.total_score.saturating_add(points);
    }

    pub fn is_level_completed(&self, level_id: u32) -> bool {
        self.completed_levels.contains(&level_id)
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        (1..=self.unlocked_levels).contains(&level_id)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }

    /// Load progress, starting fresh when missing or unreadable
    pub fn load(path: impl AsRef<Path>, rules: Progression) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(progress) => {
                log::info!(
                    "Loaded progress: {} levels unlocked, {} points",
                    progress.unlocked_levels,
                    progress.total_score
                );
                progress.with_rules(rules)
            }
            Err(err) => {
                log::warn!("No usable progress at {} ({}), starting fresh", path.display(), err);
                Self::new(rules)
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path)?;
        let mut progress: Self = serde_json::from_str(&json)?;
        // At least the first level is always playable
        progress.unlocked_levels = progress.unlocked_levels.max(1);
        Ok(progress)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Progress saved ({} completed)", self.completed_levels.len());
        Ok(())
    }
}

impl ProgressSink for Progress {
    fn on_level_completed(&mut self, level_id: u32) {
        self.complete_level(level_id);
    }

    fn is_unlocked(&self, level_id: u32) -> bool {
        Progress::is_unlocked(self, level_id)
    }
}
