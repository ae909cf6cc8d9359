//! Level configuration: the AI's scripted placements and attacks

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SCRIPT_LENGTH;
use crate::row_width;

/// Preferred AI columns for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAction {
    pub placement_column: usize,
    pub attack_column: usize,
}

/// A level: id plus the ordered AI script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub actions: Vec<AiAction>,
}

impl LevelConfig {
    /// Generate a level script, one action per row (arena included).
    ///
    /// Columns are drawn uniformly within the row's width at generation
    /// time. Callers replay the same config on restart.
    pub fn generate<R: Rng>(id: u32, rng: &mut R) -> Self {
        let actions = (0..SCRIPT_LENGTH)
            .map(|row| {
                let width = row_width(row).max(1);
                AiAction {
                    placement_column: rng.random_range(0..width),
                    attack_column: rng.random_range(0..width),
                }
            })
            .collect();

        log::info!("Generated level {} script", id);
        Self { id, actions }
    }

    /// Level with a hand-written script (tests, authored levels)
    pub fn from_actions(id: u32, actions: Vec<AiAction>) -> Self {
        Self { id, actions }
    }

    /// Action at the given script index, `None` once exhausted
    pub fn action(&self, index: usize) -> Option<AiAction> {
        self.actions.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_within_row_widths() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 1..=20 {
            let level = LevelConfig::generate(id, &mut rng);
            assert_eq!(level.id, id);
            assert_eq!(level.actions.len(), SCRIPT_LENGTH);
            for (row, action) in level.actions.iter().enumerate() {
                let width = row_width(row);
                assert!(action.placement_column < width);
                assert!(action.attack_column < width);
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = LevelConfig::generate(3, &mut Pcg32::seed_from_u64(42));
        let b = LevelConfig::generate(3, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_action_exhaustion() {
        let level = LevelConfig::from_actions(
            1,
            vec![AiAction {
                placement_column: 2,
                attack_column: 0,
            }],
        );
        assert_eq!(level.action(0).map(|a| a.placement_column), Some(2));
        assert!(level.action(1).is_none());
    }
}
