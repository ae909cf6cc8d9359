//! Idle mode: random play for the human side
//!
//! Drives demo matches and soak tests through the same intents a player
//! would send.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::board::Side;
use super::state::{GamePhase, MatchState};

/// A human input aimed at a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Hide the chicken in one of the human's boxes
    Place { row: usize, column: usize },
    /// Blow up one of the AI's boxes
    Attack { row: usize, column: usize },
}

/// Pick a random legal intent, or `None` while the engine is busy
pub fn idle_intent<R: Rng>(state: &MatchState, rng: &mut R) -> Option<Intent> {
    if !state.awaiting_human() {
        return None;
    }

    match state.phase {
        GamePhase::Placement => {
            let row = state.human.row;
            let free: Vec<usize> = state
                .pyramid(Side::Human)
                .row(row)?
                .iter()
                .filter(|c| c.occupant.is_none())
                .map(|c| c.column())
                .collect();
            free.choose(rng).map(|&column| Intent::Place { row, column })
        }
        GamePhase::Attack => {
            let row = state.ai.row;
            let intact: Vec<usize> = state
                .pyramid(Side::Ai)
                .row(row)?
                .iter()
                .filter(|c| !c.destroyed)
                .map(|c| c.column())
                .collect();
            intact.choose(rng).map(|&column| Intent::Attack { row, column })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Pacing;
    use crate::sim::Match;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_idle_intent_matches_phase() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut game = Match::new(1, 5, Pacing::INSTANT);

        let intent = idle_intent(game.state(), &mut rng).unwrap();
        assert!(matches!(intent, Intent::Place { row: 0, .. }));
        assert!(game.apply(intent));

        let intent = idle_intent(game.state(), &mut rng).unwrap();
        assert!(matches!(intent, Intent::Attack { row: 0, .. }));
    }

    #[test]
    fn test_idle_play_always_finishes() {
        let mut rng = Pcg32::seed_from_u64(11);
        for seed in 0..25 {
            let mut game = Match::new(1, seed, Pacing::INSTANT);
            let mut moves = 0;
            while let Some(intent) = idle_intent(game.state(), &mut rng) {
                assert!(game.apply(intent));
                moves += 1;
                assert!(moves < 10_000, "match never ended");
            }
            assert!(game.outcome().is_some());
        }
    }

    #[test]
    fn test_no_intent_while_busy() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut game = Match::new(1, 3, Pacing::default());
        let intent = idle_intent(game.state(), &mut rng).unwrap();
        game.apply(intent);
        assert!(idle_intent(game.state(), &mut rng).is_none());
    }
}
