//! Turn resolution
//!
//! Human intents enter through [`Match::place`] and [`Match::attack`]; the AI
//! answers on its own. Each beat of an exchange (explosion, reveal, follow-up)
//! is a single pending step advanced by [`Match::tick`]. Zero-length beats run
//! inline, so [`Pacing::INSTANT`] makes the whole engine synchronous.

use rand::Rng;
use rand_pcg::Pcg32;

use super::autoplay::Intent;
use super::board::{CellState, Side};
use super::level::{AiAction, LevelConfig};
use super::state::{
    ArenaState, GameEvent, GamePhase, MatchOutcome, MatchState, RngState, StatusMessage,
};
use crate::consts::*;
use crate::settings::Pacing;
use crate::{clamp_column, row_width};

/// A deferred continuation of the current exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AiPlacement,
    ResolveAttack {
        attacker: Side,
        row: usize,
        column: usize,
    },
    Bounce(Side),
    AiAttack,
    NextTurn,
    FinishMatch(Side),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    step: Step,
    remaining_ms: u32,
}

/// One level attempt against the scripted AI
#[derive(Debug, Clone)]
pub struct Match<R = Pcg32> {
    state: MatchState,
    level: LevelConfig,
    pacing: Pacing,
    rng: R,
    /// At most one step is ever in flight
    pending: Option<Pending>,
    events: Vec<GameEvent>,
}

impl Match<Pcg32> {
    /// Start a match on a freshly generated level, seeded for reproducibility
    pub fn new(level_id: u32, seed: u64, pacing: Pacing) -> Self {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let level = LevelConfig::generate(level_id, &mut rng);
        log::info!("Level {} seeded with {}", level_id, seed);
        let mut game = Self::with_rng(level, pacing, rng);
        game.state.rng_state = Some(rng_state);
        game
    }
}

impl<R: Rng> Match<R> {
    /// Start a match on a given level with an injected random source
    pub fn with_rng(level: LevelConfig, pacing: Pacing, rng: R) -> Self {
        Self {
            state: MatchState::new(),
            level,
            pacing,
            rng,
            pending: None,
            events: Vec::new(),
        }
    }

    /// Observable match state (pyramids, cursors, phase, flags)
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Level being played, including the AI script
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Current beat lengths
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Takes effect from the next scheduled beat
    pub fn set_pacing(&mut self, pacing: Pacing) {
        self.pacing = pacing;
    }

    /// Current phase
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Status line for the player
    pub fn message(&self) -> StatusMessage {
        self.state.message
    }

    /// Winner, once the match is over
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.state.outcome
    }

    /// An attack exchange is in progress; intents are rejected
    pub fn is_resolving(&self) -> bool {
        self.state.resolving
    }

    /// No beat is waiting to run
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Milliseconds until the pending beat fires
    pub fn time_to_next_step(&self) -> Option<u32> {
        self.pending.map(|p| p.remaining_ms)
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Human hides their chicken in a box of their current row.
    ///
    /// Returns false (and changes nothing) if the intent is out of turn,
    /// targets another row, or the box is taken.
    pub fn place(&mut self, row: usize, column: usize) -> bool {
        if !self.state.awaiting_human() || self.state.phase != GamePhase::Placement {
            log::debug!("Ignored placement at ({}, {}): not placing now", row, column);
            return false;
        }
        if row != self.state.human.row {
            log::debug!("Ignored placement at ({}, {}): wrong row", row, column);
            return false;
        }
        match self.state.human_pyramid.cell(row, column) {
            Some(cell) if cell.occupant.is_none() => {}
            _ => {
                log::debug!("Ignored placement at ({}, {}): box unavailable", row, column);
                return false;
            }
        }

        self.state.vacate(Side::Human);
        self.state.occupy(Side::Human, row, column);
        if let Some(cell) = self.state.human_pyramid.cell_mut(row, column) {
            cell.state = CellState::HoldingOccupant;
        }
        self.state.turn = Side::Ai;
        self.events.push(GameEvent::Placed {
            side: Side::Human,
            row,
            column,
        });

        self.schedule(self.pacing.ai_placement_ms, Step::AiPlacement);
        true
    }

    /// Human blows up a box in the AI's current row
    pub fn attack(&mut self, row: usize, column: usize) -> bool {
        if !self.state.awaiting_human() || self.state.phase != GamePhase::Attack {
            log::debug!("Ignored attack at ({}, {}): not attacking now", row, column);
            return false;
        }
        if row != self.state.ai.row || column >= row_width(row) {
            log::debug!("Ignored attack at ({}, {}): off target row", row, column);
            return false;
        }

        self.state.resolving = true;
        self.state.phase = GamePhase::Animating;
        self.start_attack(Side::Human, row, column);
        true
    }

    /// Apply an intent (see [`Intent`])
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Place { row, column } => self.place(row, column),
            Intent::Attack { row, column } => self.attack(row, column),
        }
    }

    /// Start the same level over. The AI script is replayed, not regenerated.
    pub fn restart_level(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Cancelled pending {:?}", pending.step);
        }
        self.state = MatchState::seeded(self.state.rng_state);
        self.events.push(GameEvent::Restarted {
            level_id: self.level.id,
        });
        log::info!("Restarted level {}", self.level.id);
    }

    /// Switch level; a different id gets a newly generated script
    pub fn start_level(&mut self, level_id: u32) {
        if level_id != self.level.id {
            self.level = LevelConfig::generate(level_id, &mut self.rng);
        }
        self.restart_level();
    }

    /// Whether a row should be highlighted as the human's current target
    pub fn should_highlight_row(&self, side: Side, row: usize) -> bool {
        let state = &self.state;
        if state.turn != Side::Human {
            return false;
        }
        match side {
            Side::Human => state.phase == GamePhase::Placement && row == state.human.row,
            Side::Ai => state.phase == GamePhase::Attack && row == state.ai.row,
        }
    }

    /// Advance pending beats by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: u32) {
        let mut budget = dt_ms;
        while let Some(pending) = self.pending {
            if pending.remaining_ms > budget {
                self.pending = Some(Pending {
                    remaining_ms: pending.remaining_ms - budget,
                    ..pending
                });
                return;
            }
            budget -= pending.remaining_ms;
            self.pending = None;
            self.run_step(pending.step);
        }
    }

    /// Run every remaining beat immediately
    pub fn settle(&mut self) {
        while let Some(pending) = self.pending.take() {
            self.run_step(pending.step);
        }
    }

    fn schedule(&mut self, delay_ms: u32, step: Step) {
        debug_assert!(self.pending.is_none(), "overlapping resolution steps");
        if delay_ms == 0 {
            self.run_step(step);
        } else {
            self.pending = Some(Pending {
                step,
                remaining_ms: delay_ms,
            });
        }
    }

    fn run_step(&mut self, step: Step) {
        match step {
            Step::AiPlacement => self.ai_placement(),
            Step::ResolveAttack {
                attacker,
                row,
                column,
            } => self.resolve_attack(attacker, row, column),
            Step::Bounce(side) => self.bounce(side),
            Step::AiAttack => self.ai_attack(),
            Step::NextTurn => self.next_turn(),
            Step::FinishMatch(winner) => self.finish_match(winner),
        }
    }

    /// Scripted column for the current step, or random once the script runs out
    fn scripted_column(&mut self, row: usize, pick: fn(&AiAction) -> usize) -> usize {
        match self.level.action(self.state.script_cursor) {
            Some(action) => clamp_column(row, pick(&action)),
            None => self.rng.random_range(0..row_width(row).max(1)),
        }
    }

    fn ai_placement(&mut self) {
        if self.state.phase != GamePhase::Placement {
            return;
        }
        let row = self.state.ai.row;
        if row >= ARENA_ROW {
            self.reach_arena(Side::Ai);
            return;
        }

        let column = self.scripted_column(row, |a| a.placement_column);
        self.state.occupy(Side::Ai, row, column);
        // Hidden from the human: the box keeps its normal look
        if let Some(cell) = self.state.ai_pyramid.cell_mut(row, column) {
            cell.state = CellState::Normal;
        }
        self.events.push(GameEvent::Placed {
            side: Side::Ai,
            row,
            column,
        });

        self.state.phase = GamePhase::Attack;
        self.state.turn = Side::Human;
        self.state.message = StatusMessage::SelectAttack;
    }

    fn start_attack(&mut self, attacker: Side, row: usize, column: usize) {
        if let Some(cell) = self.state.pyramid_mut(attacker.opponent()).cell_mut(row, column) {
            cell.state = CellState::Exploding;
        }
        self.events.push(GameEvent::AttackStarted {
            attacker,
            row,
            column,
        });
        self.schedule(
            self.pacing.explosion_ms,
            Step::ResolveAttack {
                attacker,
                row,
                column,
            },
        );
    }

    fn resolve_attack(&mut self, attacker: Side, row: usize, column: usize) {
        let defender = attacker.opponent();
        let Some(cell) = self.state.pyramid_mut(defender).cell_mut(row, column) else {
            log::warn!("Attack on missing box ({}, {})", row, column);
            self.next_turn();
            return;
        };

        if cell.occupant == Some(defender) {
            cell.state = CellState::OccupantOnly;
            self.state.message = match attacker {
                Side::Human => StatusMessage::HumanHit,
                Side::Ai => StatusMessage::AiHit,
            };
            self.events.push(GameEvent::Hit {
                attacker,
                row,
                column,
            });
            self.schedule(self.pacing.reveal_ms, Step::Bounce(defender));
        } else {
            cell.destroyed = true;
            cell.state = CellState::Destroyed;
            self.state.message = match attacker {
                Side::Human => StatusMessage::HumanMiss,
                Side::Ai => StatusMessage::AiMiss,
            };
            self.events.push(GameEvent::Miss {
                attacker,
                row,
                column,
            });
            let next = match attacker {
                Side::Human => Step::AiAttack,
                Side::Ai => Step::NextTurn,
            };
            self.schedule(self.pacing.follow_up_ms, next);
        }
    }

    /// Send a hit side back to row 0 and rebuild its destroyed boxes
    fn bounce(&mut self, side: Side) {
        self.state.reset_position(side);
        self.state.pyramid_mut(side).restore_destroyed();
        self.events.push(GameEvent::Bounced(side));
        log::debug!("{} bounced back to the start", side.as_str());

        let next = match side {
            Side::Ai => Step::AiAttack,
            Side::Human => Step::NextTurn,
        };
        self.schedule(self.pacing.follow_up_ms, next);
    }

    fn ai_attack(&mut self) {
        let row = self.state.human.row;
        if row >= ROW_COUNT {
            log::warn!("AI attack skipped: human row {} out of range", row);
            self.next_turn();
            return;
        }

        let column = self.scripted_column(row, |a| a.attack_column);
        self.state.message = StatusMessage::AiAttack;
        self.start_attack(Side::Ai, row, column);
    }

    fn next_turn(&mut self) {
        self.state.resolving = false;

        let human_bounced = self.state.human.column.is_none();
        let ai_bounced = self.state.ai.column.is_none();

        match (human_bounced, ai_bounced) {
            (false, true) => {
                if self.advance(Side::Human) >= ARENA_ROW {
                    self.reach_arena(Side::Human);
                } else {
                    self.await_placement();
                }
            }
            (true, false) => {
                if self.advance(Side::Ai) >= ARENA_ROW {
                    self.reach_arena(Side::Ai);
                } else {
                    self.await_placement();
                }
            }
            (false, false) => {
                let human_row = self.advance(Side::Human);
                let ai_row = self.advance(Side::Ai);
                // Human is checked first and wins a simultaneous arrival
                if human_row >= ARENA_ROW {
                    self.reach_arena(Side::Human);
                } else if ai_row >= ARENA_ROW {
                    self.reach_arena(Side::Ai);
                } else {
                    self.state.script_cursor += 1;
                    self.await_placement();
                }
            }
            (true, true) => self.await_placement(),
        }
    }

    fn advance(&mut self, side: Side) -> usize {
        let row = self.state.advance_row(side);
        self.events.push(GameEvent::Advanced { side, row });
        row
    }

    fn await_placement(&mut self) {
        self.state.phase = GamePhase::Placement;
        self.state.turn = Side::Human;
        self.state.message = StatusMessage::SelectPlacement;
    }

    fn reach_arena(&mut self, winner: Side) {
        if self.state.outcome.is_some() || self.state.arena != ArenaState::Empty {
            return;
        }

        self.state.phase = GamePhase::Animating;
        self.state.showing_arena_chicken = true;
        let (arena, message) = match winner {
            Side::Human => (ArenaState::ShowingHumanChicken, StatusMessage::HumanReachedArena),
            Side::Ai => (ArenaState::ShowingAiChicken, StatusMessage::AiReachedArena),
        };
        self.state.arena = arena;
        self.state.message = message;
        self.state.human_pyramid.restore_destroyed();
        self.state.ai_pyramid.restore_destroyed();
        self.events.push(GameEvent::ArenaReached(winner));
        log::info!("{} reached the arena on level {}", winner.as_str(), self.level.id);

        self.schedule(self.pacing.arena_reveal_ms, Step::FinishMatch(winner));
    }

    fn finish_match(&mut self, winner: Side) {
        let outcome = MatchOutcome::from(winner);
        self.state.showing_arena_chicken = false;
        self.state.arena = ArenaState::GameOver;
        self.state.phase = GamePhase::GameOver;
        self.state.outcome = Some(outcome);
        self.events.push(GameEvent::MatchOver(outcome));
        if winner == Side::Human {
            self.events.push(GameEvent::LevelCompleted {
                level_id: self.level.id,
            });
        }
        log::info!("Level {} over: {:?}", self.level.id, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::Cursor;
    use rand::SeedableRng;

    fn scripted(actions: &[(usize, usize)]) -> Match {
        let actions = actions
            .iter()
            .map(|&(placement_column, attack_column)| AiAction {
                placement_column,
                attack_column,
            })
            .collect();
        Match::with_rng(
            LevelConfig::from_actions(1, actions),
            Pacing::INSTANT,
            Pcg32::seed_from_u64(1),
        )
    }

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    #[test]
    fn test_initial_state() {
        let game = scripted(&[(0, 0)]);
        assert_eq!(game.phase(), GamePhase::Placement);
        assert_eq!(game.state().turn, Side::Human);
        assert_eq!(game.state().human, Cursor::default());
        assert_eq!(game.state().ai, Cursor::default());
        assert!(!game.is_resolving());
        assert!(game.should_highlight_row(Side::Human, 0));
        assert!(!game.should_highlight_row(Side::Human, 1));
        assert!(!game.should_highlight_row(Side::Ai, 0));
    }

    #[test]
    fn test_place_triggers_hidden_ai_placement() {
        let mut game = scripted(&[(3, 4)]);
        assert!(game.place(0, 2));

        let state = game.state();
        assert_eq!(state.human.position(), Some((0, 2)));
        assert_eq!(state.ai.position(), Some((0, 3)));
        assert_eq!(
            state.human_pyramid.cell(0, 2).unwrap().state,
            CellState::HoldingOccupant
        );
        let ai_cell = state.ai_pyramid.cell(0, 3).unwrap();
        assert_eq!(ai_cell.occupant, Some(Side::Ai));
        assert_eq!(ai_cell.state, CellState::Normal);

        assert_eq!(game.phase(), GamePhase::Attack);
        assert_eq!(state.turn, Side::Human);
        assert_eq!(game.message().as_str(), "Select a box to attack");
        assert!(game.should_highlight_row(Side::Ai, 0));
        assert!(!game.should_highlight_row(Side::Human, 0));
    }

    #[test]
    fn test_invalid_intents_are_ignored() {
        let mut game = scripted(&[(0, 0)]);
        assert!(!game.place(1, 0), "wrong row");
        assert!(!game.place(0, 5), "column out of range");
        assert!(!game.attack(0, 0), "attack during placement");
        assert_eq!(game.state(), &MatchState::new());

        assert!(game.place(0, 1));
        let snapshot = game.state().clone();
        assert!(!game.place(0, 2), "placement during attack");
        assert!(!game.attack(1, 0), "attack off the AI row");
        assert!(!game.attack(0, 7), "attack column out of range");
        assert_eq!(game.state(), &snapshot);
        assert_eq!(game.take_events().len(), 2);
    }

    #[test]
    fn test_hit_and_retaliating_hit_bounce_both() {
        let mut game = scripted(&[(1, 2)]);
        game.place(0, 2);
        assert!(game.attack(0, 1));

        let events = game.take_events();
        assert_eq!(count(&events, GameEvent::Bounced(Side::Ai)), 1);
        assert_eq!(count(&events, GameEvent::Bounced(Side::Human)), 1);
        assert!(events.contains(&GameEvent::AttackStarted {
            attacker: Side::Ai,
            row: 0,
            column: 2,
        }));

        let state = game.state();
        assert_eq!(state.human, Cursor::default());
        assert_eq!(state.ai, Cursor::default());
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(state.script_cursor, 0);
        assert!(!state.resolving);
        assert!(state.human_pyramid.cells().all(|c| c.state == CellState::Normal));
        assert!(state.ai_pyramid.cells().all(|c| c.state == CellState::Normal));
    }

    #[test]
    fn test_ai_bounced_human_advances_alone() {
        let mut game = scripted(&[(1, 3)]);
        game.place(0, 0);
        game.attack(0, 1);

        let state = game.state();
        assert_eq!(state.human, Cursor { row: 1, column: None });
        assert_eq!(state.ai, Cursor::default());
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(state.turn, Side::Human);
        assert_eq!(state.script_cursor, 0);

        // The AI's miss on the human side stays destroyed
        let missed = state.human_pyramid.cell(0, 3).unwrap();
        assert!(missed.destroyed);
        assert_eq!(missed.state, CellState::Destroyed);
        assert_eq!(state.human_pyramid.occupied_by(Side::Human), 0);
        assert!(game.should_highlight_row(Side::Human, 1));
    }

    #[test]
    fn test_double_miss_advances_both_and_consumes_script() {
        let mut game = scripted(&[(0, 0), (0, 0)]);
        game.place(0, 1);
        game.attack(0, 2);

        let state = game.state();
        assert!(state.ai_pyramid.cell(0, 2).unwrap().destroyed);
        assert!(state.human_pyramid.cell(0, 0).unwrap().destroyed);
        assert_eq!(state.human, Cursor { row: 1, column: None });
        assert_eq!(state.ai, Cursor { row: 1, column: None });
        assert_eq!(state.script_cursor, 1);
        assert_eq!(state.message, StatusMessage::SelectPlacement);
    }

    #[test]
    fn test_simultaneous_arrival_human_wins() {
        let mut game = scripted(&[(0, 0); 5]);
        for row in 0..ROW_COUNT {
            assert!(game.place(row, 1));
            assert!(game.attack(row, 1));
        }

        let state = game.state();
        assert_eq!(state.human.row, ARENA_ROW);
        assert_eq!(state.ai.row, ARENA_ROW);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome, Some(MatchOutcome::HumanWon));
        assert!(state.human_won());
        assert_eq!(state.arena, ArenaState::GameOver);
        assert!(!state.showing_arena_chicken);
        assert!(state.human_pyramid.cells().all(|c| !c.destroyed));
        assert!(state.ai_pyramid.cells().all(|c| !c.destroyed));

        let events = game.take_events();
        assert_eq!(count(&events, GameEvent::LevelCompleted { level_id: 1 }), 1);
        assert_eq!(count(&events, GameEvent::ArenaReached(Side::Human)), 1);
        assert_eq!(count(&events, GameEvent::ArenaReached(Side::Ai)), 0);

        assert!(!game.place(0, 0));
        assert!(!game.attack(ARENA_ROW, 0));
    }

    #[test]
    fn test_ai_wins_by_hitting_every_round() {
        let mut game = scripted(&[(0, 0)]);
        for round in 0..ROW_COUNT {
            assert_eq!(game.state().ai.row, round);
            assert!(game.place(0, 0));
            assert!(game.attack(round, 1));
        }

        let state = game.state();
        assert!(state.ai_won());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.human, Cursor::default());
        assert_eq!(state.script_cursor, 0);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::MatchOver(MatchOutcome::AiWon)));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelCompleted { .. }))
        );
    }

    #[test]
    fn test_script_columns_are_clamped() {
        let mut game = scripted(&[(9, 9); 5]);
        game.place(0, 0);
        assert_eq!(game.state().ai.column, Some(4));

        game.attack(0, 1);
        assert!(game.state().human_pyramid.cell(0, 4).unwrap().destroyed);
        assert_eq!(game.state().human.row, 1);

        game.place(1, 0);
        assert_eq!(game.state().ai.position(), Some((1, 3)));
    }

    #[test]
    fn test_exhausted_script_falls_back_to_random() {
        let mut game = scripted(&[]);
        game.place(0, 0);
        let column = game.state().ai.column.expect("AI placed");
        assert!(column < row_width(0));
    }

    #[test]
    fn test_restart_resets_state_keeps_script() {
        let mut game = Match::new(4, 2024, Pacing::INSTANT);
        let level = game.level().clone();
        game.place(0, 0);
        game.attack(0, 3);
        game.restart_level();

        assert_eq!(game.state(), &MatchState::seeded(Some(RngState::new(2024))));
        assert_eq!(game.level(), &level);
        assert!(game.is_idle());
        assert!(
            game.take_events()
                .contains(&GameEvent::Restarted { level_id: 4 })
        );
    }

    #[test]
    fn test_paced_exchange_blocks_intents() {
        let mut game = scripted(&[(2, 4)]);
        game.set_pacing(Pacing::default());

        assert!(game.place(0, 0));
        assert_eq!(game.state().turn, Side::Ai);
        assert!(game.state().ai.column.is_none());
        assert!(!game.place(0, 1));

        game.tick(499);
        assert!(game.state().ai.column.is_none());
        game.tick(1);
        assert_eq!(game.state().ai.column, Some(2));
        assert_eq!(game.phase(), GamePhase::Attack);

        assert!(game.attack(0, 2));
        assert!(game.is_resolving());
        assert_eq!(game.phase(), GamePhase::Animating);
        assert_eq!(
            game.state().ai_pyramid.cell(0, 2).unwrap().state,
            CellState::Exploding
        );
        let before = game.state().clone();
        assert!(!game.attack(0, 2));
        assert!(!game.attack(0, 3));
        assert!(!game.place(0, 1));
        assert_eq!(game.state(), &before);

        game.tick(500);
        assert_eq!(
            game.state().ai_pyramid.cell(0, 2).unwrap().state,
            CellState::OccupantOnly
        );
        assert_eq!(game.message(), StatusMessage::HumanHit);

        game.tick(500);
        assert_eq!(game.state().ai, Cursor::default());
        assert!(game.is_resolving());

        // Rejected mid-exchange: the AI is back on row 0 but the guard holds
        let before = game.state().clone();
        assert!(!game.attack(0, 1));
        assert!(!game.place(0, 2));
        assert_eq!(game.state(), &before);

        game.settle();
        assert!(!game.is_resolving());
        assert!(game.is_idle());
        // AI aimed at column 4 and missed; human moves up alone
        assert_eq!(game.state().human.row, 1);
        assert_eq!(game.phase(), GamePhase::Placement);
    }

    #[test]
    fn test_restart_cancels_in_flight_exchange() {
        let mut game = scripted(&[(2, 0)]);
        game.set_pacing(Pacing::default());
        game.place(0, 0);
        game.tick(500);
        game.attack(0, 2);
        assert!(game.time_to_next_step().is_some());

        game.restart_level();
        game.tick(10_000);
        assert_eq!(game.state(), &MatchState::new());
    }

    #[test]
    fn test_start_level_regenerates_only_for_new_id() {
        let mut game = Match::new(1, 77, Pacing::INSTANT);
        let first = game.level().clone();

        game.start_level(1);
        assert_eq!(game.level(), &first);

        game.start_level(2);
        assert_eq!(game.level().id, 2);
        assert_eq!(game.state(), &MatchState::seeded(Some(RngState::new(77))));
    }

    #[test]
    fn test_seed_recorded_in_snapshot() {
        let mut game = Match::new(3, 99, Pacing::INSTANT);
        assert_eq!(game.state().rng_state, Some(RngState::new(99)));

        game.place(0, 0);
        game.restart_level();
        game.start_level(5);
        assert_eq!(game.state().rng_state.map(|r| r.seed), Some(99));

        let snapshot = serde_json::to_value(game.state()).unwrap();
        assert_eq!(snapshot["rng_state"]["seed"], 99);
        let restored: MatchState = serde_json::from_value(snapshot).unwrap();
        assert_eq!(&restored, game.state());

        // Same seed rebuilds the same level script
        let replay = Match::new(3, restored.rng_state.unwrap().seed, Pacing::INSTANT);
        assert_eq!(replay.level(), Match::new(3, 99, Pacing::INSTANT).level());
    }

    #[test]
    fn test_injected_rng_has_no_seed() {
        let mut game = scripted(&[(0, 0)]);
        game.restart_level();
        assert!(game.state().rng_state.is_none());
    }

    #[test]
    fn test_seeded_matches_are_deterministic() {
        let mut a = Match::new(3, 99, Pacing::INSTANT);
        let mut b = Match::new(3, 99, Pacing::INSTANT);
        let moves = [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)];
        for &(row, column) in &moves {
            let row = row.max(a.state().human.row);
            a.place(row, column.min(row_width(row) - 1));
            b.place(row, column.min(row_width(row) - 1));
            let ai_row = a.state().ai.row;
            a.attack(ai_row, column.min(row_width(ai_row) - 1));
            b.attack(ai_row, column.min(row_width(ai_row) - 1));
        }
        assert_eq!(a.state(), b.state());
        assert_eq!(a.take_events(), b.take_events());
    }
}
