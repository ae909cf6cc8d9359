//! Match state and core duel types
//!
//! Everything the presentation layer observes lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Cursor, Pyramid, Side};

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Human picks a box in their current row
    Placement,
    /// Human picks an AI box to blow up
    Attack,
    /// An attack or the arena reveal is resolving
    Animating,
    /// Match ended
    GameOver,
}

/// What the central arena is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArenaState {
    #[default]
    Empty,
    ShowingHumanChicken,
    ShowingAiChicken,
    GameOver,
}

/// Terminal result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    HumanWon,
    AiWon,
}

impl MatchOutcome {
    pub fn winner(&self) -> Side {
        match self {
            MatchOutcome::HumanWon => Side::Human,
            MatchOutcome::AiWon => Side::Ai,
        }
    }
}

impl From<Side> for MatchOutcome {
    fn from(side: Side) -> Self {
        match side {
            Side::Human => MatchOutcome::HumanWon,
            Side::Ai => MatchOutcome::AiWon,
        }
    }
}

/// Status line shown above the boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusMessage {
    #[default]
    SelectPlacement,
    SelectAttack,
    HumanHit,
    HumanMiss,
    AiAttack,
    AiHit,
    AiMiss,
    HumanReachedArena,
    AiReachedArena,
}

impl StatusMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMessage::SelectPlacement => "Select a box to place",
            StatusMessage::SelectAttack => "Select a box to attack",
            StatusMessage::HumanHit => "You hit!!",
            StatusMessage::HumanMiss => "Miss..",
            StatusMessage::AiAttack => "AI attack!",
            StatusMessage::AiHit => "AI hit your chicken!",
            StatusMessage::AiMiss => "AI miss..",
            StatusMessage::HumanReachedArena => "You reached the arena!",
            StatusMessage::AiReachedArena => "AI reached the arena!",
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notifications emitted by the engine, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Placed { side: Side, row: usize, column: usize },
    AttackStarted { attacker: Side, row: usize, column: usize },
    Hit { attacker: Side, row: usize, column: usize },
    Miss { attacker: Side, row: usize, column: usize },
    /// Side was hit and sent back to row 0
    Bounced(Side),
    Advanced { side: Side, row: usize },
    ArenaReached(Side),
    MatchOver(MatchOutcome),
    LevelCompleted { level_id: u32 },
    Restarted { level_id: u32 },
}

/// RNG seed record, kept with the state for reproducibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Fresh generator positioned at the start of the seed's stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete per-attempt match state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub human_pyramid: Pyramid,
    pub ai_pyramid: Pyramid,
    pub human: Cursor,
    pub ai: Cursor,
    pub phase: GamePhase,
    pub turn: Side,
    pub message: StatusMessage,
    /// Index into the level's AI script
    pub script_cursor: usize,
    /// True exactly while an attack exchange is resolving
    pub resolving: bool,
    pub arena: ArenaState,
    /// Winner's chicken is on display in the arena
    pub showing_arena_chicken: bool,
    pub outcome: Option<MatchOutcome>,
    /// Seed of the match RNG; `None` when the RNG was injected
    #[serde(default)]
    pub rng_state: Option<RngState>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    /// Fresh state: full pyramids, both cursors at row 0, human to place
    pub fn new() -> Self {
        Self::seeded(None)
    }

    /// Fresh state carrying the seed that produced the match
    pub fn seeded(rng_state: Option<RngState>) -> Self {
        Self {
            human_pyramid: Pyramid::new(),
            ai_pyramid: Pyramid::new(),
            human: Cursor::default(),
            ai: Cursor::default(),
            phase: GamePhase::Placement,
            turn: Side::Human,
            message: StatusMessage::SelectPlacement,
            script_cursor: 0,
            resolving: false,
            arena: ArenaState::Empty,
            showing_arena_chicken: false,
            outcome: None,
            rng_state,
        }
    }

    pub fn pyramid(&self, side: Side) -> &Pyramid {
        match side {
            Side::Human => &self.human_pyramid,
            Side::Ai => &self.ai_pyramid,
        }
    }

    pub fn pyramid_mut(&mut self, side: Side) -> &mut Pyramid {
        match side {
            Side::Human => &mut self.human_pyramid,
            Side::Ai => &mut self.ai_pyramid,
        }
    }

    pub fn cursor(&self, side: Side) -> &Cursor {
        match side {
            Side::Human => &self.human,
            Side::Ai => &self.ai,
        }
    }

    pub fn cursor_mut(&mut self, side: Side) -> &mut Cursor {
        match side {
            Side::Human => &mut self.human,
            Side::Ai => &mut self.ai,
        }
    }

    pub fn human_won(&self) -> bool {
        self.outcome == Some(MatchOutcome::HumanWon)
    }

    pub fn ai_won(&self) -> bool {
        self.outcome == Some(MatchOutcome::AiWon)
    }

    /// Empty the box the side's cursor points at, if any
    pub fn vacate(&mut self, side: Side) {
        if let Some((row, column)) = self.cursor(side).position() {
            if let Some(cell) = self.pyramid_mut(side).cell_mut(row, column) {
                cell.vacate();
            }
        }
    }

    /// Put a side's chicken into a box and point its cursor there
    pub fn occupy(&mut self, side: Side, row: usize, column: usize) {
        if let Some(cell) = self.pyramid_mut(side).cell_mut(row, column) {
            cell.occupant = Some(side);
        }
        self.cursor_mut(side).column = Some(column);
    }

    /// Bounce a side back to the start of its pyramid
    pub fn reset_position(&mut self, side: Side) {
        self.vacate(side);
        self.cursor_mut(side).reset();
    }

    /// Move a side one row inward, leaving its box empty
    pub fn advance_row(&mut self, side: Side) -> usize {
        self.vacate(side);
        let cursor = self.cursor_mut(side);
        cursor.row += 1;
        cursor.column = None;
        cursor.row
    }

    /// Human may place or attack right now
    pub fn awaiting_human(&self) -> bool {
        !self.resolving
            && self.turn == Side::Human
            && matches!(self.phase, GamePhase::Placement | GamePhase::Attack)
    }
}
