//! Deterministic rules engine
//!
//! All duel logic lives here. This module must stay pure:
//! - Seeded or injected RNG only
//! - Time only through `Match::tick`
//! - No rendering, audio or storage dependencies

pub mod autoplay;
pub mod board;
pub mod engine;
pub mod level;
pub mod state;

pub use autoplay::{Intent, idle_intent};
pub use board::{Cell, CellState, Cursor, Pyramid, Side};
pub use engine::Match;
pub use level::{AiAction, LevelConfig};
pub use state::{
    ArenaState, GameEvent, GamePhase, MatchOutcome, MatchState, RngState, StatusMessage,
};
