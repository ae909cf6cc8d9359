//! Crazy Bird Eggs - a turn-based pyramid duel
//!
//! Core modules:
//! - `sim`: Deterministic rules engine (pyramids, cursors, turn resolution)
//! - `progress`: Level unlocks and score, fed by completed matches
//! - `settings`: Pacing presets and progression policy
//! - `session`: Wires a match to the progress tracker

pub mod error;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::StorageError;
pub use progress::{Progress, ProgressSink};
pub use session::Session;
pub use settings::{Pacing, PacingPreset, Progression, Settings};

/// Board geometry constants
pub mod consts {
    /// Box rows in each pyramid
    pub const ROW_COUNT: usize = 4;
    /// Boxes in the outermost row; each inner row has one fewer
    pub const BASE_ROW_WIDTH: usize = 5;
    /// Row index one past the last box row (the central arena)
    pub const ARENA_ROW: usize = ROW_COUNT;
    /// Scripted AI actions generated per level (every row plus the arena)
    pub const SCRIPT_LENGTH: usize = 5;
}

/// Number of boxes in the given row (row 0 is widest)
#[inline]
pub fn row_width(row: usize) -> usize {
    consts::BASE_ROW_WIDTH.saturating_sub(row)
}

/// Clamp a column index into the valid range of a row
#[inline]
pub fn clamp_column(row: usize, column: usize) -> usize {
    column.min(row_width(row).saturating_sub(1))
}
