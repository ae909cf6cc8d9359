//! Pyramid geometry, boxes and player cursors

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::row_width;

/// One of the two duelling sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Human,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Human => "Human",
            Side::Ai => "AI",
        }
    }
}

/// Presentation state of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Normal,
    /// Box shown with the owner's chicken inside
    HoldingOccupant,
    /// Attack landing on the box
    Exploding,
    /// Box blown away, chicken revealed (hit)
    OccupantOnly,
    /// Box blown away, nothing inside (miss)
    Destroyed,
}

impl CellState {
    /// Transient states that only exist while an attack resolves
    pub fn is_transient(&self) -> bool {
        matches!(self, CellState::Exploding | CellState::OccupantOnly)
    }
}

/// A single box in a pyramid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: usize,
    column: usize,
    pub occupant: Option<Side>,
    pub destroyed: bool,
    pub state: CellState,
}

impl Cell {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            occupant: None,
            destroyed: false,
            state: CellState::Normal,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Empty the box and show it intact
    pub fn vacate(&mut self) {
        self.occupant = None;
        self.state = CellState::Normal;
    }

    /// Rebuild a box destroyed by a missed attack
    pub fn restore(&mut self) {
        if self.state == CellState::Destroyed {
            self.state = CellState::Normal;
            self.destroyed = false;
        }
    }
}

/// Four narrowing rows of boxes owned by one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pyramid {
    rows: Vec<Vec<Cell>>,
}

impl Default for Pyramid {
    fn default() -> Self {
        Self::new()
    }
}

impl Pyramid {
    /// Fresh pyramid: rows of width 5, 4, 3, 2
    pub fn new() -> Self {
        let rows = (0..ROW_COUNT)
            .map(|row| (0..row_width(row)).map(|col| Cell::new(row, col)).collect())
            .collect();
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    /// All boxes, outer row first
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Restore every destroyed box in this pyramid
    pub fn restore_destroyed(&mut self) {
        self.rows.iter_mut().flatten().for_each(Cell::restore);
    }

    /// Number of boxes holding the given side's chicken
    pub fn occupied_by(&self, side: Side) -> usize {
        self.cells().filter(|c| c.occupant == Some(side)).count()
    }
}

/// A side's position within its pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Current row (0..=3), or `ARENA_ROW` once the arena is reached
    pub row: usize,
    /// Column holding the chicken in the current row, if placed
    pub column: Option<usize>,
}

impl Cursor {
    pub fn position(&self) -> Option<(usize, usize)> {
        self.column.map(|column| (self.row, column))
    }

    pub fn has_reached_arena(&self) -> bool {
        self.row >= ARENA_ROW
    }

    /// Back to the outer row with nothing placed
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
