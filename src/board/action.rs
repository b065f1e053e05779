//! Heavy and light moves.
//!
//! A `HeavyAction` is what search iterates over. A `LightAction` is the
//! minimal form handed back to whoever drives the game, serialised as
//! `{"piece":"R","position":[row,col]}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, PieceType};

/// A placement as generated by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeavyAction {
    pub piece: PieceType,
    pub cell: Cell,
}

impl HeavyAction {
    /// Drops everything but piece and position.
    pub const fn to_light(self) -> LightAction {
        LightAction {
            piece: self.piece,
            position: (self.cell.row, self.cell.col),
        }
    }
}

/// External move representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightAction {
    pub piece: PieceType,
    pub position: (usize, usize),
}

impl LightAction {
    pub const fn cell(&self) -> Cell {
        Cell::new(self.position.0, self.position.1)
    }

    /// Encodes as a single-line JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }

    /// Parses the JSON form produced by `to_json`.
    pub fn from_json(s: &str) -> Result<LightAction, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for LightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{},{}",
            self.piece.notation_char(),
            self.position.0,
            self.position.1
        )
    }
}
