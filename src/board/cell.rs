//! Cells, piece types, and hex directions.
//!
//! A Hex board is an N×N rhombus of cells addressed by `(row, col)`. Each
//! cell has up to six neighbours. Each piece type owns a fixed pair of
//! opposite edges that it must join with an unbroken chain to win.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Returns the neighbouring coordinate in `dir`, or None if it falls
    /// off the board.
    pub fn step(self, dir: Direction, dim: usize) -> Option<Cell> {
        let (dr, dc) = dir.offset();
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if row < 0 || col < 0 || row >= dim as isize || col >= dim as isize {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }
}

/// One of the two piece types.
///
/// Red joins the top row to the bottom row; Blue joins the left column to
/// the right column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "B")]
    Blue,
}

/// Both piece types, Red first.
pub const ALL_PIECES: [PieceType; 2] = [PieceType::Red, PieceType::Blue];

/// The board axis along which a piece type measures its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl PieceType {
    pub const fn opponent(self) -> PieceType {
        match self {
            PieceType::Red => PieceType::Blue,
            PieceType::Blue => PieceType::Red,
        }
    }

    /// The axis this piece type advances along.
    pub const fn axis(self) -> Axis {
        match self {
            PieceType::Red => Axis::Row,
            PieceType::Blue => Axis::Col,
        }
    }

    /// Position of `cell` along this piece type's progress axis.
    #[inline]
    pub const fn coordinate(self, cell: Cell) -> usize {
        match self.axis() {
            Axis::Row => cell.row,
            Axis::Col => cell.col,
        }
    }

    /// True if `cell` lies on the edge this piece type starts from.
    #[inline]
    pub const fn on_start_edge(self, cell: Cell) -> bool {
        self.coordinate(cell) == 0
    }

    /// True if `cell` lies on the edge this piece type must reach.
    #[inline]
    pub const fn on_goal_edge(self, cell: Cell, dim: usize) -> bool {
        self.coordinate(cell) + 1 == dim
    }

    /// Cells of the start edge, in order along the edge.
    pub fn start_edge(self, dim: usize) -> impl Iterator<Item = Cell> {
        (0..dim).map(move |i| match self.axis() {
            Axis::Row => Cell::new(0, i),
            Axis::Col => Cell::new(i, 0),
        })
    }

    /// Returns the single-character notation (`R` or `B`).
    pub const fn notation_char(self) -> char {
        match self {
            PieceType::Red => 'R',
            PieceType::Blue => 'B',
        }
    }

    /// Parses a piece type from its notation character.
    pub fn from_notation_char(c: char) -> Option<PieceType> {
        match c {
            'R' => Some(PieceType::Red),
            'B' => Some(PieceType::Blue),
            _ => None,
        }
    }

    /// Returns the lowercase side-to-move character used in HFEN.
    pub const fn side_char(self) -> char {
        match self {
            PieceType::Red => 'r',
            PieceType::Blue => 'b',
        }
    }

    /// Parses a side-to-move character.
    pub fn from_side_char(c: char) -> Option<PieceType> {
        match c {
            'r' => Some(PieceType::Red),
            'b' => Some(PieceType::Blue),
            _ => None,
        }
    }
}

/// The six hex directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    TopLeft,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomRight,
}

pub const ALL_DIRECTIONS: [Direction; 6] = [
    Direction::TopLeft,
    Direction::TopRight,
    Direction::Left,
    Direction::Right,
    Direction::BottomLeft,
    Direction::BottomRight,
];

impl Direction {
    /// Row/column delta for this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::TopLeft => (-1, 0),
            Direction::TopRight => (-1, 1),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::BottomLeft => (1, -1),
            Direction::BottomRight => (1, 0),
        }
    }
}

/// What lies in a neighbouring position, relative to a given piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighbourKind {
    Own,
    Opponent,
    Empty,
    OutOfBounds,
}
