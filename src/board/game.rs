//! The game-state abstraction consumed by evaluation and search.
//!
//! Evaluation, rollouts, and the decision engine only ever talk to a
//! position through this trait. `HexState` is the board shipped with the
//! crate; any other representation that answers the same questions can be
//! searched unchanged.

use super::action::LightAction;
use super::cell::{Cell, Direction, NeighbourKind, PieceType};

/// A neighbouring position as seen from one piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub direction: Direction,
    pub kind: NeighbourKind,
    /// None when the neighbour falls off the board.
    pub cell: Option<Cell>,
}

pub trait GameState: Sized {
    /// The internal, fully resolved move type.
    type Action: Clone;

    /// True once either side has connected its goal edges.
    fn is_terminal(&self) -> bool;

    /// Final score of `piece`. Only meaningful on terminal positions.
    fn score_of(&self, piece: PieceType) -> f64;

    /// The piece type to move next.
    fn next_piece(&self) -> PieceType;

    /// All legal moves for the side to move.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Returns the successor position. Must not alias or mutate `self`.
    fn apply(&self, action: &Self::Action) -> Self;

    /// The six neighbours of `cell`, classified relative to `perspective`.
    fn neighbours(&self, cell: Cell, perspective: PieceType) -> [Neighbour; 6];

    /// Piece occupying `cell`, if any.
    fn occupant(&self, cell: Cell) -> Option<PieceType>;

    /// Side length N of the N×N board.
    fn dimension(&self) -> usize;

    /// Converts an internal move into the external wire form.
    fn to_light(&self, action: &Self::Action) -> LightAction;
}
