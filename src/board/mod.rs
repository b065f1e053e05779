//! Board representation and game-state types.
//!
//! Contains cells and piece types, heavy/light moves, the `GameState`
//! abstraction that search is written against, and the Hex board that
//! implements it.

pub mod action;
pub mod cell;
pub mod game;
pub mod state;

pub use action::{HeavyAction, LightAction};
pub use cell::{Axis, Cell, Direction, NeighbourKind, PieceType, ALL_DIRECTIONS, ALL_PIECES};
pub use game::{GameState, Neighbour};
pub use state::{HexState, DEFAULT_DIMENSION, MAX_DIMENSION};
