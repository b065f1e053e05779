//! Hex game state.
//!
//! Holds the occupancy of every cell, whose turn it is, and the winner once
//! a chain has been completed. Successor states are always fresh copies:
//! `apply` never touches the receiver.

use super::action::{HeavyAction, LightAction};
use super::cell::{Cell, NeighbourKind, PieceType, ALL_DIRECTIONS};
use super::game::{GameState, Neighbour};

/// Largest supported side length.
pub const MAX_DIMENSION: usize = 26;

/// Standard tournament board size.
pub const DEFAULT_DIMENSION: usize = 11;

/// Complete Hex position.
///
/// Cells are stored row-major in a flat vector of `dim * dim` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexState {
    dim: usize,
    cells: Vec<Option<PieceType>>,
    next: PieceType,
    step: u32,
    winner: Option<PieceType>,
}

impl HexState {
    /// Creates an empty board with `first` to move.
    pub fn empty(dim: usize, first: PieceType) -> Self {
        HexState {
            dim,
            cells: vec![None; dim * dim],
            next: first,
            step: 0,
            winner: None,
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row * self.dim + cell.col
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.dim && cell.col < self.dim
    }

    /// Places a piece without changing the side to move. Returns false if
    /// the cell is occupied or off the board.
    pub fn place(&mut self, cell: Cell, piece: PieceType) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        let idx = self.index(cell);
        if self.cells[idx].is_some() {
            return false;
        }
        self.cells[idx] = Some(piece);
        self.step += 1;
        if self.winner.is_none() && self.connects(piece) {
            self.winner = Some(piece);
        }
        true
    }

    /// Sets the side to move.
    pub fn set_next(&mut self, piece: PieceType) {
        self.next = piece;
    }

    /// Number of pieces placed so far.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn winner(&self) -> Option<PieceType> {
        self.winner
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.dim * self.dim).map(move |i| Cell::new(i / self.dim, i % self.dim))
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// True if `piece` has a chain joining both of its goal edges.
    pub fn connects(&self, piece: PieceType) -> bool {
        let mut seen = vec![false; self.dim * self.dim];
        let mut stack: Vec<Cell> = Vec::with_capacity(self.dim * 2);

        for cell in piece.start_edge(self.dim) {
            if self.cells[self.index(cell)] == Some(piece) {
                seen[self.index(cell)] = true;
                stack.push(cell);
            }
        }

        while let Some(cur) = stack.pop() {
            if piece.on_goal_edge(cur, self.dim) {
                return true;
            }
            for dir in ALL_DIRECTIONS {
                if let Some(n) = cur.step(dir, self.dim) {
                    let ni = self.index(n);
                    if !seen[ni] && self.cells[ni] == Some(piece) {
                        seen[ni] = true;
                        stack.push(n);
                    }
                }
            }
        }
        false
    }
}

impl GameState for HexState {
    type Action = HeavyAction;

    fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    fn score_of(&self, piece: PieceType) -> f64 {
        if self.winner == Some(piece) {
            1.0
        } else {
            0.0
        }
    }

    fn next_piece(&self) -> PieceType {
        self.next
    }

    fn legal_actions(&self) -> Vec<HeavyAction> {
        let piece = self.next;
        self.cells()
            .filter(|&c| self.cells[self.index(c)].is_none())
            .map(|cell| HeavyAction { piece, cell })
            .collect()
    }

    fn apply(&self, action: &HeavyAction) -> HexState {
        let mut next = self.clone();
        next.place(action.cell, action.piece);
        next.next = action.piece.opponent();
        next
    }

    fn neighbours(&self, cell: Cell, perspective: PieceType) -> [Neighbour; 6] {
        ALL_DIRECTIONS.map(|direction| match cell.step(direction, self.dim) {
            Some(n) => {
                let kind = match self.cells[self.index(n)] {
                    None => NeighbourKind::Empty,
                    Some(p) if p == perspective => NeighbourKind::Own,
                    Some(_) => NeighbourKind::Opponent,
                };
                Neighbour {
                    direction,
                    kind,
                    cell: Some(n),
                }
            }
            None => Neighbour {
                direction,
                kind: NeighbourKind::OutOfBounds,
                cell: None,
            },
        })
    }

    #[inline]
    fn occupant(&self, cell: Cell) -> Option<PieceType> {
        self.cells[self.index(cell)]
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dim
    }

    fn to_light(&self, action: &HeavyAction) -> LightAction {
        action.to_light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell::Direction;

    #[test]
    fn empty_state_has_all_moves() {
        let state = HexState::empty(4, PieceType::Red);
        assert_eq!(state.legal_actions().len(), 16);
        assert!(!state.is_terminal());
        assert_eq!(state.next_piece(), PieceType::Red);
        assert_eq!(state.score_of(PieceType::Red), 0.0);
    }

    #[test]
    fn place_rejects_duplicate_and_out_of_bounds() {
        let mut state = HexState::empty(3, PieceType::Red);
        assert!(state.place(Cell::new(1, 1), PieceType::Red));
        assert!(!state.place(Cell::new(1, 1), PieceType::Blue));
        assert!(!state.place(Cell::new(3, 0), PieceType::Blue));
        assert_eq!(state.step(), 1);
    }

    #[test]
    fn apply_does_not_mutate_parent() {
        let state = HexState::empty(3, PieceType::Red);
        let action = HeavyAction {
            piece: PieceType::Red,
            cell: Cell::new(0, 0),
        };
        let child = state.apply(&action);
        assert_eq!(state.occupant(Cell::new(0, 0)), None);
        assert_eq!(child.occupant(Cell::new(0, 0)), Some(PieceType::Red));
        assert_eq!(child.next_piece(), PieceType::Blue);
        assert_eq!(child.legal_actions().len(), 8);
    }

    #[test]
    fn red_column_wins() {
        let mut state = HexState::empty(3, PieceType::Red);
        state.place(Cell::new(0, 1), PieceType::Red);
        state.place(Cell::new(1, 1), PieceType::Red);
        assert!(!state.is_terminal());
        state.place(Cell::new(2, 1), PieceType::Red);
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(PieceType::Red));
        assert_eq!(state.score_of(PieceType::Red), 1.0);
        assert_eq!(state.score_of(PieceType::Blue), 0.0);
    }

    #[test]
    fn diagonal_chain_uses_hex_adjacency() {
        // (0,2) -> (1,1) -> (2,0) is connected via bottom-left steps.
        let mut state = HexState::empty(3, PieceType::Red);
        state.place(Cell::new(0, 2), PieceType::Red);
        state.place(Cell::new(1, 1), PieceType::Red);
        state.place(Cell::new(2, 0), PieceType::Red);
        assert!(state.connects(PieceType::Red));

        // (0,0) -> (1,1) is not a hex neighbour pair.
        let mut other = HexState::empty(3, PieceType::Red);
        other.place(Cell::new(0, 0), PieceType::Red);
        other.place(Cell::new(1, 1), PieceType::Red);
        other.place(Cell::new(2, 2), PieceType::Red);
        assert!(!other.connects(PieceType::Red));
    }

    #[test]
    fn blue_row_wins() {
        let mut state = HexState::empty(3, PieceType::Blue);
        for col in 0..3 {
            state.place(Cell::new(2, col), PieceType::Blue);
        }
        assert_eq!(state.winner(), Some(PieceType::Blue));
        assert!(!state.connects(PieceType::Red));
    }

    #[test]
    fn neighbours_classify_relative_to_perspective() {
        let mut state = HexState::empty(3, PieceType::Red);
        state.place(Cell::new(0, 1), PieceType::Red);
        state.place(Cell::new(1, 0), PieceType::Blue);
        let n = state.neighbours(Cell::new(1, 1), PieceType::Red);
        let kind = |d: Direction| n.iter().find(|x| x.direction == d).unwrap().kind;
        assert_eq!(kind(Direction::TopLeft), NeighbourKind::Own);
        assert_eq!(kind(Direction::Left), NeighbourKind::Opponent);
        assert_eq!(kind(Direction::Right), NeighbourKind::Empty);

        let corner = state.neighbours(Cell::new(0, 0), PieceType::Blue);
        let outside = corner
            .iter()
            .filter(|x| x.kind == NeighbourKind::OutOfBounds)
            .count();
        assert_eq!(outside, 4);
        assert!(corner
            .iter()
            .all(|x| (x.kind == NeighbourKind::OutOfBounds) == x.cell.is_none()));
    }

    #[test]
    fn terminal_state_still_lists_empty_cells() {
        let mut state = HexState::empty(2, PieceType::Blue);
        state.place(Cell::new(0, 0), PieceType::Red);
        state.place(Cell::new(1, 0), PieceType::Red);
        assert!(state.is_terminal());
        assert_eq!(state.legal_actions().len(), 2);
    }
}
