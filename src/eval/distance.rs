//! Connection distance.
//!
//! Counts the fewest empty cells a piece type still has to fill to join its
//! two goal edges. Own pieces cost nothing to cross, empty cells cost one,
//! and opponent pieces block. Computed with a multi-source Dijkstra seeded
//! from the whole start edge, stopping at the first goal-edge cell that is
//! finalized.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::board::{Cell, GameState, NeighbourKind, PieceType};

/// Returns the connection distance for `piece`, bounded by the board
/// dimension.
///
/// If no route exists the dimension itself is returned, so that the result
/// always lies in `[0, N]` and stays comparable.
pub fn path_distance<S: GameState>(state: &S, piece: PieceType) -> u32 {
    path_distance_bounded(state, piece, state.dimension() as u32)
}

/// Same as [`path_distance`] with an explicit upper bound in place of the
/// board dimension.
pub fn path_distance_bounded<S: GameState>(state: &S, piece: PieceType, sentinel: u32) -> u32 {
    let dim = state.dimension();
    if dim == 0 {
        return sentinel;
    }

    let mut best = vec![u32::MAX; dim * dim];
    let mut finalized = vec![false; dim * dim];
    // (cost, discovery order, cell): equal costs pop in the order found.
    let mut heap: BinaryHeap<Reverse<(u32, u32, Cell)>> = BinaryHeap::with_capacity(dim * 4);
    let mut order: u32 = 0;

    for cell in piece.start_edge(dim) {
        let cost = match state.occupant(cell) {
            Some(p) if p == piece => 0,
            Some(_) => continue,
            None => 1,
        };
        let idx = cell.row * dim + cell.col;
        if cost < best[idx] {
            best[idx] = cost;
            heap.push(Reverse((cost, order, cell)));
            order += 1;
        }
    }

    while let Some(Reverse((dist, _, cell))) = heap.pop() {
        let idx = cell.row * dim + cell.col;
        if finalized[idx] {
            continue;
        }
        finalized[idx] = true;

        if piece.on_goal_edge(cell, dim) {
            return dist.min(sentinel);
        }

        for n in state.neighbours(cell, piece) {
            let step = match n.kind {
                NeighbourKind::Own => 0,
                NeighbourKind::Empty => 1,
                NeighbourKind::Opponent | NeighbourKind::OutOfBounds => continue,
            };
            let Some(next) = n.cell else {
                continue;
            };
            let ni = next.row * dim + next.col;
            if finalized[ni] {
                continue;
            }
            let cand = dist + step;
            if cand < best[ni] {
                best[ni] = cand;
                heap.push(Reverse((cand, order, next)));
                order += 1;
            }
        }
    }

    sentinel
}
