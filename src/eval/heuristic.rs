//! Heuristic position evaluation.
//!
//! Two evaluators, both scored from the perspective of a given piece type
//! (positive favours that side):
//!
//! - `fast_evaluate`: centre proximity plus progress along each piece's own
//!   axis, summed per side. Cheap enough for every rollout step.
//! - `accurate_evaluate`: difference of connection distances. Two
//!   shortest-path searches per call, used only to rank root moves.
//!
//! Terminal positions short-circuit to `±WIN_SCORE`, a magnitude neither
//! evaluator can reach otherwise.

use crate::board::{Cell, GameState, PieceType};

use super::distance::path_distance_bounded;

/// Score of a decided game. Larger than any non-terminal evaluation.
pub const WIN_SCORE: f64 = 1000.0;

/// Weight of the centre-proximity falloff per unit of Manhattan distance.
const CENTRE_FALLOFF: f64 = 0.1;

/// Maximum centre bonus (piece on the exact centre).
const CENTRE_WEIGHT: f64 = 2.0;

/// Bonus for a piece sitting on its far edge.
const PROGRESS_WEIGHT: f64 = 2.0;

/// Points per cell of connection-distance lead.
const DISTANCE_WEIGHT: f64 = 10.0;

/// Returns `±WIN_SCORE` for a decided game, None otherwise.
#[inline]
fn terminal_score<S: GameState>(state: &S, me: PieceType) -> Option<f64> {
    if !state.is_terminal() {
        return None;
    }
    if state.score_of(me) > 0.0 {
        Some(WIN_SCORE)
    } else {
        Some(-WIN_SCORE)
    }
}

/// Value of a single piece of type `owner` at `cell`.
#[inline]
fn piece_value(owner: PieceType, cell: Cell, centre: f64, span: f64) -> f64 {
    let manhattan = (cell.row as f64 - centre).abs() + (cell.col as f64 - centre).abs();
    let centre_bonus = CENTRE_WEIGHT / (1.0 + manhattan * CENTRE_FALLOFF);
    let progress = owner.coordinate(cell) as f64 / span * PROGRESS_WEIGHT;
    centre_bonus + progress
}

/// Cheap positional evaluation for rollouts.
pub fn fast_evaluate<S: GameState>(state: &S, me: PieceType) -> f64 {
    if let Some(score) = terminal_score(state, me) {
        return score;
    }

    let dim = state.dimension();
    let centre = (dim as f64 - 1.0) / 2.0;
    let span = if dim > 1 { (dim - 1) as f64 } else { 1.0 };

    let mut mine = 0.0;
    let mut theirs = 0.0;
    for row in 0..dim {
        for col in 0..dim {
            let cell = Cell::new(row, col);
            let Some(owner) = state.occupant(cell) else {
                continue;
            };
            // Each piece advances along its owner's axis, not ours.
            let v = piece_value(owner, cell, centre, span);
            if owner == me {
                mine += v;
            } else {
                theirs += v;
            }
        }
    }
    mine - theirs
}

/// Connection-distance evaluation: `(their distance - my distance) * 10`.
pub fn accurate_evaluate<S: GameState>(state: &S, me: PieceType) -> f64 {
    accurate_evaluate_bounded(state, me, None)
}

/// [`accurate_evaluate`] with an explicit no-path sentinel. `None` uses the
/// board dimension.
pub fn accurate_evaluate_bounded<S: GameState>(
    state: &S,
    me: PieceType,
    sentinel: Option<u32>,
) -> f64 {
    if let Some(score) = terminal_score(state, me) {
        return score;
    }
    let bound = sentinel.unwrap_or(state.dimension() as u32);
    let mine = path_distance_bounded(state, me, bound) as f64;
    let theirs = path_distance_bounded(state, me.opponent(), bound) as f64;
    (theirs - mine) * DISTANCE_WEIGHT
}
