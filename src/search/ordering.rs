//! Root move ordering.
//!
//! Moves that win on the spot come first with an infinite score, followed
//! by everything else sorted by descending accurate evaluation. The
//! successor of each move is computed here once and kept with the move so
//! that search never rebuilds it.

use crate::board::{GameState, PieceType};
use crate::eval::accurate_evaluate_bounded;

/// A root move with its cached successor and ranking score.
#[derive(Debug, Clone)]
pub struct RankedMove<A, S> {
    pub action: A,
    pub child: S,
    pub score: f64,
    pub immediate_win: bool,
}

/// Ranks `actions` from `state` for `me`, best first.
///
/// The sort is stable, so moves with equal scores keep generation order.
pub fn order_root_moves<S: GameState>(
    state: &S,
    actions: Vec<S::Action>,
    me: PieceType,
    sentinel: Option<u32>,
) -> Vec<RankedMove<S::Action, S>> {
    let mut ranked: Vec<RankedMove<S::Action, S>> = actions
        .into_iter()
        .map(|action| {
            let child = state.apply(&action);
            let immediate_win = child.is_terminal() && child.score_of(me) > 0.0;
            let score = if immediate_win {
                f64::INFINITY
            } else {
                accurate_evaluate_bounded(&child, me, sentinel)
            };
            RankedMove {
                action,
                child,
                score,
                immediate_win,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, HexState};

    #[test]
    fn immediate_win_comes_first() {
        let mut state = HexState::empty(4, PieceType::Red);
        for row in [0, 1, 3] {
            state.place(Cell::new(row, 2), PieceType::Red);
        }
        state.place(Cell::new(1, 0), PieceType::Blue);
        state.place(Cell::new(2, 0), PieceType::Blue);
        state.place(Cell::new(3, 0), PieceType::Blue);
        let actions = state.legal_actions();
        let n = actions.len();
        let ranked = order_root_moves(&state, actions, PieceType::Red, None);
        assert_eq!(ranked.len(), n);
        assert!(ranked[0].immediate_win);
        assert_eq!(ranked[0].score, f64::INFINITY);
        let wins: Vec<Cell> = ranked
            .iter()
            .filter(|m| m.immediate_win)
            .map(|m| m.action.cell)
            .collect();
        assert_eq!(wins, vec![Cell::new(2, 2)]);
        assert!(ranked[1..].iter().all(|m| m.score.is_finite()));
    }

    #[test]
    fn scores_are_descending() {
        let mut state = HexState::empty(5, PieceType::Blue);
        state.place(Cell::new(2, 2), PieceType::Red);
        state.place(Cell::new(1, 3), PieceType::Blue);
        let ranked = order_root_moves(&state, state.legal_actions(), PieceType::Blue, None);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn cached_child_matches_apply() {
        let state = HexState::empty(3, PieceType::Red);
        let ranked = order_root_moves(&state, state.legal_actions(), PieceType::Red, None);
        for m in &ranked {
            assert_eq!(m.child, state.apply(&m.action));
        }
    }

    #[test]
    fn ties_keep_generation_order() {
        // On an empty 2x2 board every Red placement leaves Red one cell
        // from connecting and Blue two cells, so all scores tie.
        let state = HexState::empty(2, PieceType::Red);
        let actions = state.legal_actions();
        let expected: Vec<Cell> = actions.iter().map(|a| a.cell).collect();
        let ranked = order_root_moves(&state, actions, PieceType::Red, None);
        let got: Vec<Cell> = ranked.iter().map(|m| m.action.cell).collect();
        assert_eq!(got, expected);
    }
}
