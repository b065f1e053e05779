//! Epsilon-greedy rollouts.
//!
//! Plays a position forward until it is decided or the step cap is hit.
//! Each ply either takes a uniformly random legal move or the move whose
//! successor maximises the fast evaluation for the side making it.

use rand::Rng;

use crate::board::{GameState, PieceType};
use crate::eval::fast_evaluate;

use super::SearchConfig;

/// Runs one rollout from `state` and returns the fast evaluation of the
/// final position from `me`'s perspective. `state` is left untouched.
pub fn rollout<S: GameState, R: Rng>(
    state: &S,
    me: PieceType,
    config: &SearchConfig,
    rng: &mut R,
) -> f64 {
    let mut current: Option<S> = None;

    for step in 0..config.rollout_depth {
        let pos = current.as_ref().unwrap_or(state);
        if pos.is_terminal() {
            break;
        }
        let actions = pos.legal_actions();
        if actions.is_empty() {
            break;
        }

        let next = if rng.gen::<f64>() < config.epsilon_at(step) {
            let pick = rng.gen_range(0..actions.len());
            pos.apply(&actions[pick])
        } else {
            greedy_successor(pos, &actions)
        };
        current = Some(next);
    }

    fast_evaluate(current.as_ref().unwrap_or(state), me)
}

/// Successor with the highest fast evaluation for the side to move. Ties
/// keep the first move generated.
fn greedy_successor<S: GameState>(state: &S, actions: &[S::Action]) -> S {
    let mover = state.next_piece();
    let mut best: Option<(f64, S)> = None;
    for action in actions {
        let child = state.apply(action);
        let score = fast_evaluate(&child, mover);
        let better = match &best {
            Some((b, _)) => score > *b,
            None => true,
        };
        if better {
            best = Some((score, child));
        }
    }
    match best {
        Some((_, child)) => child,
        None => state.apply(&actions[0]),
    }
}
