//! Position evaluation.
//!
//! Scores a Hex position from one side's perspective, either cheaply from
//! piece placement or accurately from connection distances.

pub mod distance;
pub mod heuristic;

pub use distance::{path_distance, path_distance_bounded};
pub use heuristic::{accurate_evaluate, accurate_evaluate_bounded, fast_evaluate, WIN_SCORE};
