//! Search and planning.
//!
//! Ranks root moves with the accurate evaluator, then spends the move's
//! time budget on biased rollouts, allocating them across root moves with
//! a UCB1 bandit.

pub mod bandit;
pub mod budget;
pub mod ordering;
pub mod rollout;

pub use bandit::{bandit_search, ArmStats, BanditOutcome, SearchStatistics};
pub use budget::{move_budget, normalize_remaining_ms, BudgetConfig};
pub use ordering::{order_root_moves, RankedMove};
pub use rollout::rollout;

/// Default UCB1 exploration constant.
pub const DEFAULT_EXPLORATION: f64 = 1.4;

/// Default rollout step cap.
pub const DEFAULT_ROLLOUT_DEPTH: usize = 60;

/// Search tunables. Defaults match the values the engine plays with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// UCB1 exploration constant `c`.
    pub exploration: f64,
    /// Maximum plies simulated by one rollout.
    pub rollout_depth: usize,
    /// Random-move probability for the first `epsilon_decay_step` plies.
    pub early_epsilon: f64,
    /// Random-move probability afterwards.
    pub late_epsilon: f64,
    pub epsilon_decay_step: usize,
    /// Upper bound returned by the path search when no route exists.
    /// None uses the board dimension.
    pub distance_sentinel: Option<u32>,
    /// Stop after this many rollouts even if time remains.
    pub max_rollouts: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration: DEFAULT_EXPLORATION,
            rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            early_epsilon: 0.25,
            late_epsilon: 0.15,
            epsilon_decay_step: 5,
            distance_sentinel: None,
            max_rollouts: None,
        }
    }
}

impl SearchConfig {
    /// Exploration probability at rollout step `step` (0-based).
    #[inline]
    pub fn epsilon_at(&self, step: usize) -> f64 {
        if step < self.epsilon_decay_step {
            self.early_epsilon
        } else {
            self.late_epsilon
        }
    }
}

/// Result of a decision: the chosen move and associated info.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    pub action: A,
    /// Index of the chosen move in ranked order.
    pub index: usize,
    /// Mean rollout reward of the chosen move, if it was ever simulated.
    pub mean: Option<f64>,
    pub rollouts: u64,
    /// Number of candidate root moves.
    pub arms: usize,
    pub elapsed_ms: u64,
}
