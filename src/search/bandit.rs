//! UCB1 bandit over root moves.
//!
//! Every root move is an arm; pulling an arm runs one rollout from that
//! move's cached successor. The search first gives each arm one pull in
//! ranked order, then keeps pulling the arm with the best UCB1 score until
//! the deadline. The deadline is only checked between rollouts, so the
//! overrun is bounded by one rollout.

use std::io::Write;
use std::time::Instant;

use rand::Rng;

use crate::board::{GameState, PieceType};

use super::rollout::rollout;
use super::SearchConfig;

/// Visit count and reward sum of a single arm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArmStats {
    pub visits: u32,
    pub reward_sum: f64,
}

impl ArmStats {
    /// Average reward, None before the first visit.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.visits == 0 {
            None
        } else {
            Some(self.reward_sum / self.visits as f64)
        }
    }
}

/// Per-decision statistics, indexed by ranked move index.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    arms: Vec<ArmStats>,
    total_visits: u64,
}

impl SearchStatistics {
    pub fn new(num_arms: usize) -> Self {
        SearchStatistics {
            arms: vec![ArmStats::default(); num_arms],
            total_visits: 0,
        }
    }

    pub fn arms(&self) -> &[ArmStats] {
        &self.arms
    }

    pub fn total_visits(&self) -> u64 {
        self.total_visits
    }

    /// Records one pull of `arm` with `reward`.
    pub fn record(&mut self, arm: usize, reward: f64) {
        let stats = &mut self.arms[arm];
        stats.visits += 1;
        stats.reward_sum += reward;
        self.total_visits += 1;
    }

    /// UCB1 score of `arm`. Unvisited arms score +infinity.
    pub fn ucb_score(&self, arm: usize, exploration: f64) -> f64 {
        let stats = &self.arms[arm];
        match stats.mean() {
            None => f64::INFINITY,
            Some(mean) => {
                let total = (self.total_visits.max(1)) as f64;
                mean + exploration * (total.ln() / stats.visits as f64).sqrt()
            }
        }
    }

    /// Arm with the highest UCB1 score. Ties go to the lower index, so
    /// unvisited arms are taken in ranked order.
    pub fn select(&self, exploration: f64) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for arm in 0..self.arms.len() {
            let score = self.ucb_score(arm, exploration);
            if score > best_score {
                best = arm;
                best_score = score;
            }
        }
        best
    }

    /// Visited arm with the highest mean reward. None if nothing was
    /// visited.
    pub fn best_arm(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (arm, stats) in self.arms.iter().enumerate() {
            if let Some(mean) = stats.mean() {
                if best.map_or(true, |(_, b)| mean > b) {
                    best = Some((arm, mean));
                }
            }
        }
        best.map(|(arm, _)| arm)
    }
}

/// Outcome of a bandit search.
#[derive(Debug, Clone)]
pub struct BanditOutcome {
    /// Chosen arm. Falls back to 0 (the best-ranked move) if no rollout
    /// finished in time.
    pub best: usize,
    pub stats: SearchStatistics,
    pub rollouts: u64,
}

/// Spends the time up to `deadline` on rollouts from `children` and
/// returns the arm with the best mean reward.
///
/// `children` must be in ranked order. Emits `info` lines to `out` after
/// the seeding pass and when the search ends.
pub fn bandit_search<S: GameState, R: Rng, W: Write>(
    children: &[S],
    me: PieceType,
    deadline: Instant,
    config: &SearchConfig,
    rng: &mut R,
    out: &mut W,
) -> BanditOutcome {
    let start = Instant::now();
    let mut stats = SearchStatistics::new(children.len());
    let mut rollouts: u64 = 0;
    let limit = config.max_rollouts.unwrap_or(u64::MAX);

    // Seed: one pull per arm, in ranked order.
    for (arm, child) in children.iter().enumerate() {
        if Instant::now() >= deadline || rollouts >= limit {
            break;
        }
        let reward = rollout(child, me, config, rng);
        stats.record(arm, reward);
        rollouts += 1;
    }
    emit_info(out, &stats, rollouts, start);

    while !children.is_empty() && rollouts < limit && Instant::now() < deadline {
        let arm = stats.select(config.exploration);
        let reward = rollout(&children[arm], me, config, rng);
        stats.record(arm, reward);
        rollouts += 1;
    }

    let best = stats.best_arm().unwrap_or(0);
    emit_info(out, &stats, rollouts, start);

    BanditOutcome {
        best,
        stats,
        rollouts,
    }
}

fn emit_info<W: Write>(out: &mut W, stats: &SearchStatistics, rollouts: u64, start: Instant) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match stats.best_arm() {
        Some(arm) => {
            let mean = stats.arms()[arm].mean().unwrap_or(0.0);
            let _ = writeln!(
                out,
                "info arms {} rollouts {} best {} score {:.2} time {}",
                stats.arms().len(),
                rollouts,
                arm,
                mean,
                elapsed_ms
            );
        }
        None => {
            let _ = writeln!(
                out,
                "info arms {} rollouts {} time {}",
                stats.arms().len(),
                rollouts,
                elapsed_ms
            );
        }
    }
}
