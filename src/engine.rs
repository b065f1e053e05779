//! Move selection and engine state management.
//!
//! `decide` is the single entry point for choosing a move: it handles the
//! degenerate cases, ranks the root moves, converts the remaining clock
//! into a deadline, runs the bandit search, and returns the winning move in
//! its external form. `Engine` holds the position and options between
//! protocol commands and runs `decide` for the `go` command.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::board::{GameState, HexState, LightAction};
use crate::protocol::hfen::{parse_hfen, HfenError};
use crate::protocol::parser::GoParams;
use crate::search::{bandit_search, order_root_moves, BudgetConfig, SearchConfig, SearchResult};

/// Remaining time assumed by `go` without a `time` argument (seconds).
const DEFAULT_REMAINING: f64 = 60.0;

/// Failures surfaced to the caller of `decide`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no legal moves in position")]
    NoLegalMoves,

    #[error("no position set")]
    NoPosition,
}

/// Per-call options for `decide`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecideOptions {
    /// Seeds the rollout RNG; entropy when absent.
    pub random_seed: Option<u64>,
    pub per_move_fraction: Option<f64>,
    pub per_move_min_ms: Option<u64>,
    pub per_move_max_ms: Option<u64>,
}

impl DecideOptions {
    /// Parses options from a JSON object such as
    /// `{"random_seed": 7, "per_move_fraction": 0.1}`.
    pub fn from_json(json: &str) -> Result<DecideOptions, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Default budget parameters with these overrides applied.
    pub fn budget(&self) -> BudgetConfig {
        let defaults = BudgetConfig::default();
        BudgetConfig {
            fraction: self.per_move_fraction.unwrap_or(defaults.fraction),
            min_ms: self.per_move_min_ms.unwrap_or(defaults.min_ms),
            max_ms: self.per_move_max_ms.unwrap_or(defaults.max_ms),
        }
    }

    fn rng(&self) -> SmallRng {
        match self.random_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// Chooses a move for the side to move in `state`.
///
/// `remaining` is the game clock in seconds or milliseconds (see
/// `search::budget`). Fails only when the position has no legal moves.
pub fn decide<S: GameState>(
    state: &S,
    remaining: f64,
    options: &DecideOptions,
) -> Result<LightAction, EngineError> {
    let mut rng = options.rng();
    let config = SearchConfig::default();
    decide_with(state, remaining, options, &config, &mut rng, &mut io::sink())
        .map(|result| result.action)
}

/// [`decide`] with explicit search tunables, RNG and `info` sink.
pub fn decide_with<S: GameState, R: Rng, W: Write>(
    state: &S,
    remaining: f64,
    options: &DecideOptions,
    config: &SearchConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<SearchResult<LightAction>, EngineError> {
    let start = Instant::now();
    let budget = options.budget().move_budget(remaining);
    decide_until(state, start, start + budget, config, rng, out)
}

/// [`decide_with`] with a fixed per-move budget instead of a clock reading.
pub fn decide_for<S: GameState, R: Rng, W: Write>(
    state: &S,
    movetime: Duration,
    config: &SearchConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<SearchResult<LightAction>, EngineError> {
    let start = Instant::now();
    decide_until(state, start, start + movetime, config, rng, out)
}

fn decide_until<S: GameState, R: Rng, W: Write>(
    state: &S,
    start: Instant,
    deadline: Instant,
    config: &SearchConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<SearchResult<LightAction>, EngineError> {
    let mut actions = state.legal_actions();
    if actions.is_empty() {
        return Err(EngineError::NoLegalMoves);
    }

    // Decided games and forced moves need no search.
    if state.is_terminal() || actions.len() == 1 {
        let arms = actions.len();
        let action = actions.swap_remove(0);
        return Ok(SearchResult {
            action: state.to_light(&action),
            index: 0,
            mean: None,
            rollouts: 0,
            arms,
            elapsed_ms: start.elapsed().as_millis() as u64,
        });
    }

    let me = state.next_piece();
    let ranked = order_root_moves(state, actions, me, config.distance_sentinel);
    let arms = ranked.len();
    let (actions, children): (Vec<S::Action>, Vec<S>) =
        ranked.into_iter().map(|m| (m.action, m.child)).unzip();

    let outcome = bandit_search(&children, me, deadline, config, rng, out);
    let best = outcome.best;

    Ok(SearchResult {
        action: state.to_light(&actions[best]),
        index: best,
        mean: outcome.stats.arms()[best].mean(),
        rollouts: outcome.rollouts,
        arms,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub position: Option<HexState>,
    pub options: HashMap<String, String>,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with no position.
    pub fn new() -> Self {
        Engine {
            position: None,
            options: HashMap::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Resets the position for a new game. Options are kept.
    pub fn new_game(&mut self) {
        self.position = None;
    }

    /// Sets the current position from an HFEN string.
    pub fn set_position(&mut self, hfen: &str) -> Result<(), HfenError> {
        let state = parse_hfen(hfen)?;
        self.position = Some(state);
        Ok(())
    }

    /// Sets an engine option. Malformed values are reported and stored;
    /// they are ignored when options are read back.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        let value = value.unwrap_or_default();
        match name.as_str() {
            "RandomSeed" if value.parse::<u64>().is_err() => {
                eprintln!("invalid RandomSeed value: '{}'", value)
            }
            "Config" => {
                if let Err(e) = DecideOptions::from_json(&value) {
                    eprintln!("invalid Config value: {}", e);
                }
            }
            _ => {}
        }
        self.options.insert(name, value);
    }

    fn option<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.options.get(name).and_then(|v| v.parse::<T>().ok())
    }

    /// Options for `decide`, from the `Config` JSON overlaid with the
    /// individual `setoption` values.
    pub fn decide_options(&self) -> DecideOptions {
        let mut opts = self
            .options
            .get("Config")
            .and_then(|json| DecideOptions::from_json(json).ok())
            .unwrap_or_default();
        if let Some(seed) = self.option("RandomSeed") {
            opts.random_seed = Some(seed);
        }
        if let Some(f) = self.option("MoveFraction") {
            opts.per_move_fraction = Some(f);
        }
        if let Some(ms) = self.option("MoveMinMs") {
            opts.per_move_min_ms = Some(ms);
        }
        if let Some(ms) = self.option("MoveMaxMs") {
            opts.per_move_max_ms = Some(ms);
        }
        opts
    }

    /// Search tunables from options, defaults elsewhere.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default();
        if let Some(depth) = self.option("RolloutDepth") {
            config.rollout_depth = depth;
        }
        if let Some(c) = self.option("Exploration") {
            config.exploration = c;
        }
        config
    }

    /// Handles the HUI handshake: writes id, options, protocol_version, and huiok.
    pub fn handle_hui<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name hexbandit")?;
        writeln!(out, "id author hexbandit")?;
        writeln!(out, "option name RandomSeed type spin default 0 min 0 max 18446744073709551615")?;
        writeln!(out, "option name MoveFraction type string default 0.08")?;
        writeln!(out, "option name MoveMinMs type spin default 150 min 0 max 600000")?;
        writeln!(out, "option name MoveMaxMs type spin default 15000 min 0 max 600000")?;
        writeln!(out, "option name RolloutDepth type spin default 60 min 0 max 1000")?;
        writeln!(out, "option name Exploration type string default 1.4")?;
        writeln!(out, "option name Config type string default {{}}")?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "huiok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `go` command: searches the current position and writes
    /// `info` lines followed by `bestmove <json>` (or `bestmove none`).
    pub fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) -> io::Result<()> {
        let result = self.go(params, out);
        match result {
            Ok(result) => writeln!(out, "bestmove {}", result.action.to_json())?,
            Err(e) => {
                eprintln!("go: {}", e);
                writeln!(out, "bestmove none")?;
            }
        }
        out.flush()
    }

    fn go<W: Write>(
        &mut self,
        params: &GoParams,
        out: &mut W,
    ) -> Result<SearchResult<LightAction>, EngineError> {
        let opts = self.decide_options();
        let mut config = self.search_config();
        if params.nodes.is_some() {
            config.max_rollouts = params.nodes;
        }
        let state = self.position.as_ref().ok_or(EngineError::NoPosition)?;

        // A fixed seed makes every `go` on the same position repeatable.
        if let Some(seed) = opts.random_seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }

        match params.movetime {
            Some(ms) => decide_for(
                state,
                Duration::from_millis(ms),
                &config,
                &mut self.rng,
                out,
            ),
            None => decide_with(
                state,
                params.time.unwrap_or(DEFAULT_REMAINING),
                &opts,
                &config,
                &mut self.rng,
                out,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, PieceType};
    use crate::eval::{accurate_evaluate, fast_evaluate, WIN_SCORE};

    fn seeded(seed: u64) -> DecideOptions {
        DecideOptions {
            random_seed: Some(seed),
            ..DecideOptions::default()
        }
    }

    #[test]
    fn no_legal_moves_is_an_error() {
        let mut state = HexState::empty(2, PieceType::Red);
        state.place(Cell::new(0, 0), PieceType::Red);
        state.place(Cell::new(0, 1), PieceType::Blue);
        state.place(Cell::new(1, 0), PieceType::Red);
        state.place(Cell::new(1, 1), PieceType::Blue);
        assert_eq!(decide(&state, 5.0, &seeded(1)), Err(EngineError::NoLegalMoves));
    }

    #[test]
    fn single_move_returned_without_search() {
        let mut state = HexState::empty(2, PieceType::Blue);
        state.place(Cell::new(0, 0), PieceType::Red);
        state.place(Cell::new(0, 1), PieceType::Blue);
        state.place(Cell::new(1, 1), PieceType::Red);
        assert!(!state.is_terminal());

        let mut rng = SmallRng::seed_from_u64(0);
        let mut out = Vec::new();
        let result = decide_with(
            &state,
            5.0,
            &DecideOptions::default(),
            &SearchConfig::default(),
            &mut rng,
            &mut out,
        )
        .unwrap();
        assert_eq!(result.rollouts, 0);
        assert_eq!(result.action.position, (1, 0));
        assert_eq!(result.action.piece, PieceType::Blue);
        assert!(out.is_empty(), "no search means no info lines");
    }

    #[test]
    fn terminal_position_returns_first_legal_move() {
        let mut state = HexState::empty(3, PieceType::Blue);
        for row in 0..3 {
            state.place(Cell::new(row, 0), PieceType::Red);
        }
        assert!(state.is_terminal());
        assert_eq!(fast_evaluate(&state, PieceType::Red), WIN_SCORE);
        assert_eq!(accurate_evaluate(&state, PieceType::Red), WIN_SCORE);

        let first = state.legal_actions()[0].to_light();
        let mut rng = SmallRng::seed_from_u64(0);
        let result = decide_with(
            &state,
            5.0,
            &DecideOptions::default(),
            &SearchConfig::default(),
            &mut rng,
            &mut io::sink(),
        )
        .unwrap();
        assert_eq!(result.action, first);
        assert_eq!(result.rollouts, 0);
        assert_eq!(result.arms, 6, "every empty cell counts as a candidate");
    }

    #[test]
    fn takes_immediate_win() {
        let mut state = HexState::empty(4, PieceType::Red);
        for row in [0, 1, 3] {
            state.place(Cell::new(row, 2), PieceType::Red);
        }
        state.place(Cell::new(1, 0), PieceType::Blue);
        state.place(Cell::new(2, 0), PieceType::Blue);
        state.place(Cell::new(3, 0), PieceType::Blue);
        let action = decide(&state, 2.0, &seeded(3)).unwrap();
        assert_eq!(action.position, (2, 2));
        assert_eq!(action.piece, PieceType::Red);
    }

    #[test]
    fn every_arm_visited_with_enough_time() {
        let state = HexState::empty(3, PieceType::Red);
        let config = SearchConfig {
            max_rollouts: Some(50),
            ..SearchConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(8);
        let result = decide_for(
            &state,
            Duration::from_secs(30),
            &config,
            &mut rng,
            &mut io::sink(),
        )
        .unwrap();
        assert_eq!(result.arms, 9);
        assert_eq!(result.rollouts, 50);
        assert!(result.mean.is_some());
    }

    #[test]
    fn seeded_search_is_reproducible() {
        let mut state = HexState::empty(5, PieceType::Blue);
        state.place(Cell::new(2, 2), PieceType::Red);
        let config = SearchConfig {
            max_rollouts: Some(80),
            ..SearchConfig::default()
        };
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            decide_for(
                &state,
                Duration::from_secs(30),
                &config,
                &mut rng,
                &mut io::sink(),
            )
            .unwrap()
            .action
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn decide_respects_budget_plus_one_rollout() {
        let state = HexState::empty(7, PieceType::Red);
        let opts = DecideOptions {
            random_seed: Some(4),
            per_move_fraction: Some(0.1),
            per_move_min_ms: Some(50),
            per_move_max_ms: Some(100),
        };
        let budget = opts.budget().move_budget(1.0);
        assert_eq!(budget, Duration::from_millis(100));
        let start = Instant::now();
        let action = decide(&state, 1.0, &opts).unwrap();
        assert!(start.elapsed() < budget + Duration::from_secs(2));
        assert_eq!(action.piece, PieceType::Red);
    }

    #[test]
    fn options_parse_from_json() {
        let opts =
            DecideOptions::from_json(r#"{"random_seed": 7, "per_move_max_ms": 900}"#).unwrap();
        assert_eq!(opts.random_seed, Some(7));
        assert_eq!(opts.per_move_max_ms, Some(900));
        assert_eq!(opts.per_move_fraction, None);
        let budget = opts.budget();
        assert_eq!(budget.max_ms, 900);
        assert_eq!(budget.min_ms, 150);
        assert_eq!(budget.fraction, 0.08);
    }

    #[test]
    fn new_engine_has_no_state() {
        let engine = Engine::new();
        assert!(engine.position.is_none());
        assert!(engine.options.is_empty());
    }

    #[test]
    fn set_position_valid_and_invalid() {
        let mut engine = Engine::new();
        assert!(engine.set_position("r/3/1R1/3").is_ok());
        assert!(engine.position.is_some());
        assert!(engine.set_position("garbage").is_err());
        engine.new_game();
        assert!(engine.position.is_none());
    }

    #[test]
    fn setoptions_feed_decide_options() {
        let mut engine = Engine::new();
        engine.set_option("MoveFraction".to_string(), Some("0.2".to_string()));
        engine.set_option("MoveMinMs".to_string(), Some("10".to_string()));
        engine.set_option(
            "Config".to_string(),
            Some(r#"{"per_move_max_ms": 500, "per_move_fraction": 0.5}"#.to_string()),
        );
        let opts = engine.decide_options();
        assert_eq!(opts.per_move_fraction, Some(0.2));
        assert_eq!(opts.per_move_min_ms, Some(10));
        assert_eq!(opts.per_move_max_ms, Some(500));

        engine.set_option("RolloutDepth".to_string(), Some("12".to_string()));
        assert_eq!(engine.search_config().rollout_depth, 12);
    }

    #[test]
    fn handle_go_outputs_bestmove() {
        let mut engine = Engine::new();
        engine.set_option("RandomSeed".to_string(), Some("5".to_string()));
        engine.set_position("b/3/1R1/3").unwrap();
        let params = GoParams {
            movetime: Some(50),
            ..GoParams::default()
        };
        let mut output = Vec::new();
        engine.handle_go(&params, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let line = text.lines().find(|l| l.starts_with("bestmove ")).unwrap();
        let action = LightAction::from_json(line.strip_prefix("bestmove ").unwrap()).unwrap();
        assert_eq!(action.piece, PieceType::Blue);
        assert_ne!(action.position, (1, 1));
        assert!(text.lines().any(|l| l.starts_with("info ")));
    }

    #[test]
    fn repeated_go_with_fixed_seed_is_repeatable() {
        let mut engine = Engine::new();
        engine.set_option("RandomSeed".to_string(), Some("21".to_string()));
        engine.set_position("r/5/5/2B2/5/5").unwrap();
        let params = GoParams {
            movetime: Some(30_000),
            nodes: Some(60),
            ..GoParams::default()
        };
        let bestmove = |engine: &mut Engine| {
            let mut output = Vec::new();
            engine.handle_go(&params, &mut output).unwrap();
            let text = String::from_utf8(output).unwrap();
            text.lines()
                .find(|l| l.starts_with("bestmove "))
                .map(str::to_string)
                .unwrap()
        };
        let first = bestmove(&mut engine);
        let second = bestmove(&mut engine);
        assert_eq!(first, second);
        assert_ne!(first, "bestmove none");
    }

    #[test]
    fn config_seed_also_reseeds_each_go() {
        let mut engine = Engine::new();
        engine.set_option("Config".to_string(), Some(r#"{"random_seed": 5}"#.to_string()));
        assert_eq!(engine.decide_options().random_seed, Some(5));
        engine.set_option("RandomSeed".to_string(), Some("oops".to_string()));
        assert_eq!(engine.decide_options().random_seed, Some(5));
    }

    #[test]
    fn handle_go_without_position() {
        let mut engine = Engine::new();
        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "bestmove none");
    }

    #[test]
    fn handle_hui_outputs_handshake() {
        let engine = Engine::new();
        let mut output = Vec::new();
        engine.handle_hui(&mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("id name hexbandit"));
        assert!(text.contains("protocol_version 1"));
        assert!(text.trim_end().ends_with("huiok"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        let mut output = Vec::new();
        engine.handle_isready(&mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "readyok");
    }
}
