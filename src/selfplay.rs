//! Self-play game generation.
//!
//! Plays full games from the empty board, the engine against either itself
//! or a uniformly random mover, and records the HFEN and chosen move of
//! every ply. Games alternate colours so the engine plays Red in even games
//! and Blue in odd ones. Each side has its own game clock, which is what
//! `decide` budgets against.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{GameState, HexState, LightAction, PieceType, DEFAULT_DIMENSION};
use crate::engine::{decide_with, DecideOptions};
use crate::protocol::hfen::encode_hfen;
use crate::search::SearchConfig;

/// Who plays against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    Engine,
    Random,
}

impl FromStr for Opponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "engine" => Ok(Opponent::Engine),
            "random" => Ok(Opponent::Random),
            other => Err(format!("unknown opponent '{}'", other)),
        }
    }
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opponent::Engine => write!(f, "engine"),
            Opponent::Random => write!(f, "random"),
        }
    }
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Starting clock per side, in seconds.
    pub clock_secs: f64,
    /// Board dimension.
    pub size: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    pub opponent: Opponent,
    /// Search tunables shared by every engine move.
    pub search: SearchConfig,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            clock_secs: 60.0,
            size: DEFAULT_DIMENSION,
            seed: 0,
            opponent: Opponent::Engine,
            search: SearchConfig::default(),
            quiet: false,
        }
    }
}

/// A single recorded ply.
#[derive(Debug, Clone, Serialize)]
pub struct PlyRecord {
    /// HFEN of the position before the move.
    pub hfen: String,
    pub action: LightAction,
    /// Rollouts spent choosing the move; 0 for random moves.
    pub rollouts: u64,
    pub elapsed_ms: u64,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub size: usize,
    /// Colour played by the engine under test.
    pub engine_piece: PieceType,
    pub opponent: Opponent,
    pub winner: Option<PieceType>,
    pub plies: Vec<PlyRecord>,
    pub final_hfen: String,
}

impl GameRecord {
    /// Whether the engine under test won.
    pub fn engine_won(&self) -> bool {
        self.winner == Some(self.engine_piece)
    }
}

/// Colour of the engine under test in game `game_id`.
pub fn engine_piece_for(game_id: usize) -> PieceType {
    if game_id % 2 == 0 {
        PieceType::Red
    } else {
        PieceType::Blue
    }
}

/// Clock value handed to `decide` for `ms` milliseconds remaining. Below
/// ten seconds the clock goes out in seconds; from there on it is sent in
/// milliseconds, which the budget reads as such once it is 10 000 or more.
pub fn clock_reading(ms: f64) -> f64 {
    if ms >= 10_000.0 {
        ms
    } else {
        ms / 1000.0
    }
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let engine_piece = engine_piece_for(game_id);
    let mut state = HexState::empty(config.size, PieceType::Red);
    let mut plies = Vec::new();
    // Remaining clock per side in ms, indexed Red then Blue.
    let mut clocks = [config.clock_secs * 1000.0; 2];
    let options = DecideOptions::default();
    let mut null_out = std::io::sink();

    while !state.is_terminal() {
        let mover = state.next_piece();
        let clock = &mut clocks[mover as usize];
        let hfen = encode_hfen(&state);
        let start = Instant::now();

        let search = mover == engine_piece || config.opponent == Opponent::Engine;
        let choice = if search {
            decide_with(
                &state,
                clock_reading(*clock),
                &options,
                &config.search,
                rng,
                &mut null_out,
            )
            .ok()
            .map(|r| (r.action, r.rollouts))
        } else {
            let actions = state.legal_actions();
            if actions.is_empty() {
                None
            } else {
                let pick = rng.gen_range(0..actions.len());
                Some((state.to_light(&actions[pick]), 0))
            }
        };

        let Some((action, rollouts)) = choice else {
            break;
        };

        let elapsed = start.elapsed();
        *clock = (*clock - elapsed.as_secs_f64() * 1000.0).max(0.0);

        let Some(heavy) = state
            .legal_actions()
            .into_iter()
            .find(|a| a.cell == action.cell())
        else {
            break;
        };
        state = state.apply(&heavy);
        plies.push(PlyRecord {
            hfen,
            action,
            rollouts,
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    GameRecord {
        game_id,
        size: config.size,
        engine_piece,
        opponent: config.opponent,
        winner: state.winner(),
        plies,
        final_hfen: encode_hfen(&state),
    }
}

/// Runs self-play and returns all game records.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game));
    games
}

/// Runs self-play, calling `on_game` with each completed game record.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    let mut rng = if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed)
    } else {
        SmallRng::from_entropy()
    };

    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(config, i, &mut rng);
        if !config.quiet {
            let outcome = match game.winner {
                Some(w) if w == game.engine_piece => format!("engine ({}) wins", w.notation_char()),
                Some(w) => format!("{} ({}) wins", config.opponent, w.notation_char()),
                None => "unfinished".to_string(),
            };
            eprintln!(
                "Game {}/{}: {} in {} plies ({:.1}s)",
                i + 1,
                config.num_games,
                outcome,
                game.plies.len(),
                game_start.elapsed().as_secs_f64(),
            );
        }
        on_game(game);
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Win counts over a set of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub games: usize,
    pub red_wins: usize,
    pub blue_wins: usize,
    pub engine_wins: usize,
    pub unfinished: usize,
    pub plies: usize,
}

impl Summary {
    pub fn from_games(games: &[GameRecord]) -> Self {
        let mut summary = Summary {
            games: games.len(),
            ..Summary::default()
        };
        for game in games {
            summary.plies += game.plies.len();
            match game.winner {
                Some(PieceType::Red) => summary.red_wins += 1,
                Some(PieceType::Blue) => summary.blue_wins += 1,
                None => summary.unfinished += 1,
            }
            if game.engine_won() {
                summary.engine_wins += 1;
            }
        }
        summary
    }
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let s = Summary::from_games(games);
    let pct = |n: usize| 100.0 * n as f64 / s.games.max(1) as f64;

    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", s.games);
    eprintln!("Avg plies/game: {:.1}", s.plies as f64 / s.games.max(1) as f64);
    eprintln!("Red wins: {} ({:.1}%)", s.red_wins, pct(s.red_wins));
    eprintln!("Blue wins: {} ({:.1}%)", s.blue_wins, pct(s.blue_wins));
    eprintln!("Engine wins: {} ({:.1}%)", s.engine_wins, pct(s.engine_wins));
    if s.unfinished > 0 {
        eprintln!("Unfinished: {}", s.unfinished);
    }
}
