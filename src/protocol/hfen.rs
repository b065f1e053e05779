//! HFEN (Hex FEN) encoding and decoding.
//!
//! HFEN is a one-line notation for a Hex position, modelled on chess FEN.
//!
//! Format: `<side>/<row0>/<row1>/.../<rowN-1>`
//!
//! `side` is `r` or `b` for the player to move. Each row lists its cells
//! left to right: `R` and `B` are pieces, a decimal number is a run of
//! empty cells. The number of rows is the board dimension.

use crate::board::{Cell, GameState, HexState, PieceType, MAX_DIMENSION};

/// Errors that can occur during HFEN parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HfenError {
    #[error("empty HFEN string")]
    Empty,

    #[error("expected at least one row after the side to move")]
    NoRows,

    #[error("board of {0} rows exceeds the maximum of 26")]
    TooLarge(usize),

    #[error("invalid side to move: '{0}'")]
    InvalidSide(String),

    #[error("invalid piece character '{0}' in row {1}")]
    InvalidPiece(char, usize),

    #[error("empty run longer than the board in row {0}")]
    RunTooLong(usize),

    #[error("row {row} has {got} cells, expected {expected}")]
    BadRowLength {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// Parses an HFEN string into a position.
pub fn parse_hfen(hfen: &str) -> Result<HexState, HfenError> {
    let hfen = hfen.trim();
    if hfen.is_empty() {
        return Err(HfenError::Empty);
    }

    let mut sections = hfen.split('/');
    let side_str = sections.next().unwrap_or("");
    let mut side_chars = side_str.chars();
    let side = match (side_chars.next(), side_chars.next()) {
        (Some(c), None) => PieceType::from_side_char(c),
        _ => None,
    }
    .ok_or_else(|| HfenError::InvalidSide(side_str.to_string()))?;

    let rows: Vec<&str> = sections.collect();
    let dim = rows.len();
    if dim == 0 {
        return Err(HfenError::NoRows);
    }
    if dim > MAX_DIMENSION {
        return Err(HfenError::TooLarge(dim));
    }

    let mut state = HexState::empty(dim, side);
    for (row, text) in rows.iter().enumerate() {
        let mut col = 0usize;
        let mut run = 0usize;
        for c in text.chars() {
            if let Some(d) = c.to_digit(10) {
                run = run
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(d as usize))
                    .filter(|&r| r <= dim)
                    .ok_or(HfenError::RunTooLong(row))?;
                continue;
            }
            col += run;
            run = 0;
            let piece =
                PieceType::from_notation_char(c).ok_or(HfenError::InvalidPiece(c, row))?;
            if col >= dim {
                return Err(HfenError::BadRowLength {
                    row,
                    expected: dim,
                    got: col + 1,
                });
            }
            state.place(Cell::new(row, col), piece);
            col += 1;
        }
        col += run;
        if col != dim {
            return Err(HfenError::BadRowLength {
                row,
                expected: dim,
                got: col,
            });
        }
    }

    Ok(state)
}

/// Encodes a position as an HFEN string.
pub fn encode_hfen<S: GameState>(state: &S) -> String {
    let dim = state.dimension();
    let mut out = String::with_capacity(2 + dim * (dim + 1));
    out.push(state.next_piece().side_char());

    for row in 0..dim {
        out.push('/');
        let mut empty = 0usize;
        for col in 0..dim {
            match state.occupant(Cell::new(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.notation_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }
    out
}
