//! HUI protocol handling.
//!
//! This module implements the command parser for the engine's main loop
//! and the HFEN notation used to transmit positions.

pub mod hfen;
pub mod parser;

pub use hfen::{encode_hfen, parse_hfen, HfenError};
pub use parser::{parse_command, Command, GoParams};
