//! HUI command parser.
//!
//! Parses incoming HUI (Hex Universal Interface) protocol commands from raw
//! text into structured `Command` variants that the engine main loop can
//! dispatch on.

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoParams {
    /// Remaining game clock, in seconds or milliseconds.
    pub time: Option<f64>,
    /// Fixed per-move budget in milliseconds.
    pub movetime: Option<u64>,
    /// Upper bound on the number of rollouts.
    pub nodes: Option<u64>,
}

/// A parsed server-to-engine HUI command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Initialize the HUI protocol handshake.
    Hui,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new game.
    NewGame,

    /// Set the board position from an HFEN string.
    Position { hfen: String },

    /// Choose a move with optional search constraints.
    Go(GoParams),

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = tokens.first()?;

    match *first {
        "hui" => Some(Command::Hui),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "go" => Some(parse_go(&tokens)),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    // Values may contain spaces (the Config option carries JSON).
    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name_parts, value_parts) = match value_idx {
        Some(vi) => (&tokens[2..vi], &tokens[vi + 1..]),
        None => (&tokens[2..], &tokens[tokens.len()..]),
    };
    if name_parts.is_empty() {
        eprintln!("malformed setoption: empty name");
        return None;
    }
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses `position <hfen>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        Some(hfen) => Some(Command::Position {
            hfen: hfen.to_string(),
        }),
        None => {
            eprintln!("malformed position: expected 'position <hfen>'");
            None
        }
    }
}

/// Parses `go [time <remaining>] [movetime <ms>] [nodes <n>]`. Bad values
/// are reported and skipped.
fn parse_go(tokens: &[&str]) -> Command {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        let key = tokens[i];
        let arg = tokens.get(i + 1).copied();
        match key {
            "time" => params.time = parse_arg(key, arg),
            "movetime" => params.movetime = parse_arg(key, arg),
            "nodes" => params.nodes = parse_arg(key, arg),
            other => {
                eprintln!("unknown go parameter: '{}'", other);
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Command::Go(params)
}

fn parse_arg<T: std::str::FromStr>(key: &str, arg: Option<&str>) -> Option<T> {
    let arg = arg?;
    match arg.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("invalid {} value: '{}'", key, arg);
            None
        }
    }
}
