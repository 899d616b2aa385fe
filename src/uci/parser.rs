//! UCI command parser
//!
//! Tokenises one protocol line into a [`UciCommand`]. Malformed numeric
//! arguments are dropped here; the engine decides what a missing value means.

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    UciNewGame,
    Position {
        /// None means the standard starting position
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go {
        wtime: Option<u64>,
        btime: Option<u64>,
        movetime: Option<u64>,
        depth: Option<u8>,
    },
    /// Node-count diagnostics; None when the depth argument is missing or bad
    Perft(Option<u8>),
    /// Board dump with FEN and hash
    Display,
    Quit,
    Unknown(String),
}

// Parse the token after `parts[i]` as a number, if present and valid
fn arg<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return UciCommand::Unknown(String::new());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts[0] {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "quit" => UciCommand::Quit,
        "d" => UciCommand::Display,
        "perft" => UciCommand::Perft(arg(&parts, 0)),
        "setoption" => {
            // expected: setoption name <name> [value <val>]
            let mut name = String::new();
            let mut value: Option<String> = None;
            let mut i = 1usize;
            while i < parts.len() {
                match parts[i] {
                    "name" => {
                        i += 1;
                        let mut vals = Vec::new();
                        while i < parts.len() && parts[i] != "value" {
                            vals.push(parts[i]);
                            i += 1;
                        }
                        name = vals.join(" ");
                    }
                    "value" => {
                        value = Some(parts[i + 1..].join(" "));
                        break;
                    }
                    _ => {
                        i += 1;
                    }
                }
            }
            UciCommand::SetOption { name, value }
        }
        "position" => {
            // position [fen <fenstring> | startpos] [moves <move1> ...]
            let moves_at = parts.iter().position(|&s| s == "moves");
            let moves: Vec<String> = moves_at
                .map(|at| parts[at + 1..].iter().map(|m| m.to_string()).collect())
                .unwrap_or_default();
            let fen = match parts.get(1) {
                Some(&"fen") => {
                    let end = moves_at.unwrap_or(parts.len());
                    Some(parts[2..end.max(2)].join(" "))
                }
                _ => None,
            };
            UciCommand::Position { fen, moves }
        }
        "go" => {
            let mut wtime: Option<u64> = None;
            let mut btime: Option<u64> = None;
            let mut movetime: Option<u64> = None;
            let mut depth: Option<u8> = None;

            let mut i = 1usize;
            while i < parts.len() {
                match parts[i] {
                    "wtime" => {
                        wtime = arg(&parts, i);
                        i += 2;
                    }
                    "btime" => {
                        btime = arg(&parts, i);
                        i += 2;
                    }
                    "movetime" => {
                        movetime = arg(&parts, i);
                        i += 2;
                    }
                    "depth" => {
                        depth = arg(&parts, i);
                        i += 2;
                    }
                    _ => {
                        i += 1;
                    }
                }
            }

            UciCommand::Go {
                wtime,
                btime,
                movetime,
                depth,
            }
        }
        other => UciCommand::Unknown(other.to_string()),
    }
}
