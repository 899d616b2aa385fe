//! UCI event loop and engine state
//!
//! Commands run synchronously: `go` searches to completion before the next
//! line is read.

use super::options::UciOptions;
use super::parser::{parse_uci_command, UciCommand};
use crate::board::{parse_move, Color, Position};
use crate::error::EngineResult;
use crate::perft;
use crate::search::{mate_distance, Search, SearchParams};
use crate::time::{effective_depth, Clock};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{info, warn};

pub const ENGINE_NAME: &str = "raywalk";
pub const ENGINE_AUTHOR: &str = "the raywalk developers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciState {
    Init,
    Ready,
}

pub struct UciEngine {
    state: UciState,
    position: Position,
    /// Hashes of every game position before `position`, oldest first
    history: Vec<u64>,
    running: bool,
    options: UciOptions,
    /// Parameters not exposed as options (low-time threshold, capture search)
    base_params: SearchParams,
    search: Search,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UciEngine {
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    /// Engine whose option defaults come from `params`
    pub fn with_params(params: SearchParams) -> Self {
        let options = UciOptions {
            hash: params.tt_size_mb,
            depth: params.max_depth,
            seed: params.seed,
        };
        Self {
            state: UciState::Init,
            position: Position::startpos(),
            history: Vec::new(),
            running: true,
            search: Search::new(Position::startpos(), params.clone()),
            options,
            base_params: params,
        }
    }

    pub fn state(&self) -> &UciState {
        &self.state
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name {} {}", ENGINE_NAME, env!("CARGO_PKG_VERSION")));
                res.push(format!("id author {}", ENGINE_AUTHOR));
                for opt in UciOptions::definitions() {
                    res.push(opt.announce());
                }
                res.push("uciok".to_string());
                self.state = UciState::Ready;
            }
            UciCommand::IsReady => {
                res.push("readyok".to_string());
            }
            UciCommand::Position { fen, moves } => match Self::replay(fen.as_deref(), &moves) {
                Ok((position, history)) => {
                    // All moves valid: commit the new position
                    self.position = position;
                    self.history = history;
                    self.state = UciState::Ready;
                }
                Err(e) => {
                    warn!(error = %e, "position rejected");
                    res.push(format!("info string {}", e));
                }
            },
            UciCommand::Go {
                wtime,
                btime,
                movetime,
                depth,
            } => {
                self.go(depth, Clock { wtime, btime, movetime }, &mut res);
                self.state = UciState::Ready;
            }
            UciCommand::Perft(Some(depth)) => {
                self.run_perft(depth, &mut res);
            }
            UciCommand::Perft(None) => {
                warn!("perft without a valid depth");
                res.push("info string usage: perft <depth>".to_string());
            }
            UciCommand::Display => {
                res.extend(self.position.to_string().lines().map(str::to_string));
                res.push(format!("Fen: {}", self.position.to_fen()));
                res.push(format!("Key: {:016x}", self.position.hash));
            }
            UciCommand::UciNewGame => {
                self.position = Position::startpos();
                self.history.clear();
                self.search.clear();
                self.state = UciState::Ready;
            }
            UciCommand::SetOption { name, value } => {
                match self.options.set_option(&name, value.as_deref()) {
                    Ok(()) => {
                        self.search.set_params(self.options.apply(&self.base_params));
                        res.push(format!(
                            "info string {} set to {}",
                            name,
                            value.unwrap_or_default()
                        ));
                    }
                    Err(e) => {
                        warn!(option = %name, error = %e, "setoption rejected");
                        res.push(format!("info string error: {}", e));
                    }
                }
            }
            UciCommand::Quit => {
                self.running = false;
            }
            UciCommand::Unknown(s) => {
                warn!(command = %s, "unknown command");
                res.push(format!("info string unknown command: {}", s));
            }
        }
        res
    }

    /// Build a position from a FEN (or the start position) plus moves, on a
    /// scratch copy; any failure leaves the engine untouched
    fn replay(fen: Option<&str>, moves: &[String]) -> EngineResult<(Position, Vec<u64>)> {
        let mut position = match fen {
            Some(f) => Position::from_fen(f)?,
            None => Position::startpos(),
        };
        let mut history = Vec::with_capacity(moves.len());
        for text in moves {
            let mv = parse_move(&position, text)?;
            history.push(position.hash);
            position.apply_move(&mv);
        }
        Ok((position, history))
    }

    fn go(&mut self, depth: Option<u8>, clock: Clock, res: &mut Vec<String>) {
        let params = self.options.apply(&self.base_params);
        let requested = depth.unwrap_or(params.max_depth).max(1);
        let remaining = clock.remaining_for(self.position.side == Color::White);
        let depth = effective_depth(requested, remaining, params.low_time_ms);

        self.search.set_params(params);
        self.search.set_position(self.position.clone());
        self.search.set_history(&self.history);

        let result = self.search.search_with_info(Some(depth), |it| {
            let score = match mate_distance(it.score, it.depth) {
                Some(m) => format!("mate {}", m),
                None => format!("cp {}", it.score * 100),
            };
            res.push(format!(
                "info depth {} score {} nodes {} time {}",
                it.depth, score, it.nodes, it.elapsed_ms
            ));
        });

        match result.best_move {
            Some(mv) => res.push(format!("bestmove {}", mv.to_uci())),
            None => {
                res.push("info string position is terminal (checkmate or stalemate)".to_string());
                res.push("bestmove 0000".to_string());
            }
        }
    }

    fn run_perft(&self, depth: u8, res: &mut Vec<String>) {
        let start = Instant::now();
        let parts = perft::divide(&self.position, depth);
        let total: u64 = parts.iter().map(|(_, n)| n).sum();
        for (mv, nodes) in &parts {
            res.push(format!("{}: {}", mv, nodes));
        }
        let elapsed = start.elapsed();
        info!(depth, nodes = total, time_ms = elapsed.as_millis() as u64, "perft");
        res.push(String::new());
        res.push(format!("Nodes searched: {}", total));
    }
}

/// Serve the protocol on stdin/stdout with `params` as option defaults
pub fn run_uci_loop(params: SearchParams) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut engine = UciEngine::with_params(params);
    drive(&mut engine, &mut reader, &mut writer)
}

/// Run `engine` over any line source and sink until `quit` or end of input
pub fn drive<R: BufRead, W: Write>(engine: &mut UciEngine, reader: &mut R, writer: &mut W) -> io::Result<()> {
    let mut buf = String::new();

    while engine.is_running() {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            // EOF reached
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        for r in process_uci_line(line, engine) {
            writeln!(writer, "{}", r)?;
        }

        // Flush after each command so the GUI sees output immediately
        writer.flush()?;
    }

    Ok(())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    let cmd = parse_uci_command(line);
    engine.handle_command(cmd)
}
