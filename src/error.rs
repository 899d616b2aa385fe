//! Error types for the boundary of the engine
//!
//! The generation and search core is total over well-formed positions and
//! never returns these; they surface from FEN loading, move notation,
//! protocol input and key-table initialisation.

use thiserror::Error;

/// Errors raised while validating external input
#[derive(Error, Debug)]
pub enum EngineError {
    /// FEN string rejected by the loader
    #[error("invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// Square name outside a1..h8
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// Move notation that does not name a legal move
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// Source square of a move is empty
    #[error("no piece on square {0}")]
    EmptySquare(String),

    /// Zobrist keys were already generated from a different seed
    #[error("zobrist keys already initialised with seed {existing:#x}, requested {requested:#x}")]
    ZobristSeedConflict { existing: u64, requested: u64 },

    /// Protocol stream failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        EngineError::InvalidFen {
            reason: reason.into(),
        }
    }
}

/// Result alias used at the engine boundary
pub type EngineResult<T> = Result<T, EngineError>;
