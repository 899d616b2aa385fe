pub mod board;
pub mod error;
pub mod eval;
pub mod fen;
pub mod movegen;
pub mod perft;
pub mod search;
pub mod time;
pub mod uci;
pub mod utils;
pub mod zobrist;

pub use board::{Candidate, Color, Move, PieceKind, Position, START_FEN};
pub use error::{EngineError, EngineResult};
pub use search::find_best_move;

/// Build the attack tables and the default Zobrist keys up front
pub fn init() {
    utils::init_attack_tables();
    zobrist::init_zobrist();
}

/// Like [`init`], generating the Zobrist keys from `seed`
pub fn init_with_zobrist_seed(seed: u64) -> EngineResult<()> {
    utils::init_attack_tables();
    zobrist::init_with_seed(seed)
}
