//! Search engine
//!
//! Negamax alpha-beta over cloned positions with a transposition table and a
//! repetition table owned by each [`Search`] instance.

pub mod params;
pub mod repetition;
pub mod search;
pub mod stats;
pub mod tt;

pub use self::params::SearchParams;
pub use self::repetition::RepetitionTable;
pub use self::search::{
    find_best_move, is_mate_score, mate_distance, IterationInfo, Search, SearchResult, INFINITY,
    MATE_SCORE,
};
pub use self::stats::SearchStats;
pub use self::tt::TranspositionTable;
