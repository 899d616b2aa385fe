//! Main search engine implementation
//!
//! Iterative-deepening negamax with fail-hard alpha-beta, a transposition
//! table cleared at every iteration, repetition tracking along the search
//! line and a capture-only search on the last contested square at the
//! leaves. Ties at the root are broken at random.

use super::params::SearchParams;
use super::repetition::RepetitionTable;
use super::stats::SearchStats;
use super::tt::{NodeType, TranspositionTable};
use crate::board::{Candidate, Move, Position};
use crate::eval;
use crate::movegen;
use crate::zobrist;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Larger than any reachable score
pub const INFINITY: i32 = 1_000_000;
/// Base magnitude of a mate score; the remaining depth is added on top
pub const MATE_SCORE: i32 = 10_000;
/// Scores at or beyond this magnitude are mates
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

/// Outcome of one iterative-deepening pass
#[derive(Debug, Clone)]
pub struct IterationInfo {
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Final search result
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Score from the side to move's point of view
    pub score: i32,
    /// Depth of the last completed iteration
    pub depth: u8,
    /// Root moves with their scores from the last iteration. Moves that tie
    /// the best score carry it exactly; the others carry an upper bound.
    pub root_moves: Vec<Candidate>,
}

/// Is `score` a forced mate for either side
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// Full moves until mate for a mate score found with root depth `depth`.
/// Positive when the side to move mates.
pub fn mate_distance(score: i32, depth: u8) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let remaining = score.abs() - MATE_SCORE;
    let plies = depth as i32 - remaining;
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

/// Main search engine
pub struct Search {
    /// Root position
    position: Position,

    /// Transposition table for caching
    tt: TranspositionTable,

    /// Occurrence counts along game history plus the current line
    repetitions: RepetitionTable,

    /// Hashes of the positions preceding the root in the game
    history: Vec<u64>,

    params: SearchParams,

    stats: SearchStats,

    rng: StdRng,
}

impl Search {
    pub fn new(position: Position, params: SearchParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            position,
            tt: TranspositionTable::new(params.tt_size_mb),
            repetitions: RepetitionTable::new(),
            history: Vec::new(),
            params,
            stats: SearchStats::new(),
            rng,
        }
    }

    /// Search with default parameters
    pub fn with_position(position: Position) -> Self {
        Self::new(position, SearchParams::default())
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Hashes of the game positions before the root, oldest first
    pub fn set_history(&mut self, hashes: &[u64]) {
        self.history = hashes.to_vec();
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Replace the parameters, resizing the table and reseeding the RNG as needed
    pub fn set_params(&mut self, params: SearchParams) {
        if params.tt_size_mb != self.params.tt_size_mb {
            self.tt = TranspositionTable::new(params.tt_size_mb);
        }
        if params.seed != self.params.seed {
            self.rng = match params.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
        }
        self.params = params;
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Drop cached results (new game)
    pub fn clear(&mut self) {
        self.tt.clear();
        self.history.clear();
        self.repetitions.clear();
    }

    /// Iterative deepening to `max_depth` (or the configured depth)
    pub fn search(&mut self, max_depth: Option<u8>) -> SearchResult {
        self.search_with_info(max_depth, |_| {})
    }

    /// Iterative deepening, reporting every completed iteration to `on_iteration`
    pub fn search_with_info<F>(&mut self, max_depth: Option<u8>, mut on_iteration: F) -> SearchResult
    where
        F: FnMut(&IterationInfo),
    {
        let max_depth = max_depth.unwrap_or(self.params.max_depth).max(1);
        self.stats.reset();
        self.stats.start_timing();

        let root = self.position.clone();
        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            root_moves: Vec::new(),
        };

        self.repetitions.seed(&self.history);
        self.repetitions.push(root.hash);
        let root_drawn = self.repetitions.is_threefold(root.hash);

        let mut root_moves = movegen::gen_all_moves(&root);
        // Stable sort keeps generation order among equal weights
        root_moves.sort_by(|a, b| b.weight.cmp(&a.weight));

        if root_moves.is_empty() {
            result.score = if movegen::in_check(&root, root.side) {
                -(MATE_SCORE + max_depth as i32)
            } else {
                0
            };
            result.depth = max_depth;
            self.repetitions.pop(root.hash);
            self.finish(&result);
            return result;
        }

        for depth in 1..=max_depth {
            self.tt.clear();
            let scored = self.search_root(&root, &root_moves, depth);
            let best_score = scored.iter().map(|c| c.weight).max().unwrap_or(-INFINITY);
            let ties: Vec<Move> = scored
                .iter()
                .filter(|c| c.weight == best_score)
                .map(|c| c.mv)
                .collect();
            let best_move = ties.choose(&mut self.rng).copied();

            result = SearchResult {
                best_move,
                score: if root_drawn { 0 } else { best_score },
                depth,
                root_moves: scored,
            };

            let info = IterationInfo {
                depth,
                score: result.score,
                best_move,
                nodes: self.stats.nodes,
                elapsed_ms: self.stats.elapsed_ms(),
            };
            tracing::debug!(
                depth,
                score = info.score,
                nodes = info.nodes,
                time_ms = info.elapsed_ms,
                ties = ties.len(),
                best = %best_move.map(|m| m.to_uci()).unwrap_or_default(),
                "iteration complete"
            );
            on_iteration(&info);

            // Reorder by the scores just found so the next pass searches the best first
            root_moves = result.root_moves.clone();
            root_moves.sort_by(|a, b| b.weight.cmp(&a.weight));
        }

        self.repetitions.pop(root.hash);
        self.finish(&result);
        result
    }

    fn finish(&mut self, result: &SearchResult) {
        self.stats.update_timing();
        self.stats.log_summary();
        tracing::info!(
            depth = result.depth,
            score = result.score,
            best = %result.best_move.map(|m| m.to_uci()).unwrap_or_else(|| "0000".to_string()),
            nodes = self.stats.nodes,
            "search finished"
        );
    }

    /// Score every root move at `depth`; ties with the best are exact
    fn search_root(&mut self, root: &Position, moves: &[Candidate], depth: u8) -> Vec<Candidate> {
        let mut best = -INFINITY;
        let mut scored = Vec::with_capacity(moves.len());
        for cand in moves {
            let child = root.with_move(&cand.mv);
            let contested = self.contested_square(root, &cand.mv);
            // One below the best so equal scores come back exact
            let alpha = if best == -INFINITY { -INFINITY } else { best - 1 };
            self.repetitions.push(child.hash);
            let score = -self.negamax(&child, depth - 1, -INFINITY, -alpha, contested);
            self.repetitions.pop(child.hash);
            best = best.max(score);
            scored.push(Candidate::new(cand.mv, score));
        }
        scored
    }

    /// Square to resolve at the child's leaf, if `mv` captures
    #[inline]
    fn contested_square(&self, pos: &Position, mv: &Move) -> Option<u8> {
        if self.params.capture_search && pos.is_capture(mv) {
            Some(mv.to)
        } else {
            None
        }
    }

    /// Negamax alpha-beta (fail-hard). The caller has already recorded
    /// `pos` in the repetition table.
    fn negamax(&mut self, pos: &Position, depth: u8, mut alpha: i32, beta: i32, contested: Option<u8>) -> i32 {
        self.stats.inc_node();

        if self.repetitions.is_threefold(pos.hash) {
            self.stats.inc_repetition_draw();
            return 0i32.clamp(alpha, beta);
        }

        // Leaf values depend on the contested square, so their key does too
        let key = match (depth, contested) {
            (0, Some(sq)) => pos.hash ^ zobrist::keys().contested[sq as usize],
            _ => pos.hash,
        };
        if let Some(entry) = self.tt.probe(key, depth) {
            if let Some(score) = entry.cutoff(alpha, beta) {
                self.stats.inc_tt_hit();
                return score;
            }
        }

        if depth == 0 {
            self.stats.inc_leaf();
            if !movegen::has_legal_move(pos) {
                return self.terminal_score(pos, 0).clamp(alpha, beta);
            }
            let score = self.leaf_score(pos, contested);
            self.tt.store(key, score, 0, NodeType::Exact);
            self.stats.inc_tt_store();
            return score.clamp(alpha, beta);
        }

        let mut moves = movegen::gen_all_moves(pos);
        if moves.is_empty() {
            return self.terminal_score(pos, depth).clamp(alpha, beta);
        }
        moves.sort_by(|a, b| b.weight.cmp(&a.weight));

        let alpha_orig = alpha;
        for cand in &moves {
            let child = pos.with_move(&cand.mv);
            let child_contested = self.contested_square(pos, &cand.mv);
            self.repetitions.push(child.hash);
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, child_contested);
            self.repetitions.pop(child.hash);

            if score >= beta {
                self.stats.inc_cutoff();
                self.tt.store(key, beta, depth, NodeType::LowerBound);
                self.stats.inc_tt_store();
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        let node_type = if alpha > alpha_orig {
            NodeType::Exact
        } else {
            NodeType::UpperBound
        };
        self.tt.store(key, alpha, depth, node_type);
        self.stats.inc_tt_store();
        alpha
    }

    /// Score of a position without legal moves: mate (faster is more extreme) or stalemate
    #[inline]
    fn terminal_score(&self, pos: &Position, depth: u8) -> i32 {
        if movegen::in_check(pos, pos.side) {
            -(MATE_SCORE + depth as i32)
        } else {
            0
        }
    }

    /// Static value of a leaf, resolving captures on `contested` when set
    fn leaf_score(&mut self, pos: &Position, contested: Option<u8>) -> i32 {
        match contested {
            Some(sq) => self.capture_search(pos, sq, -INFINITY, INFINITY),
            None => eval::relative_score(pos),
        }
    }

    /// Capture-only alpha-beta on one square. The side to move may stand pat
    /// on its material or recapture on `target`; no hashing, no repetitions.
    pub fn capture_search(&mut self, pos: &Position, target: u8, mut alpha: i32, beta: i32) -> i32 {
        self.stats.inc_capture_node();

        let stand_pat = eval::relative_score(pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        // An empty or friendly target has nothing to recapture
        if pos.occupancy(!pos.side) & crate::utils::square_bb(target) == 0 {
            return alpha;
        }

        let mut captures = movegen::gen_moves_onto(pos, target);
        captures.sort_by(|a, b| b.weight.cmp(&a.weight));
        for cand in &captures {
            let child = pos.with_move(&cand.mv);
            let score = -self.capture_search(&child, target, -beta, -alpha);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// Unpruned reference search of the root with the same terminal,
    /// repetition and leaf semantics as [`Search::search`]
    pub fn minimax(&mut self, depth: u8) -> i32 {
        let depth = depth.max(1);
        let root = self.position.clone();
        self.repetitions.seed(&self.history);
        self.repetitions.push(root.hash);
        let score = if self.repetitions.is_threefold(root.hash) {
            // Drawn already; still walk the tree so the repetition table stays balanced
            self.minimax_node(&root, depth, None);
            0
        } else {
            self.minimax_node(&root, depth, None)
        };
        self.repetitions.pop(root.hash);
        score
    }

    fn minimax_node(&mut self, pos: &Position, depth: u8, contested: Option<u8>) -> i32 {
        self.stats.inc_node();
        let moves = movegen::gen_all_moves(pos);
        if moves.is_empty() {
            return self.terminal_score(pos, depth);
        }
        if depth == 0 {
            return self.leaf_score(pos, contested);
        }
        let mut best = -INFINITY;
        for cand in &moves {
            let child = pos.with_move(&cand.mv);
            let child_contested = self.contested_square(pos, &cand.mv);
            self.repetitions.push(child.hash);
            let score = if self.repetitions.is_threefold(child.hash) {
                0
            } else {
                -self.minimax_node(&child, depth - 1, child_contested)
            };
            self.repetitions.pop(child.hash);
            best = best.max(score);
        }
        best
    }
}

/// Best move for `position` searched to `max_depth` plies with default
/// parameters. With `remaining_ms` below the low-clock threshold the depth
/// drops by one (never below 1). None when no legal move exists.
pub fn find_best_move(position: &Position, max_depth: u8, remaining_ms: Option<u64>) -> Option<Move> {
    let params = SearchParams::default().max_depth(max_depth);
    let depth = crate::time::effective_depth(max_depth, remaining_ms, params.low_time_ms);
    let mut search = Search::new(position.clone(), params);
    search.search(Some(depth)).best_move
}
