// Perft: exhaustive move-tree enumeration for generator validation

use crate::board::{Move, PieceKind, Position};
use crate::movegen::{gen_legal_moves, has_legal_move, in_check};
use std::ops::AddAssign;

/// Counts of the leaf moves at the requested depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub checks: u64,
    pub checkmates: u64,
    pub castles: u64,
    pub promotions: u64,
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passants += rhs.en_passants;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

impl PerftStats {
    // Classify the last move of a line: `before` is the position it was played from
    fn record(&mut self, before: &Position, mv: &Move, after: &Position) {
        self.nodes += 1;
        if before.is_capture(mv) {
            self.captures += 1;
        }
        if mv.piece == PieceKind::Pawn && mv.dest() == before.en_passant {
            self.en_passants += 1;
        }
        if mv.is_castle() {
            self.castles += 1;
        }
        if mv.promotion.is_some() {
            self.promotions += 1;
        }
        if in_check(after, after.side) {
            self.checks += 1;
            if !has_legal_move(after) {
                self.checkmates += 1;
            }
        }
    }
}

/// Full statistics at `depth`. Depth 0 counts the position itself as one node.
pub fn perft(pos: &Position, depth: u8) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }
    for mv in gen_legal_moves(pos) {
        let next = pos.with_move(&mv);
        if depth == 1 {
            stats.record(pos, &mv, &next);
        } else {
            stats += perft(&next, depth - 1);
        }
    }
    stats
}

/// Node count only
pub fn perft_count(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = gen_legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| perft_count(&pos.with_move(mv), depth - 1))
        .sum()
}

/// Node counts below each root move, in generation order
pub fn divide(pos: &Position, depth: u8) -> Vec<(Move, u64)> {
    let child_depth = depth.saturating_sub(1);
    gen_legal_moves(pos)
        .into_iter()
        .map(|mv| (mv, perft_count(&pos.with_move(&mv), child_depth)))
        .collect()
}
