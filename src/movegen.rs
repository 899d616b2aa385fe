//! Move generation
//!
//! Pseudo-legal destinations are computed per piece kind (pawn pushes and
//! captures, knight/king templates, ray-walk sliders), then every candidate
//! is filtered through [`is_legal`] by applying it to a copy of the position
//! and checking the mover's king.

use crate::board::{castle_rule_for, Candidate, Color, Move, PieceKind, Position, CASTLE_RULES, MAX_MOVES};
use crate::eval;
use crate::utils::{
    bishop_attacks, iter_bits, king_attacks, knight_attacks, pawn_attacks, pop_lsb, rook_attacks,
    shift, square_bb, EMPTY, NORTH, RANK_1, RANK_2, RANK_7, RANK_8, SOUTH,
};

impl PieceKind {
    /// Pseudo-legal destinations of a piece of this kind standing on `sq`.
    ///
    /// Friendly squares are excluded; king safety is left to [`is_legal`].
    pub fn pseudo_destinations(self, pos: &Position, sq: u8, color: Color) -> u64 {
        let own = pos.occupancy(color);
        let occ = pos.occupied();
        match self {
            PieceKind::Pawn => pawn_destinations(pos, sq, color),
            PieceKind::Knight => knight_attacks(sq) & !own,
            PieceKind::Bishop => bishop_attacks(sq, occ) & !own,
            PieceKind::Rook => rook_attacks(sq, occ) & !own,
            PieceKind::Queen => (rook_attacks(sq, occ) | bishop_attacks(sq, occ)) & !own,
            PieceKind::King => (king_attacks(sq) & !own) | castling_destinations(pos, sq, color),
        }
    }

    /// Squares a piece of this kind on `sq` attacks, blockers included
    pub fn attacks_from(self, sq: u8, color: Color, occupied: u64) -> u64 {
        match self {
            PieceKind::Pawn => pawn_attacks(square_bb(sq), color == Color::White),
            PieceKind::Knight => knight_attacks(sq),
            PieceKind::Bishop => bishop_attacks(sq, occupied),
            PieceKind::Rook => rook_attacks(sq, occupied),
            PieceKind::Queen => rook_attacks(sq, occupied) | bishop_attacks(sq, occupied),
            PieceKind::King => king_attacks(sq),
        }
    }
}

fn pawn_destinations(pos: &Position, sq: u8, color: Color) -> u64 {
    let origin = square_bb(sq);
    let empty = !pos.occupied();
    let (forward, start_rank) = match color {
        Color::White => (NORTH, RANK_2),
        Color::Black => (SOUTH, RANK_7),
    };
    let single = shift(origin, forward) & empty;
    let double = if origin & start_rank != 0 {
        shift(single, forward) & empty
    } else {
        EMPTY
    };
    let targets = pos.occupancy(!color) | pos.en_passant;
    let captures = pawn_attacks(origin, color == Color::White) & targets;
    single | double | captures
}

// Castling destinations; attacked transit squares are rejected by is_legal
fn castling_destinations(pos: &Position, sq: u8, color: Color) -> u64 {
    let occ = pos.occupied();
    CASTLE_RULES
        .iter()
        .filter(|r| {
            r.color == color
                && r.king_from == sq
                && pos.castling & r.right != 0
                && r.between & occ == 0
                && pos.piece_bb(PieceKind::Rook, color) & square_bb(r.rook_from) != 0
        })
        .fold(EMPTY, |acc, r| acc | square_bb(r.king_to))
}

/// Aggregate attack set of every piece of `color`
pub fn attacks_by(pos: &Position, color: Color) -> u64 {
    let occ = pos.occupied();
    let mut attacks = pawn_attacks(pos.piece_bb(PieceKind::Pawn, color), color == Color::White);
    for kind in &PieceKind::ALL[1..] {
        let mut bb = pos.piece_bb(*kind, color);
        while let Some(sq) = pop_lsb(&mut bb) {
            attacks |= kind.attacks_from(sq, color, occ);
        }
    }
    attacks
}

/// Is `sq` attacked by any piece of colour `by`
pub fn is_square_attacked(pos: &Position, sq: u8, by: Color) -> bool {
    let occ = pos.occupied();
    // A pawn of `by` attacks sq iff a pawn of the other colour on sq would attack it back
    if pawn_attacks(square_bb(sq), by != Color::White) & pos.piece_bb(PieceKind::Pawn, by) != 0 {
        return true;
    }
    if knight_attacks(sq) & pos.piece_bb(PieceKind::Knight, by) != 0 {
        return true;
    }
    if king_attacks(sq) & pos.piece_bb(PieceKind::King, by) != 0 {
        return true;
    }
    let queens = pos.piece_bb(PieceKind::Queen, by);
    let diagonal = pos.piece_bb(PieceKind::Bishop, by) | queens;
    if diagonal != 0 && bishop_attacks(sq, occ) & diagonal != 0 {
        return true;
    }
    let straight = pos.piece_bb(PieceKind::Rook, by) | queens;
    straight != 0 && rook_attacks(sq, occ) & straight != 0
}

/// Is the king of `color` attacked (false when that king is absent)
pub fn in_check(pos: &Position, color: Color) -> bool {
    match pos.king_sq(color) {
        Some(sq) => is_square_attacked(pos, sq, !color),
        None => false,
    }
}

/// A move is legal iff the mover's king is safe afterwards and, for castling,
/// no square the king stands on or crosses is attacked beforehand
pub fn is_legal(pos: &Position, mv: &Move) -> bool {
    if mv.is_castle() {
        if let Some(rule) = castle_rule_for(mv.from, mv.to) {
            if attacks_by(pos, !mv.color) & rule.transit != 0 {
                return false;
            }
        }
    }
    let next = pos.with_move(mv);
    !in_check(&next, mv.color)
}

#[inline]
fn is_promotion_square(color: Color, to: u8) -> bool {
    let last_rank = match color {
        Color::White => RANK_8,
        Color::Black => RANK_1,
    };
    square_bb(to) & last_rank != 0
}

/// Legal moves of the piece on `from`, expanded for promotions.
/// With `enemy_attacks` set, each candidate is weighted for ordering.
fn collect_from(pos: &Position, from: u8, enemy_attacks: Option<u64>, out: &mut Vec<Candidate>) {
    let Some((kind, color)) = pos.piece_at(from) else {
        return;
    };
    let dests = kind.pseudo_destinations(pos, from, color);
    for to in iter_bits(dests) {
        let base = Move::new(from, to, kind, color);
        if kind == PieceKind::Pawn && is_promotion_square(color, to) {
            for promo in PieceKind::PROMOTIONS {
                push_if_legal(pos, base.with_promotion(promo), enemy_attacks, out);
            }
        } else {
            push_if_legal(pos, base, enemy_attacks, out);
        }
    }
}

#[inline]
fn push_if_legal(pos: &Position, mv: Move, enemy_attacks: Option<u64>, out: &mut Vec<Candidate>) {
    if !is_legal(pos, &mv) {
        return;
    }
    let weight = match enemy_attacks {
        Some(attacks) => eval::move_order_weight(pos, &mv, attacks),
        None => 0,
    };
    out.push(Candidate::new(mv, weight));
}

/// Legal, weighted candidates for the piece on `sq` (empty when the square is empty)
pub fn extract_moves(pos: &Position, sq: u8) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(32);
    if let Some((_, color)) = pos.piece_at(sq) {
        let enemy = attacks_by(pos, !color);
        collect_from(pos, sq, Some(enemy), &mut out);
    }
    out
}

/// Every legal, weighted candidate for the side to move
pub fn gen_all_moves(pos: &Position) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(MAX_MOVES);
    let enemy = attacks_by(pos, !pos.side);
    let mut own = pos.occupancy(pos.side);
    while let Some(sq) = pop_lsb(&mut own) {
        collect_from(pos, sq, Some(enemy), &mut out);
    }
    out
}

/// Every legal move for the side to move, unweighted (perft and terminal checks)
pub fn gen_legal_moves(pos: &Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(MAX_MOVES);
    let mut own = pos.occupancy(pos.side);
    while let Some(sq) = pop_lsb(&mut own) {
        collect_from(pos, sq, None, &mut out);
    }
    out.into_iter().map(|c| c.mv).collect()
}

/// Legal, weighted candidates of the side to move whose destination is `target`
pub fn gen_moves_onto(pos: &Position, target: u8) -> Vec<Candidate> {
    let target_bb = square_bb(target);
    let enemy = attacks_by(pos, !pos.side);
    let mut out = Vec::new();
    let mut own = pos.occupancy(pos.side);
    while let Some(from) = pop_lsb(&mut own) {
        let Some((kind, color)) = pos.piece_at(from) else {
            continue;
        };
        if kind.pseudo_destinations(pos, from, color) & target_bb == 0 {
            continue;
        }
        let base = Move::new(from, target, kind, color);
        if kind == PieceKind::Pawn && is_promotion_square(color, target) {
            for promo in PieceKind::PROMOTIONS {
                push_if_legal(pos, base.with_promotion(promo), Some(enemy), &mut out);
            }
        } else {
            push_if_legal(pos, base, Some(enemy), &mut out);
        }
    }
    out
}

/// Does the side to move have at least one legal move
pub fn has_legal_move(pos: &Position) -> bool {
    let mut own = pos.occupancy(pos.side);
    while let Some(from) = pop_lsb(&mut own) {
        let Some((kind, color)) = pos.piece_at(from) else {
            continue;
        };
        // Promotion choices never change legality, one probe per destination suffices
        for to in iter_bits(kind.pseudo_destinations(pos, from, color)) {
            if is_legal(pos, &Move::new(from, to, kind, color)) {
                return true;
            }
        }
    }
    false
}

/// Side to move is in check and has no legal reply
pub fn is_checkmate(pos: &Position) -> bool {
    in_check(pos, pos.side) && !has_legal_move(pos)
}

/// Side to move is not in check and has no legal move
pub fn is_stalemate(pos: &Position) -> bool {
    !in_check(pos, pos.side) && !has_legal_move(pos)
}

/// Does playing `mv` put the opponent in check
pub fn gives_check(pos: &Position, mv: &Move) -> bool {
    in_check(&pos.with_move(mv), !mv.color)
}

/// Does playing `mv` checkmate the opponent
pub fn gives_checkmate(pos: &Position, mv: &Move) -> bool {
    is_checkmate(&pos.with_move(mv))
}
