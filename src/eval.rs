//! Valutazione materiale e pesi per l'ordinamento delle mosse
//!
//! Scores are in pawn units: pawn 1, knight and bishop 3, rook 5, queen 9.
//! The king carries no material value; its loss is expressed as mate by the
//! search instead.

use crate::board::{Color, Move, PieceKind, Position};
use crate::movegen;
use crate::utils::count_bits;

// ============================================================================
// VALORI MATERIALI
// ============================================================================
pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;
pub const KING_VALUE: i32 = 0;

// ============================================================================
// PESI DI ORDINAMENTO
// ============================================================================
/// Any capture
pub const CAPTURE_BONUS: i32 = 1;
/// Move leaves the opponent in check
pub const CHECK_BONUS: i32 = 2;
/// Destination is not covered by the opponent before the move
pub const SAFE_SQUARE_BONUS: i32 = 1;

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

fn side_material(pos: &Position, color: Color) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&kind| count_bits(pos.piece_bb(kind, color)) as i32 * piece_value(kind))
        .sum()
}

/// White material minus black material
pub fn material_score(pos: &Position) -> i32 {
    side_material(pos, Color::White) - side_material(pos, Color::Black)
}

/// Material from the point of view of the side to move
#[inline]
pub fn relative_score(pos: &Position) -> i32 {
    match pos.side {
        Color::White => material_score(pos),
        Color::Black => -material_score(pos),
    }
}

/// Ordering weight of a legal move.
///
/// `enemy_attacks` is the opponent's attack set before the move. A capture
/// earns [`CAPTURE_BONUS`] plus the value gained when the victim outweighs
/// the mover; a checking move earns [`CHECK_BONUS`]; landing on a square the
/// opponent does not cover earns [`SAFE_SQUARE_BONUS`].
pub fn move_order_weight(pos: &Position, mv: &Move, enemy_attacks: u64) -> i32 {
    let mut weight = 0;

    if pos.is_capture(mv) {
        weight += CAPTURE_BONUS;
        // En-passant victims are pawns and never outweigh the capturing pawn
        if let Some((victim, _)) = pos.piece_at(mv.to) {
            let gain = piece_value(victim) - piece_value(mv.piece);
            if gain > 0 {
                weight += gain;
            }
        }
    }

    if movegen::gives_check(pos, mv) {
        weight += CHECK_BONUS;
    }

    if enemy_attacks & mv.dest() == 0 {
        weight += SAFE_SQUARE_BONUS;
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::attacks_by;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn startpos_is_balanced() {
        let p = Position::startpos();
        assert_eq!(material_score(&p), 0);
        assert_eq!(side_material(&p, Color::White), 39);
    }

    #[test]
    fn relative_score_flips_with_side() {
        let w = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let b = pos("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        assert_eq!(material_score(&w), 5);
        assert_eq!(relative_score(&w), 5);
        assert_eq!(relative_score(&b), -5);
    }

    #[test]
    fn pawn_takes_rook_outweighs_quiet_move() {
        // pawn d4 can take the rook on e5, nothing black covers e5
        let p = pos("7k/8/8/4r3/3P4/8/8/4K3 w - - 0 1");
        let enemy = attacks_by(&p, Color::Black);
        let capture = Move::new(27, 36, PieceKind::Pawn, Color::White);
        let push = Move::new(27, 35, PieceKind::Pawn, Color::White);
        // capture + (5 - 1) + safe square
        assert_eq!(move_order_weight(&p, &capture, enemy), CAPTURE_BONUS + 4 + SAFE_SQUARE_BONUS);
        // d5 is attacked by the rook on e5
        assert_eq!(move_order_weight(&p, &push, enemy), 0);
    }

    #[test]
    fn checking_move_gets_check_bonus() {
        let p = pos("6k1/8/8/8/8/8/8/R5K1 w - - 0 1");
        let enemy = attacks_by(&p, Color::Black);
        let check = Move::new(0, 56, PieceKind::Rook, Color::White);
        assert_eq!(move_order_weight(&p, &check, enemy), CHECK_BONUS + SAFE_SQUARE_BONUS);
    }
}
