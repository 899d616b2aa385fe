// Position model: twelve piece bit-sets, derived occupancies, castling rights,
// en-passant target, side to move and the incrementally maintained hash.
// Square mapping: A1=0, B1=1, ..., H8=63.

use crate::error::{EngineError, EngineResult};
use crate::utils::{iter_bits, parse_square, scan_forward, square_bb, square_name};
use crate::zobrist;
use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Pieces a pawn may promote to, in generation order
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    #[inline]
    pub fn from_index(i: usize) -> PieceKind {
        Self::ALL[i % 6]
    }

    /// Lower-case letter used by FEN (black) and move notation
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Indice nel piece array: white piece = kind; black piece = 6 + kind
#[inline]
pub(crate) fn piece_index(kind: PieceKind, color: Color) -> usize {
    (color as usize) * 6 + (kind as usize)
}

/// Upper bound on legal moves in any reachable position
pub const MAX_MOVES: usize = 218;

// Castling right bits (same order as the Zobrist castling keys)
pub const CASTLE_WK: u8 = 0b0001;
pub const CASTLE_WQ: u8 = 0b0010;
pub const CASTLE_BK: u8 = 0b0100;
pub const CASTLE_BQ: u8 = 0b1000;
pub const CASTLE_ALL: u8 = 0b1111;

/// Geometry of one castling move
#[derive(Debug, Clone, Copy)]
pub struct CastleRule {
    pub right: u8,
    pub color: Color,
    pub king_from: u8,
    pub king_to: u8,
    pub rook_from: u8,
    pub rook_to: u8,
    /// Squares between king and rook that must be empty
    pub between: u64,
    /// Squares the king stands on or crosses; none may be attacked
    pub transit: u64,
}

pub const CASTLE_RULES: [CastleRule; 4] = [
    CastleRule {
        right: CASTLE_WK,
        color: Color::White,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        rook_to: 5,
        between: (1 << 5) | (1 << 6),
        transit: (1 << 4) | (1 << 5) | (1 << 6),
    },
    CastleRule {
        right: CASTLE_WQ,
        color: Color::White,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        rook_to: 3,
        between: (1 << 1) | (1 << 2) | (1 << 3),
        transit: (1 << 4) | (1 << 3) | (1 << 2),
    },
    CastleRule {
        right: CASTLE_BK,
        color: Color::Black,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        rook_to: 61,
        between: (1 << 61) | (1 << 62),
        transit: (1 << 60) | (1 << 61) | (1 << 62),
    },
    CastleRule {
        right: CASTLE_BQ,
        color: Color::Black,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        rook_to: 59,
        between: (1 << 57) | (1 << 58) | (1 << 59),
        transit: (1 << 60) | (1 << 59) | (1 << 58),
    },
];

/// Castling rule matching a king move, if the move is a castle
pub fn castle_rule_for(from: u8, to: u8) -> Option<&'static CastleRule> {
    CASTLE_RULES
        .iter()
        .find(|r| r.king_from == from && r.king_to == to)
}

/// A proposed half-move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub piece: PieceKind,
    pub color: Color,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: u8, to: u8, piece: PieceKind, color: Color) -> Self {
        Self {
            from,
            to,
            piece,
            color,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Source square as a bit-set
    #[inline]
    pub fn src(&self) -> u64 {
        square_bb(self.from)
    }

    /// Destination square as a bit-set
    #[inline]
    pub fn dest(&self) -> u64 {
        square_bb(self.to)
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.piece == PieceKind::King && self.from.abs_diff(self.to) == 2
    }

    /// Long algebraic notation, e.g. "e2e4" or "e7e8q"
    pub fn to_uci(&self) -> String {
        let mut s = format!("{}{}", square_name(self.from), square_name(self.to));
        if let Some(promo) = self.promotion {
            s.push(promo.to_char());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// A move paired with its ordering weight or search score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub mv: Move,
    pub weight: i32,
}

impl Candidate {
    pub fn new(mv: Move, weight: i32) -> Self {
        Self { mv, weight }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    // 12 bitboard: 0-5 = white p,n,b,r,q,k; 6-11 = black p,n,b,r,q,k
    pieces: [u64; 12],
    pub white_occ: u64,
    pub black_occ: u64,
    /// At most one bit: the square a pawn may capture onto en passant
    pub en_passant: u64,
    pub castling: u8,
    pub side: Color,
    pub hash: u64,
    pub halfmove: u16,
    pub fullmove: u16,
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    // Board vuota da popolare via put_piece
    pub fn empty() -> Self {
        let mut pos = Self {
            pieces: [0; 12],
            white_occ: 0,
            black_occ: 0,
            en_passant: 0,
            castling: 0,
            side: Color::White,
            hash: 0,
            halfmove: 0,
            fullmove: 1,
        };
        pos.hash = pos.recalc_hash();
        pos
    }

    /// Standard starting setup
    pub fn startpos() -> Self {
        let mut pos = Self::empty();
        pos.pieces = [
            0x0000_0000_0000_FF00,
            0x0000_0000_0000_0042,
            0x0000_0000_0000_0024,
            0x0000_0000_0000_0081,
            0x0000_0000_0000_0008,
            0x0000_0000_0000_0010,
            0x00FF_0000_0000_0000,
            0x4200_0000_0000_0000,
            0x2400_0000_0000_0000,
            0x8100_0000_0000_0000,
            0x0800_0000_0000_0000,
            0x1000_0000_0000_0000,
        ];
        pos.castling = CASTLE_ALL;
        pos.refresh_occupancy();
        pos.hash = pos.recalc_hash();
        pos
    }

    #[inline]
    pub fn piece_bb(&self, kind: PieceKind, color: Color) -> u64 {
        self.pieces[piece_index(kind, color)]
    }

    /// The twelve piece bit-sets in `[color * 6 + kind]` order
    #[inline]
    pub fn piece_sets(&self) -> &[u64; 12] {
        &self.pieces
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_occ,
            Color::Black => self.black_occ,
        }
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.white_occ | self.black_occ
    }

    /// Piece (kind, color) on a square, or None when empty
    pub fn piece_at(&self, sq: u8) -> Option<(PieceKind, Color)> {
        let mask = square_bb(sq);
        if self.occupied() & mask == 0 {
            return None;
        }
        self.pieces
            .iter()
            .position(|bb| bb & mask != 0)
            .map(|i| {
                let color = if i < 6 { Color::White } else { Color::Black };
                (PieceKind::from_index(i), color)
            })
    }

    #[inline]
    pub fn king_sq(&self, color: Color) -> Option<u8> {
        scan_forward(self.piece_bb(PieceKind::King, color))
    }

    /// Place a piece during setup; the caller refreshes occupancy and hash afterwards
    pub fn put_piece(&mut self, sq: u8, kind: PieceKind, color: Color) {
        let mask = square_bb(sq);
        for bb in self.pieces.iter_mut() {
            *bb &= !mask;
        }
        self.pieces[piece_index(kind, color)] |= mask;
    }

    // Refresh occupancy after bulk placement or a move
    pub fn refresh_occupancy(&mut self) {
        self.white_occ = self.pieces[..6].iter().fold(0, |acc, bb| acc | bb);
        self.black_occ = self.pieces[6..].iter().fold(0, |acc, bb| acc | bb);
    }

    pub fn recalc_hash(&self) -> u64 {
        zobrist::recalc_zobrist_full(self)
    }

    /// Whether applying `mv` here removes an enemy piece
    #[inline]
    pub fn is_capture(&self, mv: &Move) -> bool {
        self.occupancy(!mv.color) & mv.dest() != 0
            || (mv.piece == PieceKind::Pawn && mv.dest() == self.en_passant)
    }

    #[inline]
    fn toggle(&mut self, kind: PieceKind, color: Color, sq: u8, keys: &zobrist::ZobristKeys) {
        self.pieces[piece_index(kind, color)] ^= square_bb(sq);
        self.hash ^= keys.piece_key(kind, color, sq);
    }

    /// Rights still backed by an unmoved king and rook on their home squares
    pub(crate) fn surviving_rights(&self) -> u8 {
        CASTLE_RULES
            .iter()
            .filter(|r| {
                self.piece_bb(PieceKind::King, r.color) & square_bb(r.king_from) != 0
                    && self.piece_bb(PieceKind::Rook, r.color) & square_bb(r.rook_from) != 0
            })
            .fold(0, |acc, r| acc | r.right)
    }

    /// Apply a move in place, updating every derived field and the hash
    pub fn apply_move(&mut self, mv: &Move) {
        let keys = zobrist::keys();
        let us = mv.color;
        let them = !us;
        let captured_pawn_ep = mv.piece == PieceKind::Pawn && mv.dest() == self.en_passant;
        let is_capture = self.is_capture(mv);

        // Capture on the destination square
        if let Some((kind, color)) = self.piece_at(mv.to) {
            self.toggle(kind, color, mv.to, keys);
        }

        self.toggle(mv.piece, us, mv.from, keys);
        self.toggle(mv.piece, us, mv.to, keys);

        // En-passant victim sits behind the target square
        if captured_pawn_ep {
            let victim = match us {
                Color::White => mv.to - 8,
                Color::Black => mv.to + 8,
            };
            self.toggle(PieceKind::Pawn, them, victim, keys);
        }

        if mv.is_castle() {
            if let Some(rule) = castle_rule_for(mv.from, mv.to) {
                self.toggle(PieceKind::Rook, us, rule.rook_from, keys);
                self.toggle(PieceKind::Rook, us, rule.rook_to, keys);
            }
        }

        if let Some(promo) = mv.promotion {
            self.toggle(PieceKind::Pawn, us, mv.to, keys);
            self.toggle(promo, us, mv.to, keys);
        }

        self.side = them;
        self.hash ^= keys.side;

        // Old target out, new target in: two separate toggles
        self.hash ^= keys.ep_key(self.en_passant);
        self.en_passant = if mv.piece == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
            square_bb((mv.from + mv.to) / 2)
        } else {
            0
        };
        self.hash ^= keys.ep_key(self.en_passant);

        let old_rights = self.castling;
        self.castling &= self.surviving_rights();
        self.hash ^= keys.castling_key(old_rights ^ self.castling);

        self.refresh_occupancy();

        if mv.piece == PieceKind::Pawn || is_capture {
            self.halfmove = 0;
        } else {
            self.halfmove = self.halfmove.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }

        debug_assert!(
            self.check_invariants().is_ok(),
            "invariant broken after {}: {:?}",
            mv,
            self.check_invariants()
        );
    }

    /// Copy of this position with `mv` applied
    pub fn with_move(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    /// Structural invariants: disjoint piece-sets, consistent occupancy,
    /// a single en-passant bit and an incremental hash matching recomputation
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = 0u64;
        for (i, &bb) in self.pieces.iter().enumerate() {
            if seen & bb != 0 {
                return Err(format!(
                    "piece set {} overlaps squares {:?}",
                    i,
                    crate::utils::bitboard_squares(seen & bb)
                ));
            }
            seen |= bb;
        }
        let white = self.pieces[..6].iter().fold(0, |acc, bb| acc | bb);
        let black = self.pieces[6..].iter().fold(0, |acc, bb| acc | bb);
        if white != self.white_occ || black != self.black_occ {
            return Err("occupancy out of date".to_string());
        }
        if self.white_occ & self.black_occ != 0 {
            return Err("square claimed by both colours".to_string());
        }
        if self.en_passant.count_ones() > 1 {
            return Err("more than one en-passant target".to_string());
        }
        let full = self.recalc_hash();
        if full != self.hash {
            return Err(format!(
                "hash mismatch: incremental {:#018x}, recomputed {:#018x}",
                self.hash, full
            ));
        }
        Ok(())
    }

    /// Every occupied square with its piece, lowest square first
    pub fn pieces_on_board(&self) -> Vec<(u8, PieceKind, Color)> {
        iter_bits(self.occupied())
            .filter_map(|sq| self.piece_at(sq).map(|(k, c)| (sq, k, c)))
            .collect()
    }
}

/// Resolve four- or five-character move notation against the legal moves of `position`
pub fn parse_move(position: &Position, text: &str) -> EngineResult<Move> {
    let text = text.trim();
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(EngineError::InvalidMove(text.to_string()));
    }
    let from = parse_square(&text[0..2])?;
    let to = parse_square(&text[2..4])?;
    let promotion = match text.chars().nth(4) {
        Some(c) => match PieceKind::from_char(c) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(EngineError::InvalidMove(text.to_string())),
        },
        None => None,
    };

    let (piece, color) = position
        .piece_at(from)
        .ok_or_else(|| EngineError::EmptySquare(square_name(from)))?;
    if color != position.side {
        return Err(EngineError::InvalidMove(text.to_string()));
    }
    let mut mv = Move::new(from, to, piece, color);
    mv.promotion = promotion;

    let legal = crate::movegen::extract_moves(position, from);
    if legal.iter().any(|c| c.mv == mv) {
        Ok(mv)
    } else {
        Err(EngineError::InvalidMove(text.to_string()))
    }
}

// Textual board dump, rank 8 first
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let sq = rank * 8 + file;
                match self.piece_at(sq) {
                    Some((p, Color::White)) => write!(f, "{} ", p.to_char().to_ascii_uppercase())?,
                    Some((p, Color::Black)) => write!(f, "{} ", p.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_consistent() {
        let pos = Position::startpos();
        assert!(pos.check_invariants().is_ok());
        assert_eq!(pos.piece_at(4), Some((PieceKind::King, Color::White)));
        assert_eq!(pos.piece_at(59), Some((PieceKind::Queen, Color::Black)));
        assert_eq!(pos.piece_at(27), None);
        assert_eq!(pos.occupied().count_ones(), 32);
        assert_eq!(pos.castling, CASTLE_ALL);
    }

    #[test]
    fn double_push_sets_en_passant_and_flips_side() {
        let pos = Position::startpos();
        let next = pos.with_move(&Move::new(12, 28, PieceKind::Pawn, Color::White));
        assert_eq!(next.en_passant, square_bb(20));
        assert_eq!(next.side, Color::Black);
        assert_eq!(next.hash, next.recalc_hash());
        // Only the pawn, the side, and the en-passant target differ
        assert_eq!(next.piece_at(28), Some((PieceKind::Pawn, Color::White)));
        assert_eq!(next.piece_at(12), None);
        assert_eq!(next.castling, pos.castling);
    }

    #[test]
    fn king_move_clears_both_rights() {
        let mut pos = Position::empty();
        pos.put_piece(4, PieceKind::King, Color::White);
        pos.put_piece(0, PieceKind::Rook, Color::White);
        pos.put_piece(7, PieceKind::Rook, Color::White);
        pos.put_piece(60, PieceKind::King, Color::Black);
        pos.castling = CASTLE_WK | CASTLE_WQ;
        pos.refresh_occupancy();
        pos.hash = pos.recalc_hash();

        let next = pos.with_move(&Move::new(4, 5, PieceKind::King, Color::White));
        assert_eq!(next.castling, 0);
        assert_eq!(next.hash, next.recalc_hash());
    }

    #[test]
    fn castling_moves_the_rook() {
        let mut pos = Position::empty();
        pos.put_piece(4, PieceKind::King, Color::White);
        pos.put_piece(7, PieceKind::Rook, Color::White);
        pos.put_piece(60, PieceKind::King, Color::Black);
        pos.castling = CASTLE_WK;
        pos.refresh_occupancy();
        pos.hash = pos.recalc_hash();

        let next = pos.with_move(&Move::new(4, 6, PieceKind::King, Color::White));
        assert_eq!(next.piece_at(5), Some((PieceKind::Rook, Color::White)));
        assert_eq!(next.piece_at(7), None);
        assert_eq!(next.castling, 0);
    }

    #[test]
    fn move_notation() {
        let mv = Move::new(52, 60, PieceKind::Pawn, Color::White).with_promotion(PieceKind::Queen);
        assert_eq!(mv.to_uci(), "e7e8q");
        let pos = Position::startpos();
        let parsed = parse_move(&pos, "g1f3").unwrap();
        assert_eq!(parsed.piece, PieceKind::Knight);
        assert!(matches!(parse_move(&pos, "e4e5"), Err(EngineError::EmptySquare(_))));
        assert!(matches!(parse_move(&pos, "e2e5"), Err(EngineError::InvalidMove(_))));
        assert!(parse_move(&pos, "zz").is_err());
    }

    #[test]
    fn board_dump() {
        let dump = Position::startpos().to_string();
        let first = dump.lines().next().unwrap();
        assert_eq!(first, "r n b q k b n r ");
        assert_eq!(dump.lines().count(), 8);
    }
}
