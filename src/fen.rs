// FEN loading and printing for Position

use crate::board::{Color, PieceKind, Position, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::error::{EngineError, EngineResult};
use crate::utils::{
    parse_square, scan_forward, square_bb, square_name, RANK_1, RANK_3, RANK_6, RANK_8,
};

const CASTLE_CHARS: [(char, u8); 4] = [
    ('K', CASTLE_WK),
    ('Q', CASTLE_WQ),
    ('k', CASTLE_BK),
    ('q', CASTLE_BQ),
];

impl Position {
    /// Load a position from FEN.
    ///
    /// The halfmove and fullmove fields may be omitted (they default to 0
    /// and 1). Castling rights not backed by a king and rook on their home
    /// squares are dropped.
    pub fn from_fen(fen: &str) -> EngineResult<Position> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or_else(|| EngineError::fen("missing piece placement"))?;
        let side_part = parts.next().ok_or_else(|| EngineError::fen("missing side to move"))?;
        let castle_part = parts.next().ok_or_else(|| EngineError::fen("missing castling field"))?;
        let ep_part = parts.next().ok_or_else(|| EngineError::fen("missing en-passant field"))?;
        let halfmove_part = parts.next();
        let fullmove_part = parts.next();
        if parts.next().is_some() {
            return Err(EngineError::fen("trailing fields"));
        }

        let mut pos = Position::empty();

        // Ranks come 8 -> 1
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(EngineError::fen(format!("expected 8 ranks, found {}", ranks.len())));
        }
        for (i, rank_part) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in rank_part.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(EngineError::fen(format!("bad empty-run '{}'", ch)));
                    }
                    file += skip as u8;
                } else {
                    let kind = PieceKind::from_char(ch)
                        .ok_or_else(|| EngineError::fen(format!("invalid piece char '{}'", ch)))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(EngineError::fen(format!("rank {} overflows", rank + 1)));
                    }
                    pos.put_piece(rank * 8 + file, kind, color);
                    file += 1;
                }
                if file > 8 {
                    return Err(EngineError::fen(format!("rank {} overflows", rank + 1)));
                }
            }
            if file != 8 {
                return Err(EngineError::fen(format!("rank {} has {} files", rank + 1, file)));
            }
        }
        pos.refresh_occupancy();

        for color in [Color::White, Color::Black] {
            if pos.piece_bb(PieceKind::King, color).count_ones() != 1 {
                return Err(EngineError::fen(format!("{:?} must have exactly one king", color)));
            }
        }
        let back_ranks = RANK_1 | RANK_8;
        if (pos.piece_bb(PieceKind::Pawn, Color::White) | pos.piece_bb(PieceKind::Pawn, Color::Black))
            & back_ranks
            != 0
        {
            return Err(EngineError::fen("pawn on a back rank"));
        }

        pos.side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(EngineError::fen(format!("invalid side '{}'", other))),
        };

        pos.castling = 0;
        if castle_part != "-" {
            for ch in castle_part.chars() {
                let (_, bit) = CASTLE_CHARS
                    .iter()
                    .find(|(c, _)| *c == ch)
                    .ok_or_else(|| EngineError::fen(format!("invalid castling char '{}'", ch)))?;
                pos.castling |= bit;
            }
        }
        pos.castling &= pos.surviving_rights();

        pos.en_passant = match ep_part {
            "-" => 0,
            name => {
                let sq = parse_square(name).map_err(|_| EngineError::fen(format!("invalid en-passant square '{}'", name)))?;
                let expected_rank = match pos.side {
                    Color::White => RANK_6,
                    Color::Black => RANK_3,
                };
                if square_bb(sq) & expected_rank == 0 {
                    return Err(EngineError::fen(format!("en-passant square {} on wrong rank", name)));
                }
                // The pawn that just double-pushed stands one rank beyond the target
                let (pusher, pushed_to) = match pos.side {
                    Color::White => (Color::Black, sq - 8),
                    Color::Black => (Color::White, sq + 8),
                };
                if pos.occupied() & square_bb(sq) != 0
                    || pos.piece_bb(PieceKind::Pawn, pusher) & square_bb(pushed_to) == 0
                {
                    return Err(EngineError::fen(format!("no double-pushed pawn behind {}", name)));
                }
                square_bb(sq)
            }
        };

        pos.halfmove = match halfmove_part {
            Some(s) => s.parse().map_err(|_| EngineError::fen(format!("invalid halfmove '{}'", s)))?,
            None => 0,
        };
        pos.fullmove = match fullmove_part {
            Some(s) => s.parse().map_err(|_| EngineError::fen(format!("invalid fullmove '{}'", s)))?,
            None => 1,
        };

        pos.hash = pos.recalc_hash();
        Ok(pos)
    }

    /// Print the position as FEN
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(rank * 8 + file) {
                    Some((kind, color)) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        let c = kind.to_char();
                        out.push(if color == Color::White { c.to_ascii_uppercase() } else { c });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side == Color::White { 'w' } else { 'b' });

        out.push(' ');
        if self.castling == 0 {
            out.push('-');
        } else {
            for (c, bit) in CASTLE_CHARS {
                if self.castling & bit != 0 {
                    out.push(c);
                }
            }
        }

        out.push(' ');
        match scan_forward(self.en_passant) {
            Some(sq) => out.push_str(&square_name(sq)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        out
    }
}
