// Bitboard masks, bit scans, shifts and precomputed templates for move generation
//
// Square mapping used everywhere: A1=0, B1=1, ..., H1=7, A2=8, ..., H8=63.

use crate::error::{EngineError, EngineResult};
use std::sync::OnceLock;

/// Bit-set of 64 squares
pub type Bitboard = u64;

// File masks (A is column 0, H column 7)
pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_H: u64 = 0x8080808080808080;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_3: u64 = 0x0000000000FF0000;
pub const RANK_4: u64 = 0x00000000FF000000;
pub const RANK_5: u64 = 0x000000FF00000000;
pub const RANK_6: u64 = 0x0000FF0000000000;
pub const RANK_7: u64 = 0x00FF000000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

pub const EMPTY: u64 = 0;

// Direction deltas for sliding moves
pub const NORTH: i8 = 8;
pub const SOUTH: i8 = -8;
pub const EAST: i8 = 1;
pub const WEST: i8 = -1;
pub const NORTH_EAST: i8 = 9;
pub const NORTH_WEST: i8 = 7;
pub const SOUTH_EAST: i8 = -7;
pub const SOUTH_WEST: i8 = -9;

pub const ROOK_DIRECTIONS: [i8; 4] = [NORTH, SOUTH, EAST, WEST];
pub const BISHOP_DIRECTIONS: [i8; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

/// Single-bit board for a square index
#[inline]
pub fn square_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Index of the least significant set bit, `None` on the empty set
#[inline]
pub fn scan_forward(bb: u64) -> Option<u8> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as u8)
    }
}

/// Index of the most significant set bit, `None` on the empty set
#[inline]
pub fn scan_reverse(bb: u64) -> Option<u8> {
    if bb == 0 {
        None
    } else {
        Some(63 - bb.leading_zeros() as u8)
    }
}

/// Shift left for positive counts, right for negative ones.
///
/// Returns the empty set when the extreme bit in the shift direction would
/// leave the 0..=63 square range, so chained ray steps never wrap silently.
#[inline]
pub fn shift(bb: u64, count: i8) -> u64 {
    match count {
        0 => bb,
        n if n > 0 => match scan_reverse(bb) {
            Some(top) if (top as i16) + (n as i16) <= 63 => bb << n,
            _ => EMPTY,
        },
        n => match scan_forward(bb) {
            Some(low) if (low as i16) + (n as i16) >= 0 => bb >> (-(n as i16)),
            _ => EMPTY,
        },
    }
}

/// Bit-set of the `n` leftmost files (file A first)
#[inline]
pub fn file_mask(n: u8) -> u64 {
    match n {
        0 => EMPTY,
        n if n >= 8 => !EMPTY,
        n => FILE_A * ((1u64 << n) - 1),
    }
}

/// Keep only targets that did not wrap around the board after a move that
/// changes the file by `file_delta`
#[inline]
fn clip_files(bb: u64, file_delta: i8) -> u64 {
    match file_delta {
        0 => bb,
        d if d > 0 => bb & !file_mask(d as u8),
        d => bb & file_mask(8 - (-d) as u8),
    }
}

fn file_delta_of(direction: i8) -> i8 {
    match direction {
        EAST | NORTH_EAST | SOUTH_EAST => 1,
        WEST | NORTH_WEST | SOUTH_WEST => -1,
        _ => 0,
    }
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<u8> {
    let lsb = scan_forward(*bb)?;
    *bb &= *bb - 1;
    Some(lsb)
}

#[inline]
pub fn count_bits(bb: u64) -> u32 {
    bb.count_ones()
}

pub struct BitIter {
    bb: u64,
}

impl Iterator for BitIter {
    type Item = u8;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

// Precomputed templates using OnceLock for thread safety
static KNIGHT_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();
static KING_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();
static RAYS: OnceLock<[[u64; 64]; 8]> = OnceLock::new();

const ALL_DIRECTIONS: [i8; 8] = [
    NORTH, SOUTH, EAST, WEST, NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST,
];

fn direction_index(direction: i8) -> usize {
    match direction {
        NORTH => 0,
        SOUTH => 1,
        EAST => 2,
        WEST => 3,
        NORTH_EAST => 4,
        NORTH_WEST => 5,
        SOUTH_EAST => 6,
        SOUTH_WEST => 7,
        _ => unreachable!("not a ray direction: {direction}"),
    }
}

fn template_from_offsets(offsets: &[(i8, i8)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let origin = square_bb(sq as u8);
        *slot = offsets
            .iter()
            .map(|&(delta, file_delta)| clip_files(shift(origin, delta), file_delta))
            .fold(EMPTY, |acc, bb| acc | bb);
    }
    attacks
}

fn init_knight_attacks() -> [u64; 64] {
    // (square delta, file delta)
    const KNIGHT_OFFSETS: [(i8, i8); 8] = [
        (17, 1),
        (15, -1),
        (10, 2),
        (6, -2),
        (-6, 2),
        (-10, -2),
        (-15, 1),
        (-17, -1),
    ];
    template_from_offsets(&KNIGHT_OFFSETS)
}

fn init_king_attacks() -> [u64; 64] {
    let offsets: Vec<(i8, i8)> = ALL_DIRECTIONS
        .iter()
        .map(|&d| (d, file_delta_of(d)))
        .collect();
    template_from_offsets(&offsets)
}

fn init_rays() -> [[u64; 64]; 8] {
    let mut rays = [[0u64; 64]; 8];
    for &direction in &ALL_DIRECTIONS {
        let file_delta = file_delta_of(direction);
        for sq in 0..64u8 {
            let mut ray = EMPTY;
            let mut cursor = square_bb(sq);
            loop {
                cursor = clip_files(shift(cursor, direction), file_delta);
                if cursor == EMPTY {
                    break;
                }
                ray |= cursor;
            }
            rays[direction_index(direction)][sq as usize] = ray;
        }
    }
    rays
}

#[inline(always)]
pub fn init_attack_tables() {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks);
    KING_ATTACKS.get_or_init(init_king_attacks);
    RAYS.get_or_init(init_rays);
}

#[inline]
pub fn knight_attacks(sq: u8) -> u64 {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks)[sq as usize]
}

#[inline]
pub fn king_attacks(sq: u8) -> u64 {
    KING_ATTACKS.get_or_init(init_king_attacks)[sq as usize]
}

/// Full-length ray from `sq` (exclusive) towards the board edge
#[inline]
pub fn ray(sq: u8, direction: i8) -> u64 {
    RAYS.get_or_init(init_rays)[direction_index(direction)][sq as usize]
}

/// Ray-walk: the ray from `sq` truncated at (and including) the nearest
/// occupied square. Whether the blocker itself is a legal destination is
/// decided by the caller, which masks out friendly pieces.
#[inline]
pub fn ray_attacks(sq: u8, direction: i8, occupied: u64) -> u64 {
    let full = ray(sq, direction);
    let blockers = full & occupied;
    // Positive directions walk towards higher indices: nearest blocker is the lowest bit
    let nearest = if direction > 0 {
        scan_forward(blockers)
    } else {
        scan_reverse(blockers)
    };
    match nearest {
        Some(blocker) => full & !ray(blocker, direction),
        None => full,
    }
}

#[inline]
pub fn rook_attacks(sq: u8, occupied: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(EMPTY, |acc, &d| acc | ray_attacks(sq, d, occupied))
}

#[inline]
pub fn bishop_attacks(sq: u8, occupied: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(EMPTY, |acc, &d| acc | ray_attacks(sq, d, occupied))
}

/// Squares a pawn of the given colour attacks (white: `white == true`)
#[inline]
pub fn pawn_attacks(pawns: u64, white: bool) -> u64 {
    if white {
        ((pawns & NOT_FILE_A) << 7) | ((pawns & NOT_FILE_H) << 9)
    } else {
        ((pawns & NOT_FILE_A) >> 9) | ((pawns & NOT_FILE_H) >> 7)
    }
}

/// Convert a square index (0-63) to its name (e.g., 0 -> "a1", 63 -> "h8")
pub fn square_name(sq: u8) -> String {
    let file = (b'a' + sq % 8) as char;
    let rank = (b'1' + sq / 8) as char;
    format!("{}{}", file, rank)
}

/// Parse a square name (e.g., "e2" -> 12)
pub fn parse_square(name: &str) -> EngineResult<u8> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return Err(EngineError::InvalidSquare(name.to_string()));
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(EngineError::InvalidSquare(name.to_string()));
    }
    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Names of every square in a bit-set, lowest first
pub fn bitboard_squares(bb: u64) -> Vec<String> {
    iter_bits(bb).map(square_name).collect()
}
