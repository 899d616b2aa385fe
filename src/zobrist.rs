// Zobrist hashing with a seeded key table
use crate::board::{Color, PieceKind, Position, CASTLE_ALL};
use crate::error::{EngineError, EngineResult};
use crate::utils::{pop_lsb, scan_forward};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::OnceLock;

/// Seed used when nobody initialises the table explicitly
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x5EED_CAFE_F00D_B175;

/// Independent random keys for every hashed feature of a position
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    seed: u64,
    /// [color * 6 + kind][square]
    pub piece: [[u64; 64]; 12],
    pub side: u64,
    /// One key per castling right, in right-bit order
    pub castling: [u64; 4],
    pub ep_file: [u64; 8],
    /// Mixed into transposition keys of leaves resolved around a contested square
    pub contested: [u64; 64],
}

impl ZobristKeys {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece = [[0u64; 64]; 12];
        for row in piece.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.next_u64();
            }
        }
        let side = rng.next_u64();
        let mut castling = [0u64; 4];
        castling.iter_mut().for_each(|k| *k = rng.next_u64());
        let mut ep_file = [0u64; 8];
        ep_file.iter_mut().for_each(|k| *k = rng.next_u64());
        let mut contested = [0u64; 64];
        contested.iter_mut().for_each(|k| *k = rng.next_u64());
        Self {
            seed,
            piece,
            side,
            castling,
            ep_file,
            contested,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn piece_key(&self, kind: PieceKind, color: Color, sq: u8) -> u64 {
        self.piece[color as usize * 6 + kind as usize][sq as usize]
    }

    /// XOR of the keys of every right set in `rights`
    #[inline]
    pub fn castling_key(&self, rights: u8) -> u64 {
        (0..4)
            .filter(|bit| rights & (1 << bit) != 0)
            .fold(0, |h, bit| h ^ self.castling[bit])
    }

    /// Key of an en-passant target bit-set (0 when there is none)
    #[inline]
    pub fn ep_key(&self, en_passant: u64) -> u64 {
        match scan_forward(en_passant) {
            Some(sq) => self.ep_file[(sq % 8) as usize],
            None => 0,
        }
    }

    /// Full recomputation over pieces, side to move, castling and en-passant
    pub fn hash(&self, position: &Position) -> u64 {
        let mut h = 0u64;
        for (index, &bb) in position.piece_sets().iter().enumerate() {
            let mut bb = bb;
            while let Some(sq) = pop_lsb(&mut bb) {
                h ^= self.piece[index][sq as usize];
            }
        }
        if position.side == Color::Black {
            h ^= self.side;
        }
        h ^= self.castling_key(position.castling & CASTLE_ALL);
        h ^= self.ep_key(position.en_passant);
        h
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Process-wide key table; generated from `DEFAULT_ZOBRIST_SEED` on first use
#[inline]
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| ZobristKeys::with_seed(DEFAULT_ZOBRIST_SEED))
}

/// Generate the process-wide table from `seed`.
///
/// Must run before the first position is hashed. Re-initialising with the
/// seed already in use is a no-op; any other seed is rejected.
pub fn init_with_seed(seed: u64) -> EngineResult<()> {
    let existing = KEYS.get_or_init(|| ZobristKeys::with_seed(seed)).seed();
    if existing == seed {
        Ok(())
    } else {
        Err(EngineError::ZobristSeedConflict {
            existing,
            requested: seed,
        })
    }
}

pub fn init_zobrist() {
    keys();
}

/// Hash a position from scratch with the process-wide keys
pub fn recalc_zobrist_full(position: &Position) -> u64 {
    keys().hash(position)
}
