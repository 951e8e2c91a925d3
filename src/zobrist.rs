//! Zobrist keys for the material signature.
//!
//! The material key of a position XORs one key per `(piece, ordinal)` pair:
//! the first white rook contributes `material_key(R, 0)`, the second one
//! `material_key(R, 1)`, and so on. The result depends only on how many pieces
//! of each kind and color are on the board, never on where they stand.

use crate::pieces::{PIECE_NB, Piece};

/// Per-piece count ceiling. Makruk has at most 8 pawns plus promoted queens.
pub const MAX_PIECE_COUNT: usize = 16;

static MATERIAL_KEYS: [[u64; MAX_PIECE_COUNT]; PIECE_NB] = {
    // Use a simple PRNG to generate constants at compile time
    const fn splitmix64(mut x: u64) -> u64 {
        x = x.wrapping_add(0x9e3779b97f4a7c15);
        x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }

    let mut keys = [[0u64; MAX_PIECE_COUNT]; PIECE_NB];
    let mut seed = 0x4D41_4B52_554B_2D31u64;

    let mut i = 0;
    while i < PIECE_NB {
        let mut j = 0;
        while j < MAX_PIECE_COUNT {
            seed = splitmix64(seed);
            keys[i][j] = seed;
            j += 1;
        }
        i += 1;
    }
    keys
};

/// Key contributed by the `ordinal`-th (0-based) piece of this kind and color.
#[inline(always)]
pub fn material_key(piece: Piece, ordinal: usize) -> u64 {
    debug_assert!(ordinal < MAX_PIECE_COUNT);
    MATERIAL_KEYS[piece.index()][ordinal]
}
