//! Squares, bitboards and the fixed attack patterns of Makruk pieces.
//!
//! Squares are numbered 0..64 with A1 = 0, B1 = 1, ..., H8 = 63. Bitboards are
//! plain `u64` masks in the same numbering.

use crate::pieces::PlayerColor;
use serde::{Deserialize, Serialize};

pub type Bitboard = u64;

pub const SQUARE_NB: usize = 64;
pub const FILE_NB: usize = 8;
pub const RANK_NB: usize = 8;

/// A1 is dark; so are all squares with an even file + rank sum.
pub const DARK_SQUARES: Bitboard = 0xAA55_AA55_AA55_AA55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const H8: Square = Square(63);

    #[inline]
    pub const fn new(file: usize, rank: usize) -> Square {
        debug_assert!(file < FILE_NB && rank < RANK_NB);
        Square((rank * 8 + file) as u8)
    }

    #[inline]
    pub const fn from_index(idx: usize) -> Square {
        debug_assert!(idx < SQUARE_NB);
        Square(idx as u8)
    }

    /// Parse algebraic notation such as `"e4"`.
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let f = chars.next()?;
        let r = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&f) || !('1'..='8').contains(&r) {
            return None;
        }
        Some(Square::new(f as usize - 'a' as usize, r as usize - '1' as usize))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    #[inline]
    pub const fn rank(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Same file, opposite rank (A1 <-> A8).
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Same rank, opposite file (A1 <-> H1).
    #[inline]
    pub const fn flip_file(self) -> Square {
        Square(self.0 ^ 7)
    }

    /// Rank as seen from `color`'s side of the board.
    #[inline]
    pub fn relative_rank(self, color: PlayerColor) -> usize {
        match color {
            PlayerColor::White => self.rank(),
            PlayerColor::Black => 7 - self.rank(),
        }
    }

    #[inline]
    pub const fn bb(self) -> Bitboard {
        1u64 << self.0
    }

    #[inline]
    pub const fn is_dark(self) -> bool {
        DARK_SQUARES & self.bb() != 0
    }

    /// King-move (Chebyshev) distance.
    #[inline]
    pub fn distance(self, other: Square) -> usize {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        df.max(dr)
    }

    #[inline]
    pub fn opposite_colors(self, other: Square) -> bool {
        self.is_dark() != other.is_dark()
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file() as u8) as char,
            (b'1' + self.rank() as u8) as char
        )
    }
}

#[inline]
pub const fn more_than_one(b: Bitboard) -> bool {
    b & b.wrapping_sub(1) != 0
}

/// Remove and return the lowest square of a non-empty bitboard.
#[inline]
pub fn pop_lsb(b: &mut Bitboard) -> Square {
    debug_assert!(*b != 0);
    let sq = Square::from_index(b.trailing_zeros() as usize);
    *b &= *b - 1;
    sq
}

#[inline]
pub fn lsb(b: Bitboard) -> Option<Square> {
    if b == 0 {
        None
    } else {
        Some(Square::from_index(b.trailing_zeros() as usize))
    }
}

// ==================== Attack Tables ====================

const fn leaper_table(deltas: &[(i32, i32)]) -> [Bitboard; SQUARE_NB] {
    let mut table = [0u64; SQUARE_NB];
    let mut sq = 0;
    while sq < SQUARE_NB {
        let f = (sq % 8) as i32;
        let r = (sq / 8) as i32;
        let mut i = 0;
        while i < deltas.len() {
            let nf = f + deltas[i].0;
            let nr = r + deltas[i].1;
            if nf >= 0 && nf < 8 && nr >= 0 && nr < 8 {
                table[sq] |= 1u64 << (nr * 8 + nf);
            }
            i += 1;
        }
        sq += 1;
    }
    table
}

#[rustfmt::skip]
const KING_DELTAS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];
const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const DIAGONAL_DELTAS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const WHITE_BISHOP_DELTAS: [(i32, i32); 5] = [(-1, -1), (1, -1), (-1, 1), (1, 1), (0, 1)];
const BLACK_BISHOP_DELTAS: [(i32, i32); 5] = [(-1, -1), (1, -1), (-1, 1), (1, 1), (0, -1)];
const WHITE_PAWN_DELTAS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

static KING_ATTACKS: [Bitboard; SQUARE_NB] = leaper_table(&KING_DELTAS);
static KNIGHT_ATTACKS: [Bitboard; SQUARE_NB] = leaper_table(&KNIGHT_DELTAS);
static QUEEN_ATTACKS: [Bitboard; SQUARE_NB] = leaper_table(&DIAGONAL_DELTAS);
static BISHOP_ATTACKS: [[Bitboard; SQUARE_NB]; 2] = [
    leaper_table(&WHITE_BISHOP_DELTAS),
    leaper_table(&BLACK_BISHOP_DELTAS),
];
static PAWN_ATTACKS: [[Bitboard; SQUARE_NB]; 2] = [
    leaper_table(&WHITE_PAWN_DELTAS),
    leaper_table(&BLACK_PAWN_DELTAS),
];

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// Met attacks: the four diagonal neighbours.
#[inline]
pub fn queen_attacks(sq: Square) -> Bitboard {
    QUEEN_ATTACKS[sq.index()]
}

/// Khon attacks: diagonal neighbours plus the square straight ahead.
#[inline]
pub fn bishop_attacks(color: PlayerColor, sq: Square) -> Bitboard {
    BISHOP_ATTACKS[color.index()][sq.index()]
}

#[inline]
pub fn pawn_attacks(color: PlayerColor, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Rook attacks along ranks and files, stopping at (and including) blockers.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    for (df, dr) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let (mut nf, mut nr) = (f + df, r + dr);
        while (0..8).contains(&nf) && (0..8).contains(&nr) {
            let b = 1u64 << (nr * 8 + nf);
            attacks |= b;
            if occupied & b != 0 {
                break;
            }
            nf += df;
            nr += dr;
        }
    }
    attacks
}
