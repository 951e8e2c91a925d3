//! Distance heuristics used by the endgame library.
//!
//! Square tables are laid out rank 1 first (A1 is index 0), so the first row
//! of each literal is the white back rank.

use crate::board::{SQUARE_NB, Square};

/// Drives the king towards the edge in KX vs K.
#[rustfmt::skip]
pub const PUSH_TO_EDGES: [i32; SQUARE_NB] = [
    100, 90, 80, 70, 70, 80, 90, 100,
     90, 70, 60, 50, 50, 60, 70,  90,
     80, 60, 40, 30, 30, 40, 60,  80,
     70, 50, 30, 20, 20, 30, 50,  70,
     70, 50, 30, 20, 20, 30, 50,  70,
     80, 60, 40, 30, 30, 40, 60,  80,
     90, 70, 60, 50, 50, 60, 70,  90,
    100, 90, 80, 70, 70, 80, 90, 100,
];

/// Drives the king towards the far edge (rank 8 for a white attacker).
#[rustfmt::skip]
pub const PUSH_TO_OPPOSING_SIDE_EDGES: [i32; SQUARE_NB] = [
     30,  5,  3,  0,  0,  3,  5,  30,
     40, 20,  5,  0,  0,  5, 20,  40,
     50, 30, 10,  3,  3, 10, 30,  50,
     60, 40, 20,  7,  7, 20, 40,  60,
     70, 50, 30, 20, 20, 30, 50,  70,
     80, 60, 40, 30, 30, 40, 60,  80,
     90, 70, 60, 50, 50, 60, 70,  90,
    100, 90, 80, 70, 70, 80, 90, 100,
];

/// Drives the king towards A1 or H8, the corners a dark-squared queen covers.
#[rustfmt::skip]
pub const PUSH_TO_QUEEN_CORNERS: [i32; SQUARE_NB] = [
    100, 90, 80, 70, 50, 30,  0,   0,
     90, 70, 60, 50, 30, 10,  0,   0,
     80, 60, 40, 30, 10,  0, 10,  30,
     70, 50, 30, 10,  0, 10, 30,  50,
     50, 30, 10,  0, 10, 30, 50,  70,
     30, 10,  0, 10, 30, 40, 60,  80,
      0,  0, 10, 30, 50, 60, 70,  90,
      0,  0, 30, 50, 70, 80, 90, 100,
];

/// Which 3x3 corner region a square belongs to: 1 = A1, 2 = H1, 3 = A8, 4 = H8.
#[rustfmt::skip]
pub const KING_CORNERS: [u8; SQUARE_NB] = [
    1, 1, 1, 0, 0, 2, 2, 2,
    1, 1, 1, 0, 0, 2, 2, 2,
    1, 1, 1, 0, 0, 2, 2, 2,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    3, 3, 3, 0, 0, 4, 4, 4,
    3, 3, 3, 0, 0, 4, 4, 4,
    3, 3, 3, 0, 0, 4, 4, 4,
];

/// Drives the king towards a dark corner.
#[rustfmt::skip]
pub const PUSH_TO_CORNERS: [i32; SQUARE_NB] = [
    200, 190, 180, 170, 160, 150, 140, 130,
    190, 180, 170, 160, 150, 140, 130, 140,
    180, 170, 155, 140, 140, 125, 140, 150,
    170, 160, 140, 120, 110, 140, 150, 160,
    160, 150, 140, 110, 120, 140, 160, 170,
    150, 140, 125, 140, 140, 155, 170, 180,
    140, 130, 140, 150, 160, 170, 180, 190,
    130, 140, 150, 160, 170, 180, 190, 200,
];

// Indexed by king distance
pub const PUSH_CLOSE: [i32; 8] = [0, 0, 100, 80, 60, 40, 20, 10];
pub const PUSH_AWAY: [i32; 8] = [0, 5, 20, 40, 60, 80, 90, 100];
pub const PUSH_WIN: [i32; 8] = [0, 120, 100, 80, 60, 40, 20, 10];

#[inline]
pub fn push_to_edges(sq: Square) -> i32 {
    PUSH_TO_EDGES[sq.index()]
}

#[inline]
pub fn push_to_corners(sq: Square) -> i32 {
    PUSH_TO_CORNERS[sq.index()]
}

#[inline]
pub fn push_to_opposing_side_edges(sq: Square) -> i32 {
    PUSH_TO_OPPOSING_SIDE_EDGES[sq.index()]
}

#[inline]
pub fn push_to_queen_corners(sq: Square) -> i32 {
    PUSH_TO_QUEEN_CORNERS[sq.index()]
}

#[inline]
pub fn push_close(a: Square, b: Square) -> i32 {
    PUSH_CLOSE[a.distance(b)]
}

#[inline]
pub fn push_away(a: Square, b: Square) -> i32 {
    PUSH_AWAY[a.distance(b)]
}

#[inline]
pub fn push_win(a: Square, b: Square) -> i32 {
    PUSH_WIN[a.distance(b)]
}
