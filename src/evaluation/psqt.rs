//! Piece-square tables.
//!
//! Bonuses are written for white and for files A..D only; the full table is
//! produced by folding files and mirroring ranks, with the piece value folded
//! in so a single lookup gives material plus placement.

use super::base::{EG, MG, PieceValueTable, Score, get_piece_value, s};
use crate::board::{FILE_NB, RANK_NB, SQUARE_NB, Square};
use crate::pieces::{PIECE_NB, PIECE_TYPE_NB, Piece, PieceType, PlayerColor};
use once_cell::sync::Lazy;

const HALF_FILES: usize = FILE_NB / 2;

/// `BONUS[kind][rank][folded file]`, white's point of view. Slot 0 is the
/// empty "no piece" row; pawns past the fifth rank have promoted, so those
/// rows stay zero.
#[rustfmt::skip]
const BONUS: [[[Score; HALF_FILES]; RANK_NB]; PIECE_TYPE_NB] = [
    [[Score::ZERO; HALF_FILES]; RANK_NB],
    [ // Pawn
        [ s(  0, 0), s(  0, 0), s(  0, 0), s( 0, 0) ],
        [ s(  0, 0), s(  0, 0), s(  0, 0), s( 0, 0) ],
        [ s(-18,-4), s( -2,-5), s( 19, 5), s(24, 4) ],
        [ s(-17, 3), s(  1, 3), s( 20,-8), s(35,-3) ],
        [ s( -6, 8), s(  5, 9), s( 15, 7), s(29,-6) ],
        [ s(  0, 0), s(  0, 0), s(  0, 0), s( 0, 0) ],
        [ s(  0, 0), s(  0, 0), s(  0, 0), s( 0, 0) ],
        [ s(  0, 0), s(  0, 0), s(  0, 0), s( 0, 0) ],
    ],
    [ // Queen
        [ s(-141, 0), s(-76, 16), s(-60, 28), s(-53, 30) ],
        [ s( -33,16), s(-43, 55), s(  8, 80), s( 10, 95) ],
        [ s( -44,26), s(-17, 99), s(199,130), s(200,150) ],
        [ s(  -1,26), s(118, 99), s(199,130), s(200,150) ],
        [ s(   7,26), s(116, 99), s(199,130), s(200,150) ],
        [ s(  11,26), s(137, 99), s(199,130), s(200,150) ],
        [ s( -63,16), s( 20, 55), s(  5, 80), s( 14, 95) ],
        [ s(-120, 0), s(-57, 16), s(-32, 28), s(-20, 30) ],
    ],
    [ // Bishop
        [ s(-100, 0), s(-76, 16), s(-60, 28), s(-53, 30) ],
        [ s( -63,16), s(-33, 55), s(  8, 80), s(  6, 95) ],
        [ s(   7,26), s( 89, 99), s( 90,130), s( 99,150) ],
        [ s(   8,26), s(128, 99), s(133,130), s(200,150) ],
        [ s(   9,26), s(136, 99), s(128,130), s(200,150) ],
        [ s(  11,26), s(147, 99), s(146,130), s(200,150) ],
        [ s( -50,16), s( 29, 55), s( 35, 80), s( 54, 95) ],
        [ s(-120, 0), s(-57, 16), s(-32, 28), s(-20, 30) ],
    ],
    [ // Knight
        [ s(-161,-105), s(-96,-82), s(-80,-46), s(-73,-14) ],
        [ s( -83, -69), s(-43,-54), s(-21,-17), s(  0,  9) ],
        [ s( -71, -50), s(  3,-39), s(  4, -7), s(  9, 28) ],
        [ s( -25, -41), s( 18,-25), s( 43,  6), s( 47, 38) ],
        [ s( -26, -46), s( 16,-25), s( 38,  3), s( 50, 40) ],
        [ s( -11, -54), s( 37,-38), s( 56, -7), s( 65, 27) ],
        [ s( -63, -65), s(-19,-50), s(  5,-24), s( 14, 13) ],
        [ s(-195,-109), s(-67,-89), s(-42,-50), s(-29,-13) ],
    ],
    [ // Rook
        [ s(-25,-25), s(-16,-16), s(-16,-16), s(-9,-9) ],
        [ s(-21,-21), s( -8, -8), s( -3, -3), s( 0, 0) ],
        [ s(-21,-21), s( -9, -9), s( -4, -4), s( 2, 2) ],
        [ s(-22,-22), s( -6, -6), s( -1, -1), s( 2, 2) ],
        [ s(-22,-22), s( -7, -7), s(  0,  0), s( 1, 1) ],
        [ s(-21,-21), s( -7, -7), s(  0,  0), s( 2, 2) ],
        [ s(-12,-12), s(  4,  4), s(  8,  8), s(12,12) ],
        [ s(-23,-23), s(-15,-15), s(-11,-11), s(-5,-5) ],
    ],
    [ // King
        [ s(  0,  0), s(  0, 48), s( 64, 75), s(320, 84) ],
        [ s(155, 43), s(254, 92), s(201,143), s(280,132) ],
        [ s(  0, 83), s(176,138), s(200,167), s(245,165) ],
        [ s(  0,106), s(148,169), s(177,169), s(185,179) ],
        [ s(  0,108), s(115,163), s(149,200), s(177,203) ],
        [ s(  0, 95), s( 84,155), s(118,176), s(159,174) ],
        [ s(  0, 50), s( 63, 99), s( 87,122), s(128,139) ],
        [ s(  0,  9), s( 47, 55), s( 63, 80), s( 88, 90) ],
    ],
];

pub struct PsqTable {
    piece_value: PieceValueTable,
    psq: [[Score; SQUARE_NB]; PIECE_NB],
}

impl PsqTable {
    /// Material plus placement for `piece` on `sq`, positive for white.
    #[inline]
    pub fn get(&self, piece: Piece, sq: Square) -> Score {
        self.psq[piece.index()][sq.index()]
    }

    /// Material worth of `piece` in the given phase (`MG` or `EG`).
    #[inline]
    pub fn piece_value(&self, phase: usize, piece: Piece) -> i32 {
        self.piece_value[phase][piece.index()]
    }
}

/// Expand the half-board bonuses into the full table. Pure, so calling it
/// again yields an identical table.
pub fn build() -> PsqTable {
    let mut piece_value: PieceValueTable = [[0; PIECE_NB]; 2];
    let mut psq = [[Score::ZERO; SQUARE_NB]; PIECE_NB];

    for pt in PieceType::ALL {
        let pc = Piece::new(pt, PlayerColor::White);
        let value = get_piece_value(pt);

        piece_value[MG][pc.index()] = value.mg;
        piece_value[EG][pc.index()] = value.eg;
        piece_value[MG][pc.mirrored().index()] = value.mg;
        piece_value[EG][pc.mirrored().index()] = value.eg;

        for idx in 0..SQUARE_NB {
            let sq = Square::from_index(idx);
            let folded = sq.file().min(FILE_NB - 1 - sq.file());
            let score = value + BONUS[pt.index()][sq.rank()][folded];

            psq[pc.index()][idx] = score;
            psq[pc.mirrored().index()][sq.flip_rank().index()] = -score;
        }
    }

    PsqTable { piece_value, psq }
}

static PSQT: Lazy<PsqTable> = Lazy::new(build);

/// Process-wide table, built on first use.
#[inline]
pub fn table() -> &'static PsqTable {
    &PSQT
}

#[inline]
pub fn psq(piece: Piece, sq: Square) -> Score {
    PSQT.get(piece, sq)
}
