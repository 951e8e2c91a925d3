use crate::pieces::{PIECE_NB, PieceType};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

pub type Value = i32;

// ==================== Score Constants ====================

pub const VALUE_ZERO: Value = 0;
pub const VALUE_DRAW: Value = 0;
pub const VALUE_KNOWN_WIN: Value = 10_000;
pub const VALUE_MATE: Value = 32_000;
pub const MAX_PLY: Value = 246;
pub const VALUE_MATE_IN_MAX_PLY: Value = VALUE_MATE - 2 * MAX_PLY;

pub const PAWN_VALUE_MG: Value = 120;
pub const PAWN_VALUE_EG: Value = 180;
pub const QUEEN_VALUE_MG: Value = 330;
pub const QUEEN_VALUE_EG: Value = 370;
pub const BISHOP_VALUE_MG: Value = 470;
pub const BISHOP_VALUE_EG: Value = 500;
pub const KNIGHT_VALUE_MG: Value = 780;
pub const KNIGHT_VALUE_EG: Value = 830;
pub const ROOK_VALUE_MG: Value = 1270;
pub const ROOK_VALUE_EG: Value = 1380;

/// Non-pawn material one side needs before a lone enemy king is considered lost.
pub const MATING_MATERIAL_THRESHOLD: Value = BISHOP_VALUE_EG + QUEEN_VALUE_EG;

// Game phase
pub const PHASE_ENDGAME: i32 = 0;
pub const PHASE_MIDGAME: i32 = 128;
pub const MG: usize = 0;
pub const EG: usize = 1;
pub const PHASE_NB: usize = 2;

// Scale factors, expressed over SCALE_FACTOR_NORMAL
pub type ScaleFactor = u8;
pub const SCALE_FACTOR_DRAW: ScaleFactor = 0;
pub const SCALE_FACTOR_NORMAL: ScaleFactor = 64;
pub const SCALE_FACTOR_MAX: ScaleFactor = 128;
pub const SCALE_FACTOR_NONE: ScaleFactor = 255;

// ==================== Phase-Scored Values ====================

/// A (middlegame, endgame) pair, interpolated by game phase where it is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub mg: Value,
    pub eg: Value,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    #[inline]
    pub const fn new(mg: Value, eg: Value) -> Score {
        Score { mg, eg }
    }

    #[inline]
    pub const fn mg_value(self) -> Value {
        self.mg
    }

    #[inline]
    pub const fn eg_value(self) -> Value {
        self.eg
    }
}

/// Shorthand for table literals.
pub(crate) const fn s(mg: Value, eg: Value) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;
    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl Sub for Score {
    type Output = Score;
    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl Neg for Score {
    type Output = Score;
    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

// ==================== Piece Values ====================

pub fn get_piece_value(piece_type: PieceType) -> Score {
    match piece_type {
        PieceType::Pawn => s(PAWN_VALUE_MG, PAWN_VALUE_EG),
        PieceType::Queen => s(QUEEN_VALUE_MG, QUEEN_VALUE_EG),
        PieceType::Bishop => s(BISHOP_VALUE_MG, BISHOP_VALUE_EG),
        PieceType::Knight => s(KNIGHT_VALUE_MG, KNIGHT_VALUE_EG),
        PieceType::Rook => s(ROOK_VALUE_MG, ROOK_VALUE_EG),
        // kings are never traded, so they carry no material
        PieceType::King => Score::ZERO,
    }
}

/// Middlegame value, the unit non-pawn material is counted in.
#[inline]
pub fn non_pawn_value(piece_type: PieceType) -> Value {
    match piece_type {
        PieceType::Pawn | PieceType::King => 0,
        pt => get_piece_value(pt).mg,
    }
}

/// Piece values by phase and piece index, black slots mirrored from white.
pub type PieceValueTable = [[Value; PIECE_NB]; PHASE_NB];
