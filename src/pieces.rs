use serde::{Deserialize, Serialize};
use std::ops::Not;

pub const COLOR_NB: usize = 2;
pub const PIECE_TYPE_NB: usize = 7;
pub const PIECE_NB: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    White = 0,
    Black = 1,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; COLOR_NB] = [PlayerColor::White, PlayerColor::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_str(self) -> &'static str {
        match self {
            PlayerColor::White => "w",
            PlayerColor::Black => "b",
        }
    }
}

impl Not for PlayerColor {
    type Output = PlayerColor;

    #[inline]
    fn not(self) -> PlayerColor {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
        }
    }
}

/// Makruk piece kinds. Slot 0 of every table indexed by kind is left for the
/// "no piece" sentinel, which the material imbalance reuses for the bishop pair.
///
/// - `Queen` is the Met: one diagonal step, so it never leaves its square color.
/// - `Bishop` is the Khon: one diagonal step or one step straight ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 1,
    Queen = 2,
    Bishop = 3,
    Knight = 4,
    Rook = 5,
    King = 6,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Queen,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
        PieceType::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'M' => Some(PieceType::Queen),
            'S' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            'R' => Some(PieceType::Rook),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Most pieces of this kind one side can have: the initial set, plus
    /// every pawn promoted to a Met.
    pub const fn max_count(self) -> u8 {
        match self {
            PieceType::Pawn => 8,
            PieceType::Queen => 9,
            PieceType::Bishop | PieceType::Knight | PieceType::Rook => 2,
            PieceType::King => 1,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Queen => 'M',
            PieceType::Bishop => 'S',
            PieceType::Knight => 'N',
            PieceType::Rook => 'R',
            PieceType::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: PlayerColor,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: PlayerColor) -> Self {
        Piece { piece_type, color }
    }

    /// Index into tables of size `PIECE_NB`: white pieces are 1..=6, black 9..=14.
    #[inline]
    pub const fn index(self) -> usize {
        (self.color as usize) * 8 + self.piece_type as usize
    }

    /// Same kind, other color.
    #[inline]
    pub fn mirrored(self) -> Piece {
        Piece::new(self.piece_type, !self.color)
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            PlayerColor::White
        } else {
            PlayerColor::Black
        };
        Some(Piece::new(piece_type, color))
    }

    pub fn to_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            PlayerColor::White => c,
            PlayerColor::Black => c.to_ascii_lowercase(),
        }
    }
}
