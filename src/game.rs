use crate::board::{Bitboard, SQUARE_NB, Square, lsb};
use crate::evaluation::base::{Score, Value, non_pawn_value};
use crate::evaluation::psqt;
use crate::moves::{Move, MoveList, get_legal_moves, is_square_attacked};
use crate::pieces::{COLOR_NB, PIECE_TYPE_NB, Piece, PieceType, PlayerColor};
use crate::zobrist::material_key;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 squares")]
    RankWidth { rank: usize },
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("{color:?} must have exactly one king, found {found}")]
    KingCount { color: PlayerColor, found: u8 },
    #[error("more {0:?} pieces than Makruk allows")]
    TooManyPieces(Piece),
}

/// Piece placement plus the material bookkeeping the evaluator reads.
///
/// Counts, non-pawn material, the material key and the PSQT sum are kept in
/// step with the board by `put_piece`/`remove_piece`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; SQUARE_NB],
    by_type: [Bitboard; PIECE_TYPE_NB],
    by_color: [Bitboard; COLOR_NB],
    counts: [[u8; PIECE_TYPE_NB]; COLOR_NB],
    non_pawn_material: [Value; COLOR_NB],
    material_key: u64,
    psq: Score,
    side_to_move: PlayerColor,
}

impl Default for Position {
    fn default() -> Self {
        Position::empty()
    }
}

impl Position {
    pub const START_FEN: &'static str = "rnsmksnr/8/pppppppp/8/8/PPPPPPPP/8/RNSKMSNR w 0 1";

    pub fn empty() -> Self {
        Position {
            board: [None; SQUARE_NB],
            by_type: [0; PIECE_TYPE_NB],
            by_color: [0; COLOR_NB],
            counts: [[0; PIECE_TYPE_NB]; COLOR_NB],
            non_pawn_material: [0; COLOR_NB],
            material_key: 0,
            psq: Score::ZERO,
            side_to_move: PlayerColor::White,
        }
    }

    /// Parse a Makruk FEN. Only the placement and side-to-move fields are
    /// read; anything after them is ignored. A `~` after a piece letter
    /// (promoted marker) is accepted and dropped.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::Empty)?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut pos = Position::empty();
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in row.chars() {
                if c == '~' {
                    continue;
                }
                if let Some(d) = c.to_digit(10) {
                    file += d as usize;
                    if file > 8 {
                        return Err(FenError::RankWidth { rank: rank + 1 });
                    }
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece(c))?;
                if file >= 8 {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
                if pos.count(piece.color, piece.piece_type) >= piece.piece_type.max_count() {
                    return Err(FenError::TooManyPieces(piece));
                }
                pos.put_piece(piece, Square::new(file, rank));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }

        pos.side_to_move = match fields.next() {
            None | Some("w") => PlayerColor::White,
            Some("b") => PlayerColor::Black,
            Some(other) => return Err(FenError::SideToMove(other.to_string())),
        };

        for color in PlayerColor::ALL {
            let found = pos.count(color, PieceType::King);
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        Ok(pos)
    }

    /// Placement and side to move in FEN form.
    pub fn fen(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[Square::new(file, rank).index()] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.to_char());
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
        out.push_str(self.side_to_move.to_str());
        out
    }

    /// Place `piece` on an empty square.
    pub fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none());
        let (c, pt) = (piece.color.index(), piece.piece_type.index());

        self.board[sq.index()] = Some(piece);
        self.by_type[pt] |= sq.bb();
        self.by_color[c] |= sq.bb();
        self.material_key ^= material_key(piece, self.counts[c][pt] as usize);
        self.counts[c][pt] += 1;
        self.non_pawn_material[c] += non_pawn_value(piece.piece_type);
        self.psq += psqt::psq(piece, sq);
    }

    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take()?;
        let (c, pt) = (piece.color.index(), piece.piece_type.index());

        self.by_type[pt] &= !sq.bb();
        self.by_color[c] &= !sq.bb();
        self.counts[c][pt] -= 1;
        self.material_key ^= material_key(piece, self.counts[c][pt] as usize);
        self.non_pawn_material[c] -= non_pawn_value(piece.piece_type);
        self.psq -= psqt::psq(piece, sq);
        Some(piece)
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    #[inline]
    pub fn count(&self, color: PlayerColor, piece_type: PieceType) -> u8 {
        self.counts[color.index()][piece_type.index()]
    }

    #[inline]
    pub fn pieces(&self, color: PlayerColor, piece_type: PieceType) -> Bitboard {
        self.by_type[piece_type.index()] & self.by_color[color.index()]
    }

    #[inline]
    pub fn pieces_by_color(&self, color: PlayerColor) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// Square of a piece that is on the board. With several of the kind the
    /// lowest-indexed one is returned.
    #[inline]
    pub fn square_of(&self, color: PlayerColor, piece_type: PieceType) -> Square {
        debug_assert!(self.count(color, piece_type) >= 1);
        Square::from_index(self.pieces(color, piece_type).trailing_zeros() as usize % SQUARE_NB)
    }

    /// Like `square_of`, but `None` when no such piece exists.
    #[inline]
    pub fn find(&self, color: PlayerColor, piece_type: PieceType) -> Option<Square> {
        lsb(self.pieces(color, piece_type))
    }

    #[inline]
    pub fn king_square(&self, color: PlayerColor) -> Square {
        self.square_of(color, PieceType::King)
    }

    /// Sum of middlegame values of everything but pawns and the king.
    #[inline]
    pub fn non_pawn_material(&self, color: PlayerColor) -> Value {
        self.non_pawn_material[color.index()]
    }

    #[inline]
    pub fn material_key(&self) -> u64 {
        self.material_key
    }

    #[inline]
    pub fn side_to_move(&self) -> PlayerColor {
        self.side_to_move
    }

    pub fn with_side_to_move(&self, color: PlayerColor) -> Position {
        let mut pos = self.clone();
        pos.side_to_move = color;
        pos
    }

    /// Colors swapped and ranks mirrored: the same position seen from the
    /// other side.
    pub fn flipped(&self) -> Position {
        let mut pos = Position::empty();
        for idx in 0..SQUARE_NB {
            if let Some(piece) = self.board[idx] {
                pos.put_piece(piece.mirrored(), Square::from_index(idx).flip_rank());
            }
        }
        pos.side_to_move = !self.side_to_move;
        pos
    }

    /// Running sum of piece-square scores, positive for white.
    #[inline]
    pub fn psq_score(&self) -> Score {
        self.psq
    }

    pub fn is_in_check(&self) -> bool {
        let us = self.side_to_move;
        is_square_attacked(self, self.king_square(us), !us)
    }

    /// Play a pseudo-legal move, returning whatever was captured.
    pub fn make_move(&mut self, m: &Move) -> Option<Piece> {
        let captured = self.remove_piece(m.to);
        if let Some(moved) = self.remove_piece(m.from) {
            let placed = match m.promotion {
                Some(pt) => Piece::new(pt, moved.color),
                None => moved,
            };
            self.put_piece(placed, m.to);
        }
        self.side_to_move = !self.side_to_move;
        captured
    }

    pub fn undo_move(&mut self, m: &Move, captured: Option<Piece>) {
        self.side_to_move = !self.side_to_move;
        if let Some(placed) = self.remove_piece(m.to) {
            let moved = match m.promotion {
                Some(_) => Piece::new(PieceType::Pawn, placed.color),
                None => placed,
            };
            self.put_piece(moved, m.from);
        }
        if let Some(piece) = captured {
            self.put_piece(piece, m.to);
        }
    }

    pub fn get_legal_moves(&self) -> MoveList {
        get_legal_moves(self)
    }

    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.get_legal_moves();
        let mut nodes = 0;

        for m in &moves {
            let captured = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.undo_move(m, captured);
        }

        nodes
    }
}
