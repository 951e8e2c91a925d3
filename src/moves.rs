use crate::board::{
    Bitboard, Square, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, pop_lsb,
    queen_attacks, rook_attacks,
};
use crate::game::Position;
use crate::pieces::{PieceType, PlayerColor};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Upper bound on moves in any reachable Makruk position.
pub const MAX_MOVES: usize = 256;

pub type MoveList = ArrayVec<Move, MAX_MOVES>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }
}

/// Pawns promote on reaching their sixth rank.
const PROMOTION_RANK: usize = 5;

#[inline]
fn forward(color: PlayerColor, sq: Square) -> Option<Square> {
    match color {
        PlayerColor::White if sq.rank() < 7 => Some(Square::from_index(sq.index() + 8)),
        PlayerColor::Black if sq.rank() > 0 => Some(Square::from_index(sq.index() - 8)),
        _ => None,
    }
}

fn push_moves(list: &mut MoveList, us: PlayerColor, from: Square, mut targets: Bitboard, pawn: bool) {
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let promotion = (pawn && to.relative_rank(us) >= PROMOTION_RANK).then_some(PieceType::Queen);
        list.push(Move { from, to, promotion });
    }
}

/// Every move of `pos.side_to_move()` that obeys piece movement, ignoring
/// whether the own king is left attacked.
pub fn get_pseudo_legal_moves(pos: &Position) -> MoveList {
    let us = pos.side_to_move();
    let ours = pos.pieces_by_color(us);
    let theirs = pos.pieces_by_color(!us);
    let occupied = pos.occupied();
    let mut list = MoveList::new();

    for pt in PieceType::ALL {
        let mut from_bb = pos.pieces(us, pt);
        while from_bb != 0 {
            let from = pop_lsb(&mut from_bb);
            let targets = match pt {
                PieceType::Pawn => {
                    let push = forward(us, from)
                        .map(|sq| sq.bb() & !occupied)
                        .unwrap_or(0);
                    push | (pawn_attacks(us, from) & theirs)
                }
                PieceType::Queen => queen_attacks(from) & !ours,
                PieceType::Bishop => bishop_attacks(us, from) & !ours,
                PieceType::Knight => knight_attacks(from) & !ours,
                PieceType::Rook => rook_attacks(from, occupied) & !ours,
                PieceType::King => king_attacks(from) & !ours,
            };
            push_moves(&mut list, us, from, targets, pt == PieceType::Pawn);
        }
    }

    list
}

/// Whether any piece of `attacker` attacks `target`.
pub fn is_square_attacked(pos: &Position, target: Square, attacker: PlayerColor) -> bool {
    // Attack patterns are reversible: look from the target with the other
    // color's pattern for the asymmetric pieces.
    king_attacks(target) & pos.pieces(attacker, PieceType::King) != 0
        || knight_attacks(target) & pos.pieces(attacker, PieceType::Knight) != 0
        || queen_attacks(target) & pos.pieces(attacker, PieceType::Queen) != 0
        || bishop_attacks(!attacker, target) & pos.pieces(attacker, PieceType::Bishop) != 0
        || pawn_attacks(!attacker, target) & pos.pieces(attacker, PieceType::Pawn) != 0
        || rook_attacks(target, pos.occupied()) & pos.pieces(attacker, PieceType::Rook) != 0
}

fn leaves_king_safe(pos: &mut Position, m: &Move) -> bool {
    let us = pos.side_to_move();
    let captured = pos.make_move(m);
    let safe = !is_square_attacked(pos, pos.king_square(us), !us);
    pos.undo_move(m, captured);
    safe
}

pub fn get_legal_moves(pos: &Position) -> MoveList {
    let mut scratch = pos.clone();
    let mut list = get_pseudo_legal_moves(pos);
    list.retain(|m| leaves_king_safe(&mut scratch, m));
    list
}

/// Cheaper than `get_legal_moves(..).is_empty()`: stops at the first legal move.
pub fn has_legal_move(pos: &Position) -> bool {
    let mut scratch = pos.clone();
    get_pseudo_legal_moves(pos)
        .iter()
        .any(|m| leaves_king_safe(&mut scratch, m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_position_move_count() {
        assert_eq!(get_legal_moves(&pos(Position::START_FEN)).len(), 23);
    }

    #[test]
    fn test_pawn_promotes_on_sixth_rank() {
        let p = pos("4k3/8/8/P7/8/8/8/4K3 w");
        let promo: Vec<_> = get_legal_moves(&p)
            .into_iter()
            .filter(|m| m.from == Square::parse("a5").unwrap())
            .collect();
        assert_eq!(promo.len(), 1);
        assert_eq!(promo[0].promotion, Some(PieceType::Queen));

        let black = pos("4k3/8/8/8/p7/8/8/4K3 b");
        assert!(
            get_legal_moves(&black)
                .iter()
                .any(|m| m.to == Square::parse("a3").unwrap() && m.promotion.is_some())
        );
    }

    #[test]
    fn test_bishop_attacks_forward() {
        // White bishop on d4 covers d5, black bishop on d5 covers d4.
        let p = pos("4k3/8/8/8/3S4/8/8/4K3 w");
        assert!(is_square_attacked(&p, Square::parse("d5").unwrap(), PlayerColor::White));
        assert!(!is_square_attacked(&p, Square::parse("d3").unwrap(), PlayerColor::White));

        let p = pos("4k3/8/8/3s4/8/8/8/4K3 w");
        assert!(is_square_attacked(&p, Square::parse("d4").unwrap(), PlayerColor::Black));
        assert!(!is_square_attacked(&p, Square::parse("d6").unwrap(), PlayerColor::Black));
    }

    #[test]
    fn test_stalemate_has_no_legal_move() {
        // Black king a8 boxed in by the rook on b7 guarded by the king on c6.
        let p = pos("k7/1R6/2K5/8/8/8/8/8 b");
        assert!(!p.is_in_check());
        assert!(!has_legal_move(&p));
        assert!(has_legal_move(&p.with_side_to_move(PlayerColor::White)));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let p = pos("4r3/8/8/8/8/8/4N3/4K2k w");
        assert!(get_legal_moves(&p).iter().all(|m| m.from != Square::parse("e2").unwrap()));
    }
}
