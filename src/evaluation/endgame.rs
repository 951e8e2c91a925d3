//! Specialized evaluation and scaling functions for known material
//! configurations.
//!
//! Every strategy is bound to a strong side and scores from that side's
//! point of view, then negates the result when the weak side is to move.
//! Exact configurations are looked up by material key in [`ENDGAMES`];
//! the parametric families (`KXK`, `KQsPsK`, `KXKP`...) are selected by
//! predicates in the material classifier and live in the `EVALUATE_*`
//! arrays below.

use super::base::{
    BISHOP_VALUE_MG, KNIGHT_VALUE_MG, PAWN_VALUE_EG, ROOK_VALUE_MG, SCALE_FACTOR_DRAW, SCALE_FACTOR_NONE, SCALE_FACTOR_NORMAL, ScaleFactor,
    VALUE_DRAW, VALUE_KNOWN_WIN, VALUE_MATE_IN_MAX_PLY, VALUE_ZERO, Value,
};
use super::tables::{
    KING_CORNERS, push_away, push_close, push_to_corners, push_to_edges,
    push_to_opposing_side_edges, push_to_queen_corners, push_win,
};
use crate::board::{DARK_SQUARES, Square, king_attacks, knight_attacks, pop_lsb};
use crate::debug_log;
use crate::game::Position;
use crate::moves::has_legal_move;
use crate::pieces::{PIECE_NB, Piece, PieceType, PlayerColor};
use crate::zobrist::material_key;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

pub type EvalFn = fn(&Position, PlayerColor) -> Value;
pub type ScaleFn = fn(&Position, PlayerColor) -> ScaleFactor;

/// An evaluation function bound to the side it plays for.
#[derive(Clone, Copy)]
pub struct Endgame {
    name: &'static str,
    strong_side: PlayerColor,
    func: EvalFn,
}

impl Endgame {
    pub const fn new(name: &'static str, strong_side: PlayerColor, func: EvalFn) -> Self {
        Endgame {
            name,
            strong_side,
            func,
        }
    }

    #[inline]
    pub fn evaluate(&self, pos: &Position) -> Value {
        (self.func)(pos, self.strong_side)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn strong_side(&self) -> PlayerColor {
        self.strong_side
    }
}

impl fmt::Debug for Endgame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endgame({}, {:?})", self.name, self.strong_side)
    }
}

/// A scaling function bound to the side it plays for. Returns
/// `SCALE_FACTOR_NONE` when it has nothing to say about the position.
#[derive(Clone, Copy)]
pub struct ScaleEndgame {
    name: &'static str,
    strong_side: PlayerColor,
    func: ScaleFn,
}

impl ScaleEndgame {
    pub const fn new(name: &'static str, strong_side: PlayerColor, func: ScaleFn) -> Self {
        ScaleEndgame {
            name,
            strong_side,
            func,
        }
    }

    #[inline]
    pub fn scale(&self, pos: &Position) -> ScaleFactor {
        (self.func)(pos, self.strong_side)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn strong_side(&self) -> PlayerColor {
        self.strong_side
    }
}

impl fmt::Debug for ScaleEndgame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScaleEndgame({}, {:?})", self.name, self.strong_side)
    }
}

// ==================== Registry ====================

const EVAL_INITS: [(&str, EvalFn); 8] = [
    ("KNNK", evaluate_draw),
    ("KNK", evaluate_draw),
    ("KSK", evaluate_draw),
    ("KMMK", evaluate_draw),
    ("KSMK", evaluate_kbqk),
    ("KNMK", evaluate_knqk),
    ("KRKN", evaluate_krkn),
    ("KRKS", evaluate_krkb),
];

const SCALE_INITS: [(&str, ScaleFn); 2] = [("KNPK", scale_knpk), ("KRPKR", scale_krpkr)];

/// Material key of a configuration code such as `"KRKN"`: the pieces up to
/// the second `K` belong to `strong`, the rest to the other side.
pub fn material_key_for(code: &str, strong: PlayerColor) -> u64 {
    let weak_start = code.rfind('K').unwrap_or(code.len());
    debug_assert!(code.starts_with('K') && weak_start > 0);

    let mut counts = [0usize; PIECE_NB];
    let mut key = 0u64;
    for (i, ch) in code.char_indices() {
        let Some(pt) = PieceType::from_char(ch) else {
            debug_assert!(false, "bad endgame code {code}");
            continue;
        };
        let color = if i < weak_start { strong } else { !strong };
        let piece = Piece::new(pt, color);
        key ^= material_key(piece, counts[piece.index()]);
        counts[piece.index()] += 1;
    }
    key
}

/// Exact-configuration catalog, keyed by material signature. Each code is
/// registered once per strong side.
pub struct Endgames {
    evaluations: FxHashMap<u64, Endgame>,
    scalings: FxHashMap<u64, ScaleEndgame>,
}

impl Endgames {
    fn new() -> Self {
        let mut endgames = Endgames {
            evaluations: FxHashMap::default(),
            scalings: FxHashMap::default(),
        };

        for (code, func) in EVAL_INITS {
            for color in PlayerColor::ALL {
                endgames
                    .evaluations
                    .insert(material_key_for(code, color), Endgame::new(code, color, func));
            }
        }
        for (code, func) in SCALE_INITS {
            for color in PlayerColor::ALL {
                endgames
                    .scalings
                    .insert(material_key_for(code, color), ScaleEndgame::new(code, color, func));
            }
        }

        debug_log!(
            "endgame registry: {} evaluation and {} scaling entries",
            endgames.evaluations.len(),
            endgames.scalings.len()
        );
        endgames
    }

    #[inline]
    pub fn probe(&self, key: u64) -> Option<&Endgame> {
        self.evaluations.get(&key)
    }

    #[inline]
    pub fn probe_scaling(&self, key: u64) -> Option<&ScaleEndgame> {
        self.scalings.get(&key)
    }

    pub fn len(&self) -> usize {
        self.evaluations.len() + self.scalings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub static ENDGAMES: Lazy<Endgames> = Lazy::new(Endgames::new);

// Parametric families, one instance per strong side.

pub static EVALUATE_KXK: [Endgame; 2] = [
    Endgame::new("KXK", PlayerColor::White, evaluate_kxk),
    Endgame::new("KXK", PlayerColor::Black, evaluate_kxk),
];
pub static EVALUATE_KQSPSK: [Endgame; 2] = [
    Endgame::new("KQsPsK", PlayerColor::White, evaluate_kqspsk),
    Endgame::new("KQsPsK", PlayerColor::Black, evaluate_kqspsk),
];
pub static EVALUATE_KXKP: [Endgame; 2] = [
    Endgame::new("KXKP", PlayerColor::White, evaluate_kx_vs_single),
    Endgame::new("KXKP", PlayerColor::Black, evaluate_kx_vs_single),
];
pub static EVALUATE_KXKQ: [Endgame; 2] = [
    Endgame::new("KXKQ", PlayerColor::White, evaluate_kx_vs_single),
    Endgame::new("KXKQ", PlayerColor::Black, evaluate_kx_vs_single),
];
pub static EVALUATE_KXKB: [Endgame; 2] = [
    Endgame::new("KXKB", PlayerColor::White, evaluate_kx_vs_single),
    Endgame::new("KXKB", PlayerColor::Black, evaluate_kx_vs_single),
];
pub static EVALUATE_KXKN: [Endgame; 2] = [
    Endgame::new("KXKN", PlayerColor::White, evaluate_kx_vs_single),
    Endgame::new("KXKN", PlayerColor::Black, evaluate_kx_vs_single),
];
pub static EVALUATE_KXKR: [Endgame; 2] = [
    Endgame::new("KXKR", PlayerColor::White, evaluate_kx_vs_single),
    Endgame::new("KXKR", PlayerColor::Black, evaluate_kx_vs_single),
];

// ==================== Helpers ====================

#[inline]
fn from_strong_side(pos: &Position, strong_side: PlayerColor, result: Value) -> Value {
    if pos.side_to_move() == strong_side {
        result
    } else {
        -result
    }
}

fn verify_material(pos: &Position, c: PlayerColor, npm: Value, pawns: u8) -> bool {
    pos.non_pawn_material(c) == npm && pos.count(c, PieceType::Pawn) == pawns
}

/// `sq` as seen by `color`: unchanged for white, rank-mirrored for black.
#[inline]
fn relative_square(color: PlayerColor, sq: Square) -> Square {
    match color {
        PlayerColor::White => sq,
        PlayerColor::Black => sq.flip_rank(),
    }
}

#[inline]
fn pawn_material(pos: &Position, c: PlayerColor) -> Value {
    pos.count(c, PieceType::Pawn) as Value * PAWN_VALUE_EG
}

/// Where a pawn of `color` on `file` promotes.
#[inline]
fn promotion_square(color: PlayerColor, file: usize) -> Square {
    relative_square(color, Square::new(file, 5))
}

/// What the strong side brings to the attack, one representative square per
/// piece kind.
struct Attackers {
    strong_side: PlayerColor,
    king: Square,
    rook: bool,
    knight: Option<Square>,
    bishop: Option<Square>,
    queen: Option<Square>,
}

impl Attackers {
    fn of(pos: &Position, strong_side: PlayerColor) -> Self {
        Attackers {
            strong_side,
            king: pos.king_square(strong_side),
            rook: pos.count(strong_side, PieceType::Rook) > 0,
            knight: pos.find(strong_side, PieceType::Knight),
            bishop: pos.find(strong_side, PieceType::Bishop),
            queen: pos.find(strong_side, PieceType::Queen),
        }
    }

    /// The target square for `PUSH_TO_QUEEN_CORNERS`: mirrored when our
    /// queen lives on light squares, unchanged otherwise (no queen included).
    #[inline]
    fn queen_corner(&self, sq: Square) -> Square {
        match self.queen {
            Some(q) if q.opposite_colors(Square::A1) => sq.flip_rank(),
            _ => sq,
        }
    }

    /// Pull the minor pieces towards our king and reward the corner each of
    /// them mates in.
    fn piece_terms(&self, loser_k: Square) -> Value {
        let mut result = VALUE_ZERO;
        if let Some(n) = self.knight {
            result += (push_close(n, self.king) >> 1) + push_to_corners(loser_k);
        }
        if let Some(b) = self.bishop {
            result += (push_close(b, self.king) >> 1)
                + push_to_opposing_side_edges(relative_square(self.strong_side, loser_k));
        }
        if let Some(q) = self.queen {
            result += (push_close(q, self.king) >> 1)
                + push_to_queen_corners(self.queen_corner(loser_k));
        }
        result
    }
}

// ==================== Evaluation Functions ====================

/// Insufficient material: KNNK, KNK, KBK, KQQK.
fn evaluate_draw(_pos: &Position, _strong_side: PlayerColor) -> Value {
    VALUE_DRAW
}

/// Mate with KX vs K. Drives the defending king to the edge and keeps the
/// kings close. Material that is known to force mate gets a known-win bonus.
pub fn evaluate_kxk(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    debug_assert!(verify_material(pos, weak_side, VALUE_ZERO, 0));

    // stalemate with a lone king
    if pos.side_to_move() == weak_side && !has_legal_move(pos) {
        return VALUE_DRAW;
    }

    let queens = pos.count(strong_side, PieceType::Queen);
    let bishops = pos.count(strong_side, PieceType::Bishop);
    let knights = pos.count(strong_side, PieceType::Knight);
    let rooks = pos.count(strong_side, PieceType::Rook);
    let queen_bb = pos.pieces(strong_side, PieceType::Queen);
    let queens_on_both_colors = queen_bb & DARK_SQUARES != 0 && queen_bb & !DARK_SQUARES != 0;

    // Mets can never cover the other square color, so bare queens on one
    // color cannot mate.
    if queens >= 3 && rooks == 0 && knights == 0 && bishops == 0 && !queens_on_both_colors {
        return VALUE_DRAW;
    }

    let winner_k = pos.king_square(strong_side);
    let loser_k = pos.king_square(weak_side);

    let mut result = pos.non_pawn_material(strong_side)
        + pawn_material(pos, strong_side)
        + push_to_edges(loser_k)
        + push_close(winner_k, loser_k);

    if let Some(b) = pos.find(strong_side, PieceType::Bishop) {
        result += push_to_edges(loser_k) + push_win(b, loser_k);
    }
    if let Some(q) = pos.find(strong_side, PieceType::Queen) {
        result += push_to_edges(loser_k) + push_win(q, loser_k);
    }

    let forced_mate = rooks >= 1
        || (bishops >= 1 && knights >= 1)
        || bishops == 2
        || (bishops >= 1 && queens >= 1)
        || (knights == 1 && queens >= 2)
        || (knights == 2 && queens >= 1)
        || (queens >= 3 && queens_on_both_colors);

    if forced_mate {
        result = (result + VALUE_KNOWN_WIN).min(VALUE_MATE_IN_MAX_PLY - 1);
    }

    from_strong_side(pos, strong_side, result)
}

/// Queens and pawns vs a lone king. Winning needs queens, present or to be
/// promoted, on both square colors.
pub fn evaluate_kqspsk(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    let loser_k = pos.king_square(weak_side);

    let mut result = pos.non_pawn_material(strong_side) + pawn_material(pos, strong_side)
        - pawn_material(pos, weak_side);

    let queen_bb = pos.pieces(strong_side, PieceType::Queen);
    let mut dark = queen_bb & DARK_SQUARES != 0;
    let mut light = queen_bb & !DARK_SQUARES != 0;
    let queens = pos.count(strong_side, PieceType::Queen);

    if queens >= 3 && dark && light {
        result += push_to_edges(loser_k);
    } else if queens + pos.count(strong_side, PieceType::Pawn) < 3 {
        return VALUE_DRAW;
    } else {
        let mut pawns = pos.pieces(strong_side, PieceType::Pawn);
        while pawns != 0 && !(dark && light) {
            let file = pop_lsb(&mut pawns).file();
            if promotion_square(strong_side, file).is_dark() {
                dark = true;
            } else {
                light = true;
            }
        }
        if !(dark && light) {
            return VALUE_DRAW;
        }
    }

    from_strong_side(pos, strong_side, result)
}

/// Extra material against a king with a single pawn, queen, bishop, knight
/// or rook. Shared by the whole `KXK?` family: the differences between them
/// are captured by what the strong side has on the board.
pub fn evaluate_kx_vs_single(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    debug_assert_eq!(pos.count(strong_side, PieceType::Pawn), 0);

    let attackers = Attackers::of(pos, strong_side);
    let winner_k = attackers.king;
    let loser_k = pos.king_square(weak_side);

    let mut result = pos.non_pawn_material(strong_side) - pos.non_pawn_material(weak_side)
        + pawn_material(pos, strong_side)
        - pawn_material(pos, weak_side)
        + push_to_edges(loser_k)
        + push_to_corners(loser_k)
        + push_to_opposing_side_edges(relative_square(strong_side, loser_k))
        + push_to_queen_corners(attackers.queen_corner(loser_k))
        + push_close(winner_k, loser_k);

    // keep our king away from their queen's reach
    if let (Some(_), Some(weak_queen)) = (attackers.queen, pos.find(weak_side, PieceType::Queen)) {
        result += push_away(loser_k, weak_queen);
    }
    if attackers.rook {
        result += push_to_edges(loser_k);
    }
    result += attackers.piece_terms(loser_k);

    from_strong_side(pos, strong_side, result)
}

/// Mate with KBQ vs K: aim for a corner the queen's color controls.
pub fn evaluate_kbqk(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    debug_assert!(verify_material(pos, weak_side, VALUE_ZERO, 0));

    let attackers = Attackers::of(pos, strong_side);
    let winner_k = attackers.king;
    let loser_k = pos.king_square(weak_side);
    let queen = pos.square_of(strong_side, PieceType::Queen);

    let corner = match KING_CORNERS[loser_k.index()] {
        1 => Some(Square::A1),
        2 => Some(Square::H1),
        3 => Some(Square::A8),
        4 => Some(Square::H8),
        _ => None,
    };

    let mut result = match corner {
        Some(c) if !queen.opposite_colors(c) => {
            // the corner tables target A1/H8; mirror for a light queen
            let (k, l) = if queen.opposite_colors(Square::A1) {
                (winner_k.flip_rank(), loser_k.flip_rank())
            } else {
                (winner_k, loser_k)
            };
            VALUE_KNOWN_WIN + push_close(k, l) + push_to_queen_corners(l)
        }
        _ => {
            VALUE_KNOWN_WIN
                + push_close(winner_k, loser_k)
                + push_to_opposing_side_edges(relative_square(strong_side, loser_k))
        }
    };
    result += attackers.piece_terms(loser_k);

    from_strong_side(pos, strong_side, result)
}

/// Mate with KNQ vs K. Only the corner the queen can cover is a mating
/// corner; kings and knight are mirrored so that corner is always A1 or H8.
/// The queen itself stays where it stands.
pub fn evaluate_knqk(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    debug_assert!(verify_material(pos, weak_side, VALUE_ZERO, 0));

    let queen = pos.square_of(strong_side, PieceType::Queen);
    let flip = queen.opposite_colors(Square::A1);
    let relative = |sq: Square| if flip { sq.flip_rank() } else { sq };

    let winner_k = relative(pos.king_square(strong_side));
    let loser_k = relative(pos.king_square(weak_side));
    let knight = relative(pos.square_of(strong_side, PieceType::Knight));

    // far from both mating corners: probably a draw
    if loser_k.distance(Square::A1) >= 4 && loser_k.distance(Square::H8) >= 4 {
        return from_strong_side(pos, strong_side, push_close(winner_k, loser_k));
    }

    let corner = if loser_k.distance(Square::A1) < 4 {
        Square::A1
    } else {
        Square::H8
    };
    let mating_net = winner_k.distance(corner) <= 4
        && king_attacks(loser_k) & knight_attacks(knight) != 0;
    let win_value = if mating_net { VALUE_KNOWN_WIN } else { VALUE_ZERO };

    let result = win_value
        + push_close(winner_k, loser_k)
        + push_to_queen_corners(loser_k)
        + (push_close(knight, winner_k) >> 1)
        + push_to_corners(loser_k)
        + (push_close(queen, winner_k) >> 1)
        // mirroring the already mirrored king reads the board as it stands
        + push_to_queen_corners(relative(loser_k));

    from_strong_side(pos, strong_side, result)
}

/// KR vs KN. Drawish, a little better for the rook when the defending king
/// is near the edge and far from its knight.
pub fn evaluate_krkn(pos: &Position, strong_side: PlayerColor) -> Value {
    let weak_side = !strong_side;
    debug_assert!(verify_material(pos, strong_side, ROOK_VALUE_MG, 0));
    debug_assert!(verify_material(pos, weak_side, KNIGHT_VALUE_MG, 0));

    let loser_k = pos.king_square(weak_side);
    let knight = pos.square_of(weak_side, PieceType::Knight);
    let result = push_to_edges(loser_k) + push_away(loser_k, knight);

    from_strong_side(pos, strong_side, result)
}

/// KR vs KB. Drawish, slightly better when the defending king is near the
/// edge.
pub fn evaluate_krkb(pos: &Position, strong_side: PlayerColor) -> Value {
    debug_assert!(verify_material(pos, !strong_side, BISHOP_VALUE_MG, 0));

    let result = push_to_edges(pos.king_square(!strong_side));
    from_strong_side(pos, strong_side, result)
}

// ==================== Scaling Functions ====================

/// KNP vs K: a rook pawn whose promotion square the defending king reaches
/// cannot be forced through.
pub fn scale_knpk(pos: &Position, strong_side: PlayerColor) -> ScaleFactor {
    let pawn = pos.square_of(strong_side, PieceType::Pawn);
    let file = pawn.file();
    let promotion = promotion_square(strong_side, file);

    if (file == 0 || file == 7) && pos.king_square(!strong_side).distance(promotion) <= 1 {
        SCALE_FACTOR_DRAW
    } else {
        SCALE_FACTOR_NONE
    }
}

/// KRP vs KR: the defending king standing in front of the pawn holds easily.
pub fn scale_krpkr(pos: &Position, strong_side: PlayerColor) -> ScaleFactor {
    let pawn = pos.square_of(strong_side, PieceType::Pawn);
    let weak_k = pos.king_square(!strong_side);

    if weak_k.file() == pawn.file()
        && weak_k.relative_rank(strong_side) > pawn.relative_rank(strong_side)
    {
        SCALE_FACTOR_NORMAL / 4
    } else {
        SCALE_FACTOR_NONE
    }
}
