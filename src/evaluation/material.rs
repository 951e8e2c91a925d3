//! Material classification and the per-worker material hash table.
//!
//! A material configuration is classified once and the result cached under
//! its material key: either a specialized endgame function applies, or a
//! scaling function, or the generic polynomial imbalance. The game phase is
//! stored alongside.

use super::base::{
    BISHOP_VALUE_MG, KNIGHT_VALUE_MG, MATING_MATERIAL_THRESHOLD, PHASE_MIDGAME, QUEEN_VALUE_MG,
    ROOK_VALUE_MG, SCALE_FACTOR_MAX, SCALE_FACTOR_NORMAL, ScaleFactor, Score, Value,
};
use super::endgame::{
    ENDGAMES, EVALUATE_KQSPSK, EVALUATE_KXK, EVALUATE_KXKB, EVALUATE_KXKN, EVALUATE_KXKP,
    EVALUATE_KXKQ, EVALUATE_KXKR, Endgame, ScaleEndgame,
};
use super::params;
use crate::board::more_than_one;
use crate::debug_log;
use crate::game::Position;
use crate::pieces::{COLOR_NB, PieceType, PlayerColor};

// ============================================================================
// Imbalance
// ============================================================================

/// Slots of the imbalance count vector. Slot 0 holds the bishop pair.
const IMBALANCE_NB: usize = 6;

// Second-degree polynomial material imbalance, lower triangular.
//            bishop pair, pawn, queen, bishop, knight, rook
#[rustfmt::skip]
const QUADRATIC_OURS: [[i32; IMBALANCE_NB]; IMBALANCE_NB] = [
    [1000,    0,   0,    0,   0,    0], // Bishop pair
    [  40,    0,   0,    0,   0,    0], // Pawn
    [   0,   69,  -1,    0,   0,    0], // Queen
    [   0,  104,  33, -105,   0,    0], // Bishop
    [  32,  255,   2,    4,  -3,    0], // Knight
    [ -26,   -2,  52,  110,  47, -150], // Rook
];

#[rustfmt::skip]
const QUADRATIC_THEIRS: [[i32; IMBALANCE_NB]; IMBALANCE_NB] = [
    [   0,    0,   0,    0,   0,    0], // Bishop pair
    [  36,    0,   0,    0,   0,    0], // Pawn
    [  40,   50,   0,    0,   0,    0], // Queen
    [  59,   65,  25,    0,   0,    0], // Bishop
    [   9,   63,   7,   42,   0,    0], // Knight
    [  46,   39,  -8,  -24, 240,    0], // Rook
];

const IMBALANCE_DIVISOR: i32 = 16;

type PieceCounts = [[i32; IMBALANCE_NB]; COLOR_NB];

fn piece_counts(pos: &Position) -> PieceCounts {
    PlayerColor::ALL.map(|c| {
        [
            (pos.count(c, PieceType::Bishop) > 1) as i32,
            pos.count(c, PieceType::Pawn) as i32,
            pos.count(c, PieceType::Queen) as i32,
            pos.count(c, PieceType::Bishop) as i32,
            pos.count(c, PieceType::Knight) as i32,
            pos.count(c, PieceType::Rook) as i32,
        ]
    })
}

fn imbalance(counts: &PieceCounts, us: PlayerColor) -> i32 {
    let ours = &counts[us.index()];
    let theirs = &counts[(!us).index()];
    let mut bonus = 0;

    for pt1 in 0..IMBALANCE_NB {
        if ours[pt1] == 0 {
            continue;
        }

        let v: i32 = (0..=pt1)
            .map(|pt2| QUADRATIC_OURS[pt1][pt2] * ours[pt2] + QUADRATIC_THEIRS[pt1][pt2] * theirs[pt2])
            .sum();

        bonus += ours[pt1] * v;
    }

    bonus
}

// ============================================================================
// Classification predicates
// ============================================================================

#[inline]
fn has_bare_king(pos: &Position, c: PlayerColor) -> bool {
    !more_than_one(pos.pieces_by_color(c))
}

#[inline]
fn mating_margin(pos: &Position, us: PlayerColor) -> bool {
    pos.non_pawn_material(us) - pos.non_pawn_material(!us) >= MATING_MATERIAL_THRESHOLD
}

fn is_kxk(pos: &Position, us: PlayerColor) -> bool {
    has_bare_king(pos, !us) && pos.non_pawn_material(us) >= MATING_MATERIAL_THRESHOLD
}

fn is_kqspsk(pos: &Position, us: PlayerColor) -> bool {
    has_bare_king(pos, !us)
        && (pos.count(us, PieceType::Queen) > 0 || pos.count(us, PieceType::Pawn) > 0)
        && pos.count(us, PieceType::Rook) == 0
        && pos.count(us, PieceType::Bishop) == 0
        && pos.count(us, PieceType::Knight) == 0
}

fn is_kxkp(pos: &Position, us: PlayerColor) -> bool {
    pos.count(us, PieceType::Pawn) == 0
        && pos.count(!us, PieceType::Pawn) == 1
        && mating_margin(pos, us)
}

/// We have no pawns; they have exactly one `kind` and nothing else but
/// (possibly) pawns; we are far enough ahead to mate.
fn is_kx_vs_single(pos: &Position, us: PlayerColor, kind: PieceType, value: Value) -> bool {
    pos.count(us, PieceType::Pawn) == 0
        && pos.non_pawn_material(!us) == value
        && pos.count(!us, kind) == 1
        && mating_margin(pos, us)
}

type Predicate = fn(&Position, PlayerColor) -> bool;

/// Parametric endgames in priority order. The first predicate that holds for
/// white, then for black, wins.
static PARAMETRIC: [(Predicate, &[Endgame; 2]); 7] = [
    (is_kxk, &EVALUATE_KXK),
    (is_kqspsk, &EVALUATE_KQSPSK),
    (is_kxkp, &EVALUATE_KXKP),
    (|p, us| is_kx_vs_single(p, us, PieceType::Queen, QUEEN_VALUE_MG), &EVALUATE_KXKQ),
    (|p, us| is_kx_vs_single(p, us, PieceType::Bishop, BISHOP_VALUE_MG), &EVALUATE_KXKB),
    (|p, us| is_kx_vs_single(p, us, PieceType::Knight, KNIGHT_VALUE_MG), &EVALUATE_KXKN),
    (|p, us| is_kx_vs_single(p, us, PieceType::Rook, ROOK_VALUE_MG), &EVALUATE_KXKR),
];

// ============================================================================
// Entry
// ============================================================================

/// Everything known about one material configuration.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    key: u64,
    value: i16,
    factor: [ScaleFactor; COLOR_NB],
    evaluation: Option<&'static Endgame>,
    scaling: [Option<&'static ScaleEndgame>; COLOR_NB],
    game_phase: i32,
}

impl Entry {
    const fn empty() -> Self {
        Entry {
            key: 0,
            value: 0,
            factor: [SCALE_FACTOR_NORMAL; COLOR_NB],
            evaluation: None,
            scaling: [None; COLOR_NB],
            game_phase: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Generic imbalance, applied equally to both phases.
    #[inline]
    pub fn imbalance(&self) -> Score {
        Score::new(self.value as Value, self.value as Value)
    }

    /// `PHASE_ENDGAME..=PHASE_MIDGAME`.
    #[inline]
    pub fn game_phase(&self) -> i32 {
        self.game_phase
    }

    #[inline]
    pub fn specialized_eval_exists(&self) -> bool {
        self.evaluation.is_some()
    }

    #[inline]
    pub fn evaluation(&self) -> Option<&'static Endgame> {
        self.evaluation
    }

    /// Score from the specialized function, side-to-move relative.
    #[inline]
    pub fn evaluate(&self, pos: &Position) -> Option<Value> {
        self.evaluation.map(|eg| eg.evaluate(pos))
    }

    #[inline]
    pub fn scaling_function(&self, c: PlayerColor) -> Option<&'static ScaleEndgame> {
        self.scaling[c.index()]
    }

    /// Scale factor for `c` as the stronger side. A scaling function that
    /// declines to judge (`SCALE_FACTOR_NONE`, or anything above
    /// `SCALE_FACTOR_MAX`) falls back to the stored default.
    pub fn scale_factor(&self, pos: &Position, c: PlayerColor) -> ScaleFactor {
        self.scaling[c.index()]
            .map(|sf| sf.scale(pos))
            .filter(|&sf| sf <= SCALE_FACTOR_MAX)
            .unwrap_or(self.factor[c.index()])
    }

    /// The stored default scale factor, ignoring any scaling function.
    #[inline]
    pub fn default_scale_factor(&self, c: PlayerColor) -> ScaleFactor {
        self.factor[c.index()]
    }
}

fn game_phase(pos: &Position) -> i32 {
    let midgame_limit = params::midgame_limit();
    let endgame_limit = params::endgame_limit();
    let npm = (pos.non_pawn_material(PlayerColor::White) + pos.non_pawn_material(PlayerColor::Black))
        .clamp(endgame_limit, midgame_limit);

    (npm - endgame_limit) * PHASE_MIDGAME / (midgame_limit - endgame_limit)
}

/// Fill `e` for the configuration of `pos`. First match wins: exact
/// endgame, parametric endgame, scaling function, generic imbalance.
fn classify(e: &mut Entry, pos: &Position) {
    let key = pos.material_key();

    *e = Entry::empty();
    e.key = key;
    e.game_phase = game_phase(pos);

    if let Some(eg) = ENDGAMES.probe(key) {
        e.evaluation = Some(eg);
        return;
    }

    for &(predicate, endgames) in PARAMETRIC.iter() {
        for c in PlayerColor::ALL {
            if predicate(pos, c) {
                e.evaluation = Some(&endgames[c.index()]);
                return;
            }
        }
    }

    // only the strong side gets the scaling function
    if let Some(sf) = ENDGAMES.probe_scaling(key) {
        e.scaling[sf.strong_side().index()] = Some(sf);
        return;
    }

    let counts = piece_counts(pos);
    let value = (imbalance(&counts, PlayerColor::White) - imbalance(&counts, PlayerColor::Black))
        / IMBALANCE_DIVISOR;
    e.value = value as i16;
}

// ============================================================================
// Material Table
// ============================================================================

/// Direct-mapped cache of material entries, one per search worker.
///
/// A slot is identified by the low bits of the material key and holds a
/// single entry; a different configuration landing on the same slot simply
/// replaces it. Entries are matched by their full 64-bit key, so two
/// configurations only share an entry if their keys collide outright, which
/// is accepted as negligible. Keys are never zero for a real position since
/// both kings contribute to them.
pub struct MaterialTable {
    entries: Vec<Entry>,
    /// Bitmask for indexing (capacity is always power of two)
    mask: usize,
}

impl Default for MaterialTable {
    fn default() -> Self {
        MaterialTable::new(params::material_table_entries())
    }
}

impl MaterialTable {
    /// Allocate roughly `entries` slots, rounded down to a power of two.
    pub fn new(entries: usize) -> Self {
        let mut cap_pow2 = 1usize;
        while cap_pow2 * 2 <= entries.max(1) {
            cap_pow2 *= 2;
        }

        debug_log!(
            "material table: {} entries ({} KiB)",
            cap_pow2,
            cap_pow2 * std::mem::size_of::<Entry>() / 1024
        );

        MaterialTable {
            entries: vec![Entry::empty(); cap_pow2],
            mask: cap_pow2 - 1,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Entry for the material configuration of `pos`, classifying it on a
    /// miss. Never fails.
    pub fn probe(&mut self, pos: &Position) -> &Entry {
        let key = pos.material_key();
        let idx = self.index(key);
        let e = &mut self.entries[idx];

        if e.key != key {
            classify(e, pos);
        }
        e
    }

    pub fn clear(&mut self) {
        self.entries.fill(Entry::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::base::{PHASE_ENDGAME, SCALE_FACTOR_DRAW};

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_table_size_is_power_of_two() {
        assert_eq!(MaterialTable::new(1000).capacity(), 512);
        assert_eq!(MaterialTable::new(0).capacity(), 1);
        assert_eq!(MaterialTable::default().capacity(), 8192);
    }

    #[test]
    fn test_game_phase_bounds() {
        let mut table = MaterialTable::new(64);
        let start = pos(Position::START_FEN);
        assert_eq!(table.probe(&start).game_phase(), PHASE_MIDGAME);

        // K+R+N each side: 2 * 2050 = 4100 -> (4100 - 2400) * 128 / 6600
        let rn = pos("r2kn3/8/8/8/8/8/8/R2KN3 w");
        assert_eq!(table.probe(&rn).game_phase(), 32);

        let bare = pos("4k3/8/8/8/8/8/8/4K3 w");
        assert_eq!(table.probe(&bare).game_phase(), PHASE_ENDGAME);
    }

    #[test]
    fn test_start_position_has_no_imbalance() {
        let mut table = MaterialTable::new(64);
        let e = *table.probe(&pos(Position::START_FEN));
        assert!(!e.specialized_eval_exists());
        assert_eq!(e.imbalance(), Score::ZERO);
        assert_eq!(e.scale_factor(&pos(Position::START_FEN), PlayerColor::White), SCALE_FACTOR_NORMAL);
    }

    #[test]
    fn test_imbalance_hand_computed() {
        // White: one rook. Black: one knight.
        // white: rook slot v = -150 * 1 + 240 * 1 (their knight) = 90
        // black: knight slot v = -3 * 1 = -3 (no white knights)
        // (90 - (-3)) / 16 = 5
        let p = pos("4k3/8/8/8/8/8/8/R2K1n2 w");
        let counts = piece_counts(&p);
        assert_eq!(imbalance(&counts, PlayerColor::White), 90);
        assert_eq!(imbalance(&counts, PlayerColor::Black), -3);
    }

    #[test]
    fn test_predicate_priority() {
        let mut table = MaterialTable::new(64);

        // KRR vs K: KXK before anything else.
        let e = *table.probe(&pos("4k3/8/8/8/8/8/8/R2K3R w"));
        assert_eq!(e.evaluation().map(|eg| eg.name()), Some("KXK"));

        // KMM vs K is an exact draw, ahead of KQsPsK.
        let e = *table.probe(&pos("4k3/8/8/8/8/8/8/2MKM3 w"));
        assert_eq!(e.evaluation().map(|eg| eg.name()), Some("KMMK"));

        // K+M+P vs K: KQsPsK.
        let e = *table.probe(&pos("4k3/8/8/8/P7/8/8/2MK4 w"));
        assert_eq!(e.evaluation().map(|eg| eg.name()), Some("KQsPsK"));

        // KRN vs KP (black strong side mirrored): KXKP for black.
        let e = *table.probe(&pos("3rkn2/8/8/8/8/P7/8/4K3 w"));
        let eg = e.evaluation().unwrap();
        assert_eq!(eg.name(), "KXKP");
        assert_eq!(eg.strong_side(), PlayerColor::Black);
    }

    #[test]
    fn test_scaling_only_for_strong_side() {
        let mut table = MaterialTable::new(64);
        let p = pos("8/1k6/8/P7/8/8/3N4/3K4 w");
        let e = *table.probe(&p);
        assert!(!e.specialized_eval_exists());
        assert!(e.scaling_function(PlayerColor::White).is_some());
        assert!(e.scaling_function(PlayerColor::Black).is_none());
        assert_eq!(e.scale_factor(&p, PlayerColor::White), SCALE_FACTOR_DRAW);
        assert_eq!(e.scale_factor(&p, PlayerColor::Black), SCALE_FACTOR_NORMAL);
        assert_eq!(e.imbalance(), Score::ZERO);

        // centre pawn: the function has no opinion, the default applies
        let p = pos("8/8/8/3P4/8/8/3N2k1/3K4 w");
        let e = *table.probe(&p);
        assert!(e.scaling_function(PlayerColor::White).is_some());
        assert_eq!(e.scale_factor(&p, PlayerColor::White), SCALE_FACTOR_NORMAL);
        assert!(e.scale_factor(&p, PlayerColor::White) <= SCALE_FACTOR_MAX);
    }

    #[test]
    fn test_slot_is_overwritten() {
        let mut table = MaterialTable::new(1);
        let a = pos("4k3/8/8/8/8/8/8/R2K4 w");
        let b = pos("4k3/8/8/8/8/8/8/N2K4 w");
        assert_eq!(table.probe(&a).key(), a.material_key());
        assert_eq!(table.probe(&b).key(), b.material_key());
        assert_eq!(table.probe(&a).key(), a.material_key());
        table.clear();
        assert_eq!(table.entries[0].key(), 0);
    }
}
