// Static Evaluation
//
// Layout:
// 1. `base` holds the value types, piece values and score constants
// 2. `psqt` folds piece values into the piece-square tables
// 3. `tables`/`endgame` hold the distance heuristics and endgame knowledge
// 4. `material` classifies material configurations and caches the result
//
// Process-wide tables are built once and shared read-only; the material
// table is owned by whoever evaluates (one per worker).

pub mod base;
pub mod endgame;
pub mod material;
pub mod params;
pub mod psqt;
pub mod tables;

use crate::game::Position;
use crate::pieces::PlayerColor;

// Re-export commonly used items
pub use base::{Score, Value, get_piece_value};
pub use material::{Entry, MaterialTable};

use base::{PHASE_MIDGAME, SCALE_FACTOR_NORMAL};

/// Material-and-placement evaluation, relative to the side to move.
///
/// A specialized endgame function short-circuits everything else. Otherwise
/// the PSQT sum plus the imbalance is tapered by game phase, with the
/// endgame half scaled by the stronger side's scale factor.
pub fn evaluate(pos: &Position, table: &mut MaterialTable) -> Value {
    let entry = table.probe(pos);

    if let Some(v) = entry.evaluate(pos) {
        return v;
    }

    let score = pos.psq_score() + entry.imbalance();
    let strong_side = if score.eg_value() > 0 {
        PlayerColor::White
    } else {
        PlayerColor::Black
    };
    let sf = entry.scale_factor(pos, strong_side) as Value;
    let phase = entry.game_phase();

    let v = (score.mg_value() * phase
        + score.eg_value() * (PHASE_MIDGAME - phase) * sf / SCALE_FACTOR_NORMAL as Value)
        / PHASE_MIDGAME;

    if pos.side_to_move() == PlayerColor::White {
        v
    } else {
        -v
    }
}
