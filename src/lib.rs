use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub mod board;
pub mod evaluation;
pub mod game;
pub mod moves;
pub mod pieces;
pub mod utils;
pub mod zobrist;

use evaluation::base::Score;
use evaluation::{MaterialTable, psqt};
use game::{FenError, Position};
use pieces::PlayerColor;

#[cfg(feature = "debug")]
#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

impl From<FenError> for JsValue {
    fn from(e: FenError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// What the material classifier decided for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsMaterialProbe {
    pub phase: i32,
    /// Endgame function name (e.g. `"KXK"`), if one applies.
    pub strategy: Option<String>,
    pub strong_side: Option<String>, // "w" / "b"
    /// Specialized score, side-to-move relative.
    pub evaluation: Option<i32>,
    pub imbalance: i32,
    pub scale_white: u8,
    pub scale_black: u8,
}

/// Probe `table` for `pos` and describe the resulting entry.
pub fn material_probe_report(table: &mut MaterialTable, pos: &Position) -> JsMaterialProbe {
    let entry = table.probe(pos);
    let endgame = entry.evaluation();

    JsMaterialProbe {
        phase: entry.game_phase(),
        strategy: endgame.map(|eg| eg.name().to_string()),
        strong_side: endgame.map(|eg| eg.strong_side().to_str().to_string()),
        evaluation: entry.evaluate(pos),
        imbalance: entry.imbalance().mg_value(),
        scale_white: entry.scale_factor(pos, PlayerColor::White),
        scale_black: entry.scale_factor(pos, PlayerColor::Black),
    }
}

#[wasm_bindgen]
pub struct Evaluator {
    table: MaterialTable,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[wasm_bindgen]
impl Evaluator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Evaluator {
        // touch the shared tables so the first probe doesn't pay for them
        let _ = psqt::table();
        let _ = evaluation::endgame::ENDGAMES.len();

        Evaluator {
            table: MaterialTable::default(),
        }
    }

    /// Classify the material of a FEN position.
    pub fn probe(&mut self, fen: &str) -> Result<JsValue, JsValue> {
        let pos = Position::from_fen(fen)?;
        let report = material_probe_report(&mut self.table, &pos);
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Sum of piece-square scores as `{ mg, eg }`, positive for white.
    pub fn psq_score(&self, fen: &str) -> Result<JsValue, JsValue> {
        let pos = Position::from_fen(fen)?;
        let score: Score = pos.psq_score();
        Ok(serde_wasm_bindgen::to_value(&score)?)
    }

    /// Material and placement evaluation, side-to-move relative.
    pub fn evaluate(&mut self, fen: &str) -> Result<i32, JsValue> {
        let pos = Position::from_fen(fen)?;
        Ok(evaluation::evaluate(&pos, &mut self.table))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

#[cfg(feature = "eval_tuning")]
#[wasm_bindgen]
pub fn set_eval_params(json: &str) -> bool {
    evaluation::params::set_eval_params_from_json(json)
}

#[cfg(feature = "eval_tuning")]
#[wasm_bindgen]
pub fn get_eval_params() -> String {
    evaluation::params::get_eval_params_as_json()
}
