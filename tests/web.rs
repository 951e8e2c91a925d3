#![cfg(target_arch = "wasm32")]

use makruk_eval::{Evaluator, JsMaterialProbe};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn probe_reports_specialized_endgame() {
    let mut evaluator = Evaluator::new();
    let js = evaluator.probe("8/8/4k3/8/8/2R5/8/3K1n2 w").unwrap();
    let report: JsMaterialProbe = serde_wasm_bindgen::from_value(js).unwrap();

    assert_eq!(report.strategy.as_deref(), Some("KRKN"));
    assert_eq!(report.strong_side.as_deref(), Some("w"));
    assert!(report.evaluation.unwrap() > 0);
}

#[wasm_bindgen_test]
fn start_position_evaluates_level() {
    let mut evaluator = Evaluator::new();
    assert_eq!(evaluator.evaluate("rnsmksnr/8/pppppppp/8/8/PPPPPPPP/8/RNSKMSNR w").unwrap(), 0);
    evaluator.clear();
}

#[wasm_bindgen_test]
fn bad_fen_is_an_error() {
    let mut evaluator = Evaluator::new();
    assert!(evaluator.probe("not a fen").is_err());
    assert!(evaluator.psq_score("8/8/8 w").is_err());
}
