use makruk_eval::evaluation::base::{
    SCALE_FACTOR_NORMAL, VALUE_DRAW, VALUE_KNOWN_WIN, VALUE_MATE_IN_MAX_PLY,
};
use makruk_eval::evaluation::MaterialTable;
use makruk_eval::game::Position;
use makruk_eval::material_probe_report;
use makruk_eval::pieces::PlayerColor;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid test FEN")
}

/// Positions covering every classification path.
const SAMPLE_FENS: [&str; 12] = [
    Position::START_FEN,
    "8/8/4k3/8/8/2R5/8/3K1n2 w",         // KRKN
    "4k3/8/8/8/8/8/8/1N1K2N1 b",         // KNNK
    "8/8/8/8/3M4/2K5/4S3/k7 w",          // KBQK
    "8/8/8/3k4/8/8/2N5/2MK4 w",          // KNQK
    "4k3/8/8/8/8/P7/8/MMM1K3 w",         // KXK
    "4k3/8/8/8/P7/8/8/2MK4 w",           // KQsPsK
    "3rkn2/8/8/8/8/P7/8/4K3 w",          // KXKP
    "4k3/4m3/8/8/8/8/8/R2K1R2 w",        // KXKQ
    "8/1k6/8/P7/8/8/3N4/3K4 w",          // KNPK scaling
    "r2k4/pp6/8/8/8/2PP4/8/2NK1R2 w",    // imbalance
    "rn1k4/8/8/8/8/8/8/3K1S1S b",        // imbalance, bishop pair
];

#[test]
fn rook_vs_knight_favours_the_rook() {
    let mut table = MaterialTable::new(256);
    let p = pos("8/8/4k3/8/8/2R5/8/3K1n2 w");

    let report = material_probe_report(&mut table, &p);
    assert_eq!(report.strategy.as_deref(), Some("KRKN"));
    assert_eq!(report.strong_side.as_deref(), Some("w"));
    let v = report.evaluation.unwrap();
    assert!(v > 0);

    let black_to_move = p.with_side_to_move(PlayerColor::Black);
    assert_eq!(table.probe(&black_to_move).evaluate(&black_to_move), Some(-v));
}

#[test]
fn two_knights_never_win() {
    let mut table = MaterialTable::new(256);
    for fen in [
        "4k3/8/8/8/8/8/8/1N1K2N1 w",
        "4k3/8/8/8/8/8/8/1N1K2N1 b",
        "N7/8/8/3k4/8/8/8/K6N w",
        "1n4n1/3k4/8/8/8/8/8/7K w",
    ] {
        let p = pos(fen);
        let entry = *table.probe(&p);
        assert_eq!(entry.evaluation().map(|eg| eg.name()), Some("KNNK"), "{fen}");
        assert_eq!(entry.evaluate(&p), Some(VALUE_DRAW), "{fen}");
    }
}

#[test]
fn queens_on_both_colors_with_pawn_are_winning() {
    let mut table = MaterialTable::new(256);
    let p = pos("4k3/8/8/8/8/P7/8/MMM1K3 w");

    let report = material_probe_report(&mut table, &p);
    assert_eq!(report.strategy.as_deref(), Some("KXK"));
    let v = report.evaluation.unwrap();
    assert!(v >= VALUE_KNOWN_WIN);
    assert!(v < VALUE_MATE_IN_MAX_PLY);
}

#[test]
fn three_same_colored_queens_draw() {
    let mut table = MaterialTable::new(256);
    // a1, c1 and b2 are all dark
    for fen in ["4k3/8/8/8/8/8/1M6/M1M1K3 w", "4k3/8/8/8/8/8/1M6/M1M1K3 b"] {
        let p = pos(fen);
        let entry = *table.probe(&p);
        assert_eq!(entry.evaluation().map(|eg| eg.name()), Some("KXK"));
        assert_eq!(entry.evaluate(&p), Some(VALUE_DRAW), "{fen}");
    }
}

#[test]
fn bishop_queen_prefers_the_queen_colored_corner() {
    let mut table = MaterialTable::new(256);
    // dark queen on d4: a1 is its corner, a8 is not
    let right = pos("8/8/8/8/3M4/2K5/4S3/k7 w");
    let wrong = pos("k7/8/8/8/3M4/2K5/4S3/8 w");

    let right_v = table.probe(&right).evaluate(&right).unwrap();
    let wrong_v = table.probe(&wrong).evaluate(&wrong).unwrap();

    assert_eq!(right_v, 10_380);
    assert_eq!(wrong_v, 10_290);
    assert!(right_v > wrong_v);
}

#[test]
fn repeated_probes_are_deterministic() {
    let mut a = MaterialTable::new(256);
    let mut b = MaterialTable::new(256);
    for fen in SAMPLE_FENS {
        let p = pos(fen);
        let first = material_probe_report(&mut a, &p);
        let again = material_probe_report(&mut a, &p);
        let fresh = material_probe_report(&mut b, &p);
        assert_eq!(first, again, "{fen}");
        assert_eq!(first, fresh, "{fen}");
    }
}

#[test]
fn each_configuration_gets_one_classification() {
    let mut table = MaterialTable::new(256);
    for fen in SAMPLE_FENS {
        let p = pos(fen);
        let entry = *table.probe(&p);
        let scaled = entry.scaling_function(PlayerColor::White).is_some()
            || entry.scaling_function(PlayerColor::Black).is_some();

        if entry.specialized_eval_exists() {
            assert!(!scaled, "{fen}");
        }
        if entry.specialized_eval_exists() || scaled {
            assert_eq!(entry.imbalance().mg_value(), 0, "{fen}");
        }
        for c in PlayerColor::ALL {
            assert_eq!(entry.default_scale_factor(c), SCALE_FACTOR_NORMAL, "{fen}");
        }
    }
}

#[test]
fn imbalance_is_color_symmetric() {
    let mut table = MaterialTable::new(256);
    for fen in SAMPLE_FENS {
        let p = pos(fen);
        let flipped = p.flipped();
        let here = *table.probe(&p);
        let there = *table.probe(&flipped);

        assert_eq!(here.imbalance(), -there.imbalance(), "{fen}");
        assert_eq!(here.game_phase(), there.game_phase(), "{fen}");
        assert_eq!(
            here.evaluation().map(|eg| (eg.name(), eg.strong_side())),
            there.evaluation().map(|eg| (eg.name(), !eg.strong_side())),
            "{fen}"
        );
    }
}

#[test]
fn probe_selects_each_single_piece_defence() {
    let mut table = MaterialTable::new(256);
    for (fen, name, strong) in [
        ("3rkn2/8/8/8/8/P7/8/4K3 w", "KXKP", PlayerColor::Black),
        ("4k3/4m3/8/8/8/8/8/R2K1R2 w", "KXKQ", PlayerColor::White),
        ("4k3/4s3/8/8/8/8/8/R2K1R2 w", "KXKB", PlayerColor::White),
        ("4k3/4n3/8/8/8/8/8/R2K1R2 w", "KXKN", PlayerColor::White),
        ("4k3/4r3/8/8/8/8/8/R2K1R2 w", "KXKR", PlayerColor::White),
        ("r2k1r2/8/8/8/8/8/4N3/4K3 b", "KXKN", PlayerColor::Black),
    ] {
        let report = material_probe_report(&mut table, &pos(fen));
        assert_eq!(report.strategy.as_deref(), Some(name), "{fen}");
        assert_eq!(report.strong_side.as_deref(), Some(strong.to_str()), "{fen}");
        assert!(report.evaluation.unwrap() > 0, "{fen}");
    }
}

#[test]
fn margin_below_mating_threshold_uses_imbalance() {
    // R + M vs N: 1600 - 780 = 820, short of the 870 needed.
    let mut table = MaterialTable::new(256);
    let p = pos("4k3/4n3/8/8/8/8/8/R2KM3 w");
    let entry = *table.probe(&p);
    assert!(!entry.specialized_eval_exists());
    assert!(entry.scaling_function(PlayerColor::White).is_none());
    assert!(entry.scaling_function(PlayerColor::Black).is_none());
    assert_eq!(entry.evaluate(&p), None);

    // One more Met crosses it.
    let p = pos("4k3/4n3/8/8/8/8/8/R2KMM2 w");
    let entry = *table.probe(&p);
    assert_eq!(entry.evaluation().map(|eg| eg.name()), Some("KXKN"));
}

#[test]
fn rook_against_minor_values() {
    let mut table = MaterialTable::new(256);

    // defending king on e6: edge 30, knight on f1 five away: 80
    let krkn = pos("8/8/4k3/8/8/2R5/8/3K1n2 w");
    assert_eq!(table.probe(&krkn).evaluate(&krkn), Some(110));

    let krkb = pos("8/8/4k3/8/8/2R5/8/3K1s2 w");
    let entry = *table.probe(&krkb);
    assert_eq!(entry.evaluation().map(|eg| eg.name()), Some("KRKS"));
    assert_eq!(entry.evaluate(&krkb), Some(30));

    let black_to_move = krkb.with_side_to_move(PlayerColor::Black);
    assert_eq!(table.probe(&black_to_move).evaluate(&black_to_move), Some(-30));
}

#[test]
fn bishop_pair_counts_in_imbalance() {
    let mut table = MaterialTable::new(256);
    let p = pos("rn1k4/8/8/8/8/8/8/3K1S1S b");
    assert!(table.probe(&p).imbalance().mg_value() != 0);
}

#[test]
fn workers_own_their_tables() {
    let positions: Vec<Position> = SAMPLE_FENS.iter().map(|f| pos(f)).collect();

    let mut reference = MaterialTable::new(256);
    let expected: Vec<_> = positions
        .iter()
        .map(|p| material_probe_report(&mut reference, p))
        .collect();

    let positions = &positions;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    let mut table = MaterialTable::new(64);
                    positions
                        .iter()
                        .map(|p| material_probe_report(&mut table, p))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
