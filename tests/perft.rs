use makruk_eval::board::{SQUARE_NB, Square};
use makruk_eval::evaluation::{MaterialTable, Score};
use makruk_eval::evaluation::psqt;
use makruk_eval::game::Position;
use std::time::Instant;

#[test]
fn run_perft_suite() {
    println!("\n================================================================");
    println!("Running Perft Suite for Makruk");
    println!("================================================================");

    let mut pos = Position::from_fen(Position::START_FEN).unwrap();
    let expected: [u64; 2] = [23, 529];

    let mut total_nodes: u128 = 0;
    let mut total_micros: u128 = 0;

    for (i, &want) in expected.iter().enumerate() {
        let depth = i + 1;
        let start = Instant::now();
        let nodes = pos.perft(depth);
        let duration = start.elapsed();
        let micros = duration.as_micros().max(1);

        total_nodes += nodes as u128;
        total_micros += micros;

        println!(
            "Depth {}: perft {:10} | Time: {:?} | NPS: {:10}",
            depth,
            nodes,
            duration,
            (nodes as u128 * 1_000_000) / micros
        );
        assert_eq!(nodes, want, "perft({depth})");
    }

    println!("================================================================");
    println!("  Avg perft NPS: {}", (total_nodes * 1_000_000) / total_micros.max(1));
    println!("================================================================");
}

#[test]
fn make_undo_restores_incremental_state() {
    let mut pos = Position::from_fen("r2k4/pp6/8/2n5/3P4/2P5/8/2NK1R2 w").unwrap();
    let fen = pos.fen();
    let key = pos.material_key();
    let psq = pos.psq_score();

    let moves = pos.get_legal_moves();
    assert!(!moves.is_empty());

    for m in &moves {
        let captured = pos.make_move(m);
        let after = pos.fen();
        let rebuilt = Position::from_fen(&after).unwrap();
        assert_eq!(pos.material_key(), rebuilt.material_key(), "{m:?}");
        assert_eq!(pos.psq_score(), rebuilt.psq_score(), "{m:?}");

        pos.undo_move(m, captured);
        assert_eq!(pos.fen(), fen);
        assert_eq!(pos.material_key(), key);
        assert_eq!(pos.psq_score(), psq);
    }
}

#[test]
fn psq_sum_matches_table_lookups() {
    let pos = Position::from_fen(Position::START_FEN).unwrap();
    let table = psqt::table();
    let mut total = Score::ZERO;

    for sq in (0..SQUARE_NB).map(Square::from_index) {
        if let Some(piece) = pos.piece_on(sq) {
            total += table.get(piece, sq);
        }
    }
    assert_eq!(total, pos.psq_score());
}

#[test]
fn material_probes_along_a_game() {
    // Probe every node of a shallow tree; the cache must agree with fresh
    // classification everywhere.
    fn walk(pos: &mut Position, depth: usize, cached: &mut MaterialTable) {
        let mut fresh = MaterialTable::new(1);
        let a = *cached.probe(pos);
        let b = *fresh.probe(pos);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.imbalance(), b.imbalance());
        assert_eq!(a.game_phase(), b.game_phase());

        if depth == 0 {
            return;
        }
        for m in &pos.get_legal_moves() {
            let captured = pos.make_move(m);
            walk(pos, depth - 1, cached);
            pos.undo_move(m, captured);
        }
    }

    let mut pos = Position::from_fen("r2k4/pp6/8/2n5/3P4/2P5/8/2NK1R2 w").unwrap();
    let mut table = MaterialTable::new(16);
    walk(&mut pos, 2, &mut table);
}
