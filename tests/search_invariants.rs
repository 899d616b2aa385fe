use raywalk::board::Position;
use raywalk::movegen::gen_legal_moves;
use raywalk::search::{find_best_move, mate_distance, Search, SearchParams, MATE_SCORE};

fn search_for(fen: &str, params: SearchParams) -> Search {
    raywalk::init();
    let pos = Position::from_fen(fen).expect("Invalid FEN");
    Search::new(pos, params)
}

fn seeded() -> SearchParams {
    SearchParams::new().tt_size_mb(1).seed(7)
}

#[test]
fn mate_in_1_back_rank() {
    let mut search = search_for("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", seeded());
    for depth in 1..=3 {
        let result = search.search(Some(depth));
        assert_eq!(result.best_move.map(|m| m.to_uci()).as_deref(), Some("a1a8"));
        assert!(result.score >= MATE_SCORE, "depth {}: score {}", depth, result.score);
        assert_eq!(mate_distance(result.score, depth), Some(1));
    }
}

#[test]
fn mate_in_2_rook_ladder() {
    let mut search = search_for("7k/8/8/8/8/8/R7/1R4K1 w - - 0 1", seeded());
    let result = search.search(Some(3));
    assert_eq!(mate_distance(result.score, 3), Some(2), "score {}", result.score);
    let mv = result.best_move.expect("a move");
    assert!(gen_legal_moves(search.position()).contains(&mv));
}

#[test]
fn faster_mate_scores_higher() {
    // Mate in one is available; the search must not prefer a slower mate
    let mut search = search_for("6k1/5ppp/8/8/8/8/8/RR4K1 w - - 0 1", seeded());
    let result = search.search(Some(3));
    assert_eq!(mate_distance(result.score, 3), Some(1));
    let mv = result.best_move.expect("a move").to_uci();
    assert!(mv == "a1a8" || mv == "b1b8", "unexpected {}", mv);
}

#[test]
fn alpha_beta_matches_minimax() {
    let suite = [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2),
        ("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", 3),
        ("4k3/8/4p3/3p4/8/2N5/8/3QK3 w - - 0 1", 3),
        ("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
        ("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1", 2),
    ];
    for (fen, depth) in suite {
        for capture_search in [true, false] {
            let params = seeded().capture_search(capture_search);
            let pruned = search_for(fen, params.clone()).search(Some(depth)).score;
            let reference = search_for(fen, params).minimax(depth);
            assert_eq!(
                pruned, reference,
                "{} depth {} capture_search {}",
                fen, depth, capture_search
            );
        }
    }
}

#[test]
fn tied_root_moves_carry_exact_scores() {
    let mut search = search_for("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", seeded());
    let result = search.search(Some(2));
    let best = result.root_moves.iter().map(|c| c.weight).max().unwrap();
    assert_eq!(best, result.score);
    let best_move = result.best_move.unwrap();
    assert!(result
        .root_moves
        .iter()
        .any(|c| c.mv == best_move && c.weight == best));
}

#[test]
fn same_seed_same_choice() {
    let fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
    let pick = |seed| {
        search_for(fen, SearchParams::new().tt_size_mb(1).seed(seed))
            .search(Some(2))
            .best_move
    };
    assert_eq!(pick(11), pick(11));
    assert_eq!(pick(12), pick(12));
}

#[test]
fn tie_break_draws_from_every_tied_move() {
    // Bare kings: all five king moves score 0
    let fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
    let mut seen = std::collections::HashSet::new();
    for seed in 0..64 {
        let mv = search_for(fen, SearchParams::new().tt_size_mb(1).seed(seed))
            .search(Some(1))
            .best_move
            .expect("a move");
        seen.insert(mv.to_uci());
    }
    assert!(seen.len() > 1, "tie-break never varied: {:?}", seen);
}

#[test]
fn winning_capture_is_taken() {
    // Undefended queen on d5
    let mut search = search_for("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1", seeded());
    let result = search.search(Some(2));
    assert_eq!(result.best_move.map(|m| m.to_uci()).as_deref(), Some("c3d5"));
}

#[test]
fn sanity_check_startpos() {
    let mut search = search_for(raywalk::START_FEN, seeded());
    let result = search.search(Some(3));
    assert!(result.score.abs() <= 1, "startpos score {}", result.score);
    let mv = result.best_move.expect("a move");
    assert!(gen_legal_moves(search.position()).contains(&mv));
    assert!(search.stats().nodes > 0);
}

#[test]
fn find_best_move_entry_point() {
    raywalk::init();
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mv = find_best_move(&pos, 2, None).expect("a move");
    assert_eq!(mv.to_uci(), "a1a8");
    // Low clock drops one ply; mate in one is still found at depth 1
    let mv = find_best_move(&pos, 2, Some(50)).expect("a move");
    assert_eq!(mv.to_uci(), "a1a8");

    let mated = Position::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(find_best_move(&mated, 3, None).is_none());
}
