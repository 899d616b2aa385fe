use raywalk::board::Position;
use raywalk::perft::perft_count;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position as _};

fn run_perft_check(fen_str: &str, depth: u8, name: &str) {
    raywalk::init();
    let pos = Position::from_fen(fen_str).expect("Valid FEN");
    let ours = perft_count(&pos, depth);

    let fen: Fen = fen_str.parse().expect("shakmaty parses FEN");
    let reference: Chess = fen
        .into_position(shakmaty::CastlingMode::Standard)
        .expect("Shakmaty should accept FEN");
    let expected = shakmaty_perft(&reference, depth);

    assert_eq!(ours, expected, "Mismatch in {name} at depth {depth}");
}

fn shakmaty_perft(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += shakmaty_perft(&new_pos, depth - 1);
    }
    nodes
}

#[test]
fn perft_startpos_matches_reference() {
    run_perft_check(raywalk::START_FEN, 3, "Start Position");
}

#[test]
fn perft_en_passant_discovered_check() {
    // Capturing en passant would expose the black king on the fifth rank
    run_perft_check("8/8/8/k1pP3R/8/8/8/4K3 w - c6 0 1", 3, "En Passant Discovered Check");
}

#[test]
fn perft_en_passant_evades_check() {
    // The double-pushed pawn gives check; taking it en passant is a legal reply
    run_perft_check("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1", 3, "En Passant Check Evasion");
}

#[test]
fn perft_castling_prevented_by_attack() {
    // King is in check, cannot castle
    run_perft_check("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1", 2, "Castling in Check (Illegal)");
}

#[test]
fn perft_castling_through_check() {
    // f1 is attacked by the black rook
    run_perft_check("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1", 2, "Castling Through Check");
}

#[test]
fn perft_queenside_b_file_attack_is_allowed() {
    // b1 attacked but not crossed by the king: O-O-O stays legal
    run_perft_check("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", 2, "Queenside b-file Attack");
}

#[test]
fn perft_rook_capture_removes_right() {
    run_perft_check("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1", 3, "Rook Capture Clears Right");
}

#[test]
fn perft_promotion_capture() {
    run_perft_check("n1n5/P5P1/8/2k5/8/8/8/4K3 w - - 0 1", 3, "Promotion Capture");
}

#[test]
fn perft_double_check_response() {
    run_perft_check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        3,
        "Complex Check Response",
    );
}
