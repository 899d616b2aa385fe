use raywalk::board::{Position, START_FEN};
use raywalk::perft::{divide, perft, perft_count, PerftStats};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";

fn load(fen: &str) -> Position {
    raywalk::init();
    Position::from_fen(fen).expect("valid FEN")
}

#[test]
fn perft_startpos_node_counts() {
    let pos = load(START_FEN);
    let expected = [20u64, 400, 8902, 197_281];
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u8 + 1;
        assert_eq!(perft_count(&pos, depth), nodes, "perft mismatch at depth {}", depth);
    }
}

#[test]
fn perft_startpos_statistics() {
    let pos = load(START_FEN);
    assert_eq!(
        perft(&pos, 3),
        PerftStats {
            nodes: 8902,
            captures: 34,
            en_passants: 0,
            checks: 12,
            checkmates: 0,
            castles: 0,
            promotions: 0,
        }
    );
    let d4 = perft(&pos, 4);
    assert_eq!(d4.nodes, 197_281);
    assert_eq!(d4.captures, 1576);
    assert_eq!(d4.checks, 469);
    assert_eq!(d4.checkmates, 8);
}

#[test]
fn perft_kiwipete() {
    let pos = load(KIWIPETE);
    let d1 = perft(&pos, 1);
    assert_eq!(d1.nodes, 48);
    assert_eq!(d1.captures, 8);
    assert_eq!(d1.castles, 2);

    assert_eq!(
        perft(&pos, 2),
        PerftStats {
            nodes: 2039,
            captures: 351,
            en_passants: 1,
            checks: 3,
            checkmates: 0,
            castles: 91,
            promotions: 0,
        }
    );
    assert_eq!(perft_count(&pos, 3), 97_862);
}

#[test]
fn perft_rook_endgame() {
    let pos = load(POSITION_3);
    assert_eq!(perft_count(&pos, 1), 14);
    assert_eq!(perft_count(&pos, 2), 191);
    let d3 = perft(&pos, 3);
    assert_eq!(d3.nodes, 2812);
    assert_eq!(d3.captures, 209);
    assert_eq!(d3.en_passants, 2);
    assert_eq!(d3.checks, 267);
    assert_eq!(d3.checkmates, 0);
}

#[test]
fn perft_promotion_heavy_position() {
    let pos = load(POSITION_4);
    assert_eq!(perft_count(&pos, 1), 6);

    let d2 = perft(&pos, 2);
    assert_eq!(d2.nodes, 264);
    assert_eq!(d2.captures, 87);
    assert_eq!(d2.checks, 10);
    assert_eq!(d2.castles, 6);
    assert_eq!(d2.promotions, 48);

    let d3 = perft(&pos, 3);
    assert_eq!(d3.nodes, 9467);
    assert_eq!(d3.captures, 1021);
    assert_eq!(d3.en_passants, 4);
    assert_eq!(d3.checks, 38);
    assert_eq!(d3.checkmates, 22);
    assert_eq!(d3.promotions, 120);
}

#[test]
fn divide_matches_perft() {
    let pos = load(KIWIPETE);
    let parts = divide(&pos, 2);
    assert_eq!(parts.len(), 48);
    assert_eq!(parts.iter().map(|(_, n)| *n).sum::<u64>(), 2039);
}
