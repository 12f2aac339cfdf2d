//! Perft counts for the standard validation positions.
//!
//! Deeper counts are ignored by default.
//! Run with: `cargo test --release -p chessbits-engine --test perft -- --ignored`

use chessbits_engine::{perft, perft_divide, Position};

fn count(fen: &str, depth: u32) -> u64 {
    let mut position = Position::from_fen(fen).unwrap();
    let before = position.clone();
    let nodes = perft(&mut position, depth);
    assert_eq!(position, before, "perft must leave the position untouched");
    nodes
}

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
// Check evasion, en passant, promotion
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
// Lots of promotions and captures
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_4_MIRRORED: &str =
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

#[test]
fn kiwipete() {
    assert_eq!(count(KIWIPETE, 1), 48);
    assert_eq!(count(KIWIPETE, 2), 2039);
    assert_eq!(count(KIWIPETE, 3), 97_862);
}

#[test]
fn position_3() {
    assert_eq!(count(POSITION_3, 1), 14);
    assert_eq!(count(POSITION_3, 2), 191);
    assert_eq!(count(POSITION_3, 3), 2812);
    assert_eq!(count(POSITION_3, 4), 43_238);
}

#[test]
fn position_4() {
    assert_eq!(count(POSITION_4, 1), 6);
    assert_eq!(count(POSITION_4, 2), 264);
    assert_eq!(count(POSITION_4, 3), 9467);
}

#[test]
fn position_4_mirrored() {
    assert_eq!(count(POSITION_4_MIRRORED, 1), 6);
    assert_eq!(count(POSITION_4_MIRRORED, 2), 264);
    assert_eq!(count(POSITION_4_MIRRORED, 3), 9467);
}

#[test]
fn position_5() {
    assert_eq!(count(POSITION_5, 1), 44);
    assert_eq!(count(POSITION_5, 2), 1486);
    assert_eq!(count(POSITION_5, 3), 62_379);
}

#[test]
fn divide_sums_to_perft() {
    let mut position = Position::from_fen(POSITION_5).unwrap();
    let report = perft_divide(&mut position, 2);
    assert_eq!(report.divide.len(), 44);
    assert_eq!(report.nodes, 1486);
    assert!(report.to_string().contains("Nodes searched: 1486"));
}

#[test]
#[ignore]
fn deep_counts() {
    assert_eq!(count(KIWIPETE, 4), 4_085_603);
    assert_eq!(count(POSITION_3, 5), 674_624);
    assert_eq!(count(POSITION_4, 4), 422_333);
    assert_eq!(count(POSITION_5, 4), 2_103_487);
}
