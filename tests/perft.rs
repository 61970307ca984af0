//! Perft (PERFormance Test): exhaustive move-generation correctness suite.
//!
//! Each test verifies that the number of leaf nodes at a given depth matches
//! known-correct values for standard positions. Depths are limited to trees
//! that contain no en-passant captures or promotions, which the rules core
//! does not model.
//!
//! Reference: <https://www.chessprogramming.org/Perft_Results>

use chess_rules::engine::board::Board;
use chess_rules::engine::movegen::legal_move_list;

/// Recursive perft: count leaf nodes at `depth`.
fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_move_list(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in moves {
        let mut child = board.clone();
        child.make_move(mv).unwrap();
        nodes += perft(&child, depth - 1);
    }
    nodes
}

// =====================================================================
// Position 1: Starting position
// =====================================================================

#[test]
fn perft_start_depth_1() {
    assert_eq!(perft(&Board::starting(), 1), 20);
}

#[test]
fn perft_start_depth_2() {
    assert_eq!(perft(&Board::starting(), 2), 400);
}

#[test]
fn perft_start_depth_3() {
    assert_eq!(perft(&Board::starting(), 3), 8_902);
}

#[test]
fn perft_start_depth_4() {
    assert_eq!(perft(&Board::starting(), 4), 197_281);
}

// =====================================================================
// Position 3: rook and pawn endgame with discovered checks along rank 4
// =====================================================================

fn position_3() -> Board {
    Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap()
}

#[test]
fn perft_pos3_depth_1() {
    assert_eq!(perft(&position_3(), 1), 14);
}

#[test]
fn perft_pos3_depth_2() {
    assert_eq!(perft(&position_3(), 2), 191);
}

// =====================================================================
// Position 4: White in check, pinned and interposing pieces
// =====================================================================

fn position_4() -> Board {
    Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
        .unwrap()
}

fn position_4_mirrored() -> Board {
    Board::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1")
        .unwrap()
}

#[test]
fn perft_pos4_depth_1() {
    assert_eq!(perft(&position_4(), 1), 6);
}

#[test]
fn perft_pos4_mirrored_depth_1() {
    assert_eq!(perft(&position_4_mirrored(), 1), 6);
}
