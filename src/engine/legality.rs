//! Legality filter: pseudolegal results in, legal results out.
//!
//! Order of restrictions:
//!   1. double check leaves only the king with moves
//!   2. the king may not enter a controlled square or take a defended piece
//!   3. a single check is answered by capturing or blocking the checker
//!   4. pinned pieces stay on the line between pinner and king

use std::collections::HashMap;

use tracing::trace;

use crate::engine::coord::Position;
use crate::engine::movegen::MoveGenerator;
use crate::engine::piece::Piece;
use crate::engine::result::ResultSet;

/// Legal results for `own` given the opponent's pieces and the pieces
/// currently giving check to `own`'s king.
pub fn legal_results(
    loc_map: &HashMap<Position, Piece>,
    own: &[Piece],
    opponents: &[Piece],
    attackers: &[Piece],
) -> ResultSet {
    let generator = MoveGenerator::new(loc_map);
    let mut legal = generator.pseudolegal(own);

    let Some(king) = legal.king().map(|(piece, _)| *piece) else {
        return legal;
    };

    if attackers.len() >= 2 {
        legal.clear_where(|piece| !piece.is_king());
    }

    restrict_king(&mut legal, king, &generator.excluding(king).pseudolegal(opponents));

    if let [attacker] = attackers {
        let line = attacker.position.path_to(king.position);
        trace!(%attacker, "restricting to interposition");
        for (_, result) in legal.iter_mut().filter(|(piece, _)| !piece.is_king()) {
            result.retain_valid(|square| line.contains(square));
        }
    }

    let opponent_moves = generator.pseudolegal(opponents);
    restrict_pinned(&mut legal, king, &opponent_moves);

    legal
}

/// Drop king destinations the opponent controls or defends. `threats` must
/// be generated with the king excluded from the board.
fn restrict_king(legal: &mut ResultSet, king: Piece, threats: &ResultSet) {
    let mut unsafe_squares = threats.all_attack();
    unsafe_squares.extend(threats.all_defend());
    if let Some(result) = legal.get_mut(&king) {
        result.retain_valid(|square| !unsafe_squares.contains(square));
    }
}

fn restrict_pinned(legal: &mut ResultSet, king: Piece, opponent_moves: &ResultSet) {
    for (piece, result) in legal.iter_mut() {
        if piece.is_king() {
            continue;
        }
        if let Some(pinner) = opponent_moves.lookup_pin(piece.position) {
            let axis = pinner.position.path_to(king.position);
            result.retain_valid(|square| axis.contains(square));
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::board::Board;
    use crate::engine::result::MoveResult;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    fn legal_at(board: &Board, name: &str) -> MoveResult {
        board
            .legal_results()
            .at(sq(name))
            .map(|(_, r)| r.clone())
            .unwrap()
    }

    fn sorted(mut v: Vec<Position>) -> Vec<Position> {
        v.sort();
        v
    }

    fn squares(names: &[&str]) -> Vec<Position> {
        sorted(names.iter().map(|n| sq(n)).collect())
    }

    #[test]
    fn king_steps_off_checking_file() {
        let b = Board::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        let king = legal_at(&b, "e8");
        assert_eq!(sorted(king.valid().collect()), squares(&["d7", "d8", "f7", "f8"]));
    }

    #[test]
    fn single_check_forces_interposition() {
        let b = Board::from_fen("4k3/8/8/2n5/8/8/4R3/4K3 b - - 0 1").unwrap();
        let knight = legal_at(&b, "c5");
        assert_eq!(sorted(knight.valid().collect()), squares(&["e4", "e6"]));
    }

    #[test]
    fn single_check_allows_capturing_the_checker() {
        let b = Board::from_fen("4k3/5R2/8/8/8/8/5q2/4K3 w - - 0 1").unwrap();
        let rook = legal_at(&b, "f7");
        assert!(rook.passive.is_empty());
        assert_eq!(rook.capture, vec![sq("f2")]);
        let king = legal_at(&b, "e1");
        assert_eq!(sorted(king.valid().collect()), squares(&["d1", "f2"]));
    }

    #[test]
    fn double_check_only_king_moves() {
        let b = Board::from_fen("4k3/8/r2N4/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        assert_eq!(b.attackers().len(), 2);
        assert!(!legal_at(&b, "a6").has_valid());
        let king = legal_at(&b, "e8");
        assert_eq!(sorted(king.valid().collect()), squares(&["d7", "d8", "f8"]));
    }

    #[test]
    fn pinned_bishop_keeps_capture_of_pinner() {
        let b = Board::from_fen("4k3/8/8/8/8/2b5/3B4/4K3 w - - 0 1").unwrap();
        let bishop = legal_at(&b, "d2");
        assert!(bishop.passive.is_empty());
        assert_eq!(bishop.capture, vec![sq("c3")]);
    }

    #[test]
    fn pinned_rook_slides_along_pin_axis() {
        let b = Board::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let rook = legal_at(&b, "e2");
        assert_eq!(
            sorted(rook.valid().collect()),
            squares(&["e3", "e4", "e5", "e6", "e7", "e8"])
        );
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let b = Board::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(!legal_at(&b, "e2").has_valid());
    }

    #[test]
    fn king_cannot_retreat_along_checking_ray() {
        // Rook h1 checks along the first rank; f1 lies behind the king on that ray.
        let b = Board::from_fen("4k3/8/8/8/8/8/8/6Kr w - - 0 1").unwrap();
        let king = legal_at(&b, "g1");
        let moves = sorted(king.valid().collect());
        assert!(!moves.contains(&sq("f1")));
        assert!(moves.contains(&sq("h1")));
    }

    #[test]
    fn king_cannot_take_defended_piece() {
        let b = Board::from_fen("4kr2/8/8/8/8/8/5r2/4K3 w - - 0 1").unwrap();
        let king = legal_at(&b, "e1");
        assert!(king.capture.is_empty());
        assert_eq!(sorted(king.valid().collect()), squares(&["d1"]));
    }

    #[test]
    fn pawn_controlled_squares_are_off_limits() {
        let b = Board::from_fen("4k3/8/8/8/8/5p2/8/4K3 w - - 0 1").unwrap();
        let king = legal_at(&b, "e1");
        assert_eq!(
            sorted(king.valid().collect()),
            squares(&["d1", "d2", "f1", "f2"])
        );
    }

    #[test]
    fn function_without_king_returns_pseudolegal() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let rook = *b.loc_map().get(&sq("a1")).unwrap();
        let result = legal_results(b.loc_map(), &[rook], &[], &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&rook).unwrap().valid().count(), 10);
    }
}
