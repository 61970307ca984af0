//! Castling validator.
//!
//! Castling is offered as an extra king destination two files away. The rook
//! is only moved when the executor plays the move.

use std::collections::HashMap;

use tracing::trace;

use crate::engine::coord::Position;
use crate::engine::movegen::MoveGenerator;
use crate::engine::piece::Piece;
use crate::engine::types::{Castle, CastlingRights, Color, PieceKind};

/// Home square of `color`'s king.
pub fn king_home(color: Color) -> Position {
    Position::from_const(color.back_rank(), 4)
}

/// Home square of the rook that castles on `side`, if `side` is a wing.
pub fn rook_home(color: Color, side: Castle) -> Option<Position> {
    let file = side.rook_file()?;
    Position::new(color.back_rank(), file).ok()
}

/// Square the rook lands on after castling on `side`.
pub fn rook_target(color: Color, side: Castle) -> Option<Position> {
    let file = side.rook_target_file()?;
    Position::new(color.back_rank(), file).ok()
}

/// Square the king lands on after castling on `side`.
pub fn king_target(color: Color, side: Castle) -> Option<Position> {
    let file = side.king_target_file()?;
    Position::new(color.back_rank(), file).ok()
}

/// Castling moves currently available to `color`, as `(wing, king destination)`.
pub fn castling_moves(
    loc_map: &HashMap<Position, Piece>,
    color: Color,
    rights: CastlingRights,
    in_check: bool,
    opponents: &[Piece],
) -> Vec<(Castle, Position)> {
    let home = king_home(color);
    let king_on_home = loc_map
        .get(&home)
        .is_some_and(|p| p.is_king() && p.color == color);
    if !rights.any(color) || in_check || !king_on_home {
        return Vec::new();
    }

    let threats = MoveGenerator::new(loc_map).pseudolegal(opponents);
    let mut covered = threats.all_valid();
    covered.extend(threats.all_attack());

    let mut moves = Vec::new();
    for side in [Castle::Short, Castle::Long] {
        if !rights.has(color, side) {
            continue;
        }
        let (Some(rook_sq), Some(dest)) = (rook_home(color, side), king_target(color, side)) else {
            continue;
        };
        let rook_ready = loc_map
            .get(&rook_sq)
            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color);
        if !rook_ready {
            continue;
        }

        let transit: Vec<Position> = home.path_to(rook_sq).into_iter().skip(1).collect();
        if transit.iter().any(|sq| loc_map.contains_key(sq)) {
            trace!(?side, %color, "castling path occupied");
            continue;
        }
        if transit.iter().any(|sq| covered.contains(sq)) {
            trace!(?side, %color, "castling path attacked");
            continue;
        }
        moves.push((side, dest));
    }
    moves
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::board::Board;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    fn castles(fen: &str) -> Vec<Position> {
        let b = Board::from_fen(fen).unwrap();
        let mover = b.to_move();
        castling_moves(
            b.loc_map(),
            mover,
            b.castle_rights(),
            b.is_check(),
            b.pieces(!mover),
        )
        .into_iter()
        .map(|(_, dest)| dest)
        .collect()
    }

    #[test]
    fn home_squares() {
        assert_eq!(king_home(Color::White), sq("e1"));
        assert_eq!(king_home(Color::Black), sq("e8"));
        assert_eq!(rook_home(Color::White, Castle::Short), Some(sq("h1")));
        assert_eq!(rook_home(Color::Black, Castle::Long), Some(sq("a8")));
        assert_eq!(rook_target(Color::White, Castle::Long), Some(sq("d1")));
        assert_eq!(king_target(Color::Black, Castle::Short), Some(sq("g8")));
        assert_eq!(rook_home(Color::White, Castle::None), None);
    }

    #[test]
    fn both_wings_open() {
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(moves, vec![sq("g1"), sq("c1")]);
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert_eq!(moves, vec![sq("g8"), sq("c8")]);
    }

    #[test]
    fn no_castling_out_of_check() {
        assert!(castles("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").is_empty());
    }

    #[test]
    fn attacked_transit_square_blocks_one_wing() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/3r4/R3K2R w KQkq - 0 1"), vec![sq("g1")]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1"), vec![sq("c1")]);
    }

    #[test]
    fn attacked_b_file_blocks_long_castle() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1"), vec![sq("g1")]);
    }

    #[test]
    fn occupied_path_blocks() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1"), Vec::<Position>::new());
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3KB1R w KQkq - 0 1"), vec![sq("c1")]);
    }

    #[test]
    fn rights_and_rooks_required() {
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").is_empty());
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w Q - 0 1"), vec![sq("c1")]);
        // Right held but the rook is gone.
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/4K2R w KQ - 0 1"), vec![sq("g1")]);
    }

    #[test]
    fn king_off_home_square() {
        assert!(castles("r3k2r/8/8/8/8/8/8/R4K1R w KQ - 0 1").is_empty());
    }
}
