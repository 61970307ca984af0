//! Pseudolegal move generation by ray casting.
//!
//! Pipeline:
//!   1. For every projection of every piece, walk outwards one step at a time.
//!   2. Classify each landing square against the current occupancy
//!      (`MoveSignal`) and sort it into the piece's `MoveResult` buckets.
//!   3. After an enemy piece is met, keep scanning the same ray: reaching the
//!      enemy king through empty squares records that piece as pinned.
//!
//! The legality filter (`legality.rs`) turns these results into legal moves.

use std::collections::HashMap;

use crate::engine::board::Board;
use crate::engine::coord::{Move, Position, Vector};
use crate::engine::piece::Piece;
use crate::engine::result::{MoveResult, ResultSet};
use crate::engine::types::Castle;

/// What a piece may do with a landing square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSignal {
    /// Empty and enterable.
    Empty,
    /// Empty, controlled but not enterable (pawn diagonal).
    Attacks,
    /// Occupied by an allied piece.
    Blocked,
    /// Occupied by an enemy piece other than the king.
    Capture,
    /// Occupied by the enemy king.
    CheckingAttack,
    /// Not reachable by this piece at all (pawn pushing into a piece).
    Disallowed,
}

// =========================================================================
// MoveGenerator
// =========================================================================

/// Ray caster over a location map.
///
/// A single piece can be excluded from the map; its square then reads as
/// empty so that sliding pieces see through it. King safety is evaluated this
/// way without touching the board.
#[derive(Clone, Copy, Debug)]
pub struct MoveGenerator<'a> {
    loc_map: &'a HashMap<Position, Piece>,
    excluded: Option<Piece>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(loc_map: &'a HashMap<Position, Piece>) -> Self {
        MoveGenerator {
            loc_map,
            excluded: None,
        }
    }

    /// Treat `piece` as absent from the board.
    pub fn excluding(self, piece: Piece) -> Self {
        MoveGenerator {
            excluded: Some(piece),
            ..self
        }
    }

    fn occupant(&self, pos: Position) -> Option<&Piece> {
        self.loc_map
            .get(&pos)
            .filter(|p| self.excluded.is_none_or(|ex| ex != **p))
    }

    /// Classify `target`, reached by `piece` travelling along `dir`.
    pub fn classify(&self, piece: &Piece, dir: Vector, target: Position) -> MoveSignal {
        let push = piece.is_pawn_push(dir);
        let pawn_diagonal = piece.is_pawn() && !push;
        match self.occupant(target) {
            None if pawn_diagonal => MoveSignal::Attacks,
            None => MoveSignal::Empty,
            Some(_) if push => MoveSignal::Disallowed,
            Some(other) if other.color == piece.color => MoveSignal::Blocked,
            Some(other) if other.is_king() => MoveSignal::CheckingAttack,
            Some(_) => MoveSignal::Capture,
        }
    }

    /// Cast every ray of a single piece.
    pub fn piece_moves(&self, piece: &Piece) -> MoveResult {
        let mut result = MoveResult::default();
        for &dir in piece.projections() {
            let mut pinned: Option<Position> = None;
            for step in 1..=piece.reach(dir) {
                let Ok(target) = dir
                    .scale(step as i16)
                    .and_then(|offset| piece.position.offset(offset))
                else {
                    break;
                };

                match (pinned, self.classify(piece, dir, target)) {
                    (None, MoveSignal::Empty) => {
                        if !piece.is_pawn() {
                            result.attack.push(target);
                        }
                        result.passive.push(target);
                    }
                    (None, MoveSignal::Capture) => {
                        result.capture.push(target);
                        result.attack.push(target);
                        pinned = Some(target);
                    }
                    (None, MoveSignal::Attacks) => {
                        result.attack.push(target);
                        break;
                    }
                    (None, MoveSignal::CheckingAttack) => {
                        result.capture.push(target);
                        break;
                    }
                    (None, MoveSignal::Blocked) => {
                        result.defend.push(target);
                        break;
                    }
                    (Some(victim), MoveSignal::CheckingAttack) => {
                        result.pin.push(victim);
                        break;
                    }
                    // Keep looking behind the captured piece for its king.
                    (Some(_), MoveSignal::Empty) => {}
                    _ => break,
                }
            }
        }
        result
    }

    /// Pseudolegal results for `pieces`, skipping inactive or excluded ones.
    pub fn pseudolegal<'p>(&self, pieces: impl IntoIterator<Item = &'p Piece>) -> ResultSet {
        pieces
            .into_iter()
            .filter(|p| p.active && self.excluded.is_none_or(|ex| ex != **p))
            .map(|p| (*p, self.piece_moves(p)))
            .collect()
    }
}

// =========================================================================
// Concrete move lists
// =========================================================================

/// All legal moves for the side to move, as executable `Move` values.
pub fn legal_move_list(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for (piece, result) in board.legal_results().iter() {
        for &end in &result.passive {
            let castle = if piece.is_king() {
                match end.j() - piece.position.j() {
                    2 => Castle::Short,
                    -2 => Castle::Long,
                    _ => Castle::None,
                }
            } else {
                Castle::None
            };
            moves.push(Move::castling(piece.position, end, castle));
        }
        for &end in &result.capture {
            moves.push(Move::capture(piece.position, end));
        }
    }
    moves
}

/// Legal moves originating from a specific square.
pub fn legal_moves_from(board: &Board, from: Position) -> Vec<Move> {
    legal_move_list(board)
        .into_iter()
        .filter(|m| m.start == from)
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
