//! Pieces and their movement geometry.
//!
//! A piece's projection vectors and maximum slide distance depend only on its
//! kind (and, for pawns, its colour), so they are computed by pure functions
//! over `PieceKind` instead of being stored per piece.

use std::fmt;

use crate::engine::coord::{Position, Vector};
use crate::engine::types::{ChessError, Color, PieceKind};

const fn v(i: i8, j: i8) -> Vector {
    Vector::from_const(i, j)
}

const KING_QUEEN: [Vector; 8] = [
    v(1, 1),
    v(1, 0),
    v(1, -1),
    v(0, 1),
    v(0, -1),
    v(-1, 1),
    v(-1, 0),
    v(-1, -1),
];

const ROOK: [Vector; 4] = [v(1, 0), v(0, 1), v(0, -1), v(-1, 0)];

const BISHOP: [Vector; 4] = [v(1, 1), v(1, -1), v(-1, 1), v(-1, -1)];

const KNIGHT: [Vector; 8] = [
    v(1, 2),
    v(1, -2),
    v(2, 1),
    v(2, -1),
    v(-1, 2),
    v(-1, -2),
    v(-2, 1),
    v(-2, -1),
];

// Forward push first, then the two capture diagonals.
const WHITE_PAWN: [Vector; 3] = [v(1, 0), v(1, -1), v(1, 1)];
const BLACK_PAWN: [Vector; 3] = [v(-1, 0), v(-1, -1), v(-1, 1)];

/// Directions a piece of `kind` and `color` projects along.
pub fn projections(kind: PieceKind, color: Color) -> &'static [Vector] {
    match kind {
        PieceKind::King | PieceKind::Queen => &KING_QUEEN,
        PieceKind::Rook => &ROOK,
        PieceKind::Bishop => &BISHOP,
        PieceKind::Knight => &KNIGHT,
        PieceKind::Pawn => match color {
            Color::White => &WHITE_PAWN,
            Color::Black => &BLACK_PAWN,
        },
    }
}

/// Furthest number of steps a piece of `kind` may take along one projection.
pub fn max_distance(kind: PieceKind) -> i8 {
    match kind {
        PieceKind::King | PieceKind::Knight => 1,
        PieceKind::Pawn => 2,
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => 7,
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece on (or captured from) the board.
///
/// Equality and hashing cover every field, so two pieces are the same when
/// they stand on the same square with the same kind, colour and activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub position: Position,
    pub kind: PieceKind,
    pub color: Color,
    pub active: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            position,
            kind,
            color,
            active: true,
        }
    }

    /// Build a piece from its FEN letter.
    pub fn from_char(c: char, position: Position) -> Result<Self, ChessError> {
        let (color, kind) = PieceKind::from_char(c)
            .ok_or_else(|| ChessError::InvalidPiece(format!("unknown piece letter '{c}'")))?;
        Ok(Piece::new(kind, color, position))
    }

    /// FEN letter for this piece.
    pub fn to_char(&self) -> char {
        self.kind.to_char(self.color)
    }

    pub fn projections(&self) -> &'static [Vector] {
        projections(self.kind, self.color)
    }

    pub fn max_distance(&self) -> i8 {
        max_distance(self.kind)
    }

    #[inline]
    pub fn is_pawn(&self) -> bool {
        self.kind == PieceKind::Pawn
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Whether `dir` is this pawn's straight-ahead push.
    #[inline]
    pub fn is_pawn_push(&self, dir: Vector) -> bool {
        self.is_pawn() && dir.j() == 0
    }

    /// Steps this piece may take along `dir`.
    ///
    /// Pawns push two squares only from their starting rank and capture a
    /// single square diagonally; everything else uses its kind's distance.
    pub fn reach(&self, dir: Vector) -> i8 {
        if !self.is_pawn() {
            return self.max_distance();
        }
        if self.is_pawn_push(dir) && self.position.i() == self.color.pawn_rank() {
            self.max_distance()
        } else {
            1
        }
    }

    /// Mark the piece as captured.
    pub fn capture(&mut self) {
        self.active = false;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.position)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
