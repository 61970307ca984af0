//! Board coordinates.
//!
//! `Position` is a square in grid form `(i, j)`: `i` is the rank index
//! (0 = rank 1) and `j` the file index (0 = file a). `Vector` is a bounded
//! relative offset between squares; piece projections are expressed as
//! vectors and scaled along a ray during move generation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::engine::types::{Castle, ChessError};

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// A relative offset with both components in `-7..=7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vector {
    i: i8,
    j: i8,
}

impl Vector {
    pub const MAX: i16 = 7;

    /// Build a vector, rejecting components outside the representable range.
    pub fn new(i: i16, j: i16) -> Result<Self, ChessError> {
        if i.abs() > Self::MAX || j.abs() > Self::MAX {
            return Err(ChessError::InvalidVector { i, j });
        }
        Ok(Vector {
            i: i as i8,
            j: j as i8,
        })
    }

    /// Compile-time constructor for the projection tables.
    pub(crate) const fn from_const(i: i8, j: i8) -> Self {
        Vector { i, j }
    }

    #[inline]
    pub fn i(self) -> i8 {
        self.i
    }

    #[inline]
    pub fn j(self) -> i8 {
        self.j
    }

    pub fn checked_add(self, rhs: Vector) -> Result<Vector, ChessError> {
        Vector::new(
            self.i as i16 + rhs.i as i16,
            self.j as i16 + rhs.j as i16,
        )
    }

    pub fn checked_sub(self, rhs: Vector) -> Result<Vector, ChessError> {
        Vector::new(
            self.i as i16 - rhs.i as i16,
            self.j as i16 - rhs.j as i16,
        )
    }

    /// Scalar multiplication.
    pub fn scale(self, k: i16) -> Result<Vector, ChessError> {
        Vector::new(self.i as i16 * k, self.j as i16 * k)
    }
}

impl std::ops::Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector {
            i: -self.i,
            j: -self.j,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board, `i` = rank index, `j` = file index, both in `0..8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    i: i8,
    j: i8,
}

impl Position {
    /// Build a square from grid coordinates.
    pub fn new(i: i8, j: i8) -> Result<Self, ChessError> {
        if !(0..8).contains(&i) || !(0..8).contains(&j) {
            return Err(ChessError::InvalidFormat(format!(
                "grid coordinate ({i}, {j}) is off the board"
            )));
        }
        Ok(Position { i, j })
    }

    /// Unchecked constructor for squares known to be on the board.
    pub(crate) const fn from_const(i: i8, j: i8) -> Self {
        Position { i, j }
    }

    /// Parse algebraic notation like "e4" (file letter may be upper case).
    pub fn from_algebraic(s: &str) -> Result<Self, ChessError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidFormat(format!(
                "'{s}' is not a two-character square"
            )));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) {
            return Err(ChessError::InvalidFormat(format!(
                "'{}' is not a file in A-H",
                bytes[0] as char
            )));
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(ChessError::InvalidFormat(format!(
                "'{}' is not a rank in 1-8",
                rank as char
            )));
        }
        Ok(Position {
            i: (rank - b'1') as i8,
            j: (file - b'a') as i8,
        })
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.j as u8) as char;
        let rank = (b'1' + self.i as u8) as char;
        format!("{file}{rank}")
    }

    /// Rank index (0 = rank 1).
    #[inline]
    pub fn i(self) -> i8 {
        self.i
    }

    /// File index (0 = file a).
    #[inline]
    pub fn j(self) -> i8 {
        self.j
    }

    /// Unique 6-bit code `i * 8 + j`.
    #[inline]
    pub fn index(self) -> u8 {
        (self.i * 8 + self.j) as u8
    }

    /// The square reached by moving along `v`; fails when that leaves the board.
    pub fn offset(self, v: Vector) -> Result<Position, ChessError> {
        Position::new(self.i + v.i(), self.j + v.j())
    }

    /// Squares from `self` (inclusive) towards `to` (exclusive).
    ///
    /// Straight and diagonal pairs yield every step along the line. Any other
    /// pair (a knight's offset, for instance) has no intermediate path and
    /// yields just `[self]`.
    pub fn path_to(self, to: Position) -> Vec<Position> {
        let di = to.i - self.i;
        let dj = to.j - self.j;
        if di.abs() != dj.abs() && di != 0 && dj != 0 {
            return vec![self];
        }
        let (si, sj) = (di.signum(), dj.signum());
        let len = di.abs().max(dj.abs());
        (0..len)
            .map(|k| Position {
                i: self.i + si * k,
                j: self.j + sj * k,
            })
            .collect()
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.index());
    }
}

impl std::ops::Sub for Position {
    type Output = Vector;

    /// Offset leading from `rhs` to `self`; always within range on an 8x8 board.
    fn sub(self, rhs: Position) -> Vector {
        Vector::from_const(self.i - rhs.i, self.j - rhs.j)
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// An instruction for the move executor. Capture and castle flags are
/// resolved by whoever builds the move; the executor trusts them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub takes: bool,
    pub castle: Castle,
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            takes: false,
            castle: Castle::None,
        }
    }

    pub fn capture(start: Position, end: Position) -> Self {
        Move {
            takes: true,
            ..Move::new(start, end)
        }
    }

    pub fn castling(start: Position, end: Position, castle: Castle) -> Self {
        Move {
            castle,
            ..Move::new(start, end)
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    #[test]
    fn position_from_algebraic() {
        assert_eq!(sq("a1"), Position::new(0, 0).unwrap());
        assert_eq!(sq("h1"), Position::new(0, 7).unwrap());
        assert_eq!(sq("a8"), Position::new(7, 0).unwrap());
        assert_eq!(sq("E4"), Position::new(3, 4).unwrap());
    }

    #[test]
    fn position_algebraic_round_trip() {
        for i in 0..8 {
            for j in 0..8 {
                let p = Position::new(i, j).unwrap();
                assert_eq!(Position::from_algebraic(&p.to_algebraic()), Ok(p));
            }
        }
    }

    #[test]
    fn position_from_algebraic_invalid() {
        for bad in ["", "a", "a9", "a0", "i1", "abc", " 1", "11", "aa"] {
            assert!(
                matches!(
                    Position::from_algebraic(bad),
                    Err(ChessError::InvalidFormat(_))
                ),
                "expected InvalidFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn position_from_grid_invalid() {
        for (i, j) in [(-1, 2), (8, 2), (0, -1), (2, 8), (3, 100)] {
            assert!(matches!(
                Position::new(i, j),
                Err(ChessError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn position_index_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for i in 0..8 {
            for j in 0..8 {
                let p = Position::new(i, j).unwrap();
                assert_eq!(p.index(), (i * 8 + j) as u8);
                assert!(seen.insert(p.index()));
            }
        }
    }

    #[test]
    fn position_offset_and_difference() {
        let e4 = sq("e4");
        let v = Vector::new(1, 2).unwrap();
        assert_eq!(e4.offset(v), Ok(sq("g5")));
        assert_eq!(sq("g5") - e4, v);
        assert!(sq("h8").offset(v).is_err());
    }

    #[test]
    fn path_straight() {
        assert_eq!(
            sq("e2").path_to(sq("e8")),
            vec![sq("e2"), sq("e3"), sq("e4"), sq("e5"), sq("e6"), sq("e7")]
        );
        assert_eq!(sq("e1").path_to(sq("a1")), vec![sq("e1"), sq("d1"), sq("c1"), sq("b1")]);
    }

    #[test]
    fn path_diagonal() {
        assert_eq!(sq("c3").path_to(sq("e1")), vec![sq("c3"), sq("d2")]);
        assert_eq!(sq("h8").path_to(sq("e5")), vec![sq("h8"), sq("g7"), sq("f6")]);
    }

    #[test]
    fn path_non_aligned_is_start_only() {
        assert_eq!(sq("d6").path_to(sq("e8")), vec![sq("d6")]);
        assert_eq!(sq("a1").path_to(sq("c8")), vec![sq("a1")]);
    }

    #[test]
    fn path_to_self_is_empty() {
        assert!(sq("d4").path_to(sq("d4")).is_empty());
    }

    #[test]
    fn vector_bounds() {
        assert!(Vector::new(7, -7).is_ok());
        assert_eq!(
            Vector::new(8, 0),
            Err(ChessError::InvalidVector { i: 8, j: 0 })
        );
        assert!(Vector::new(0, -8).is_err());
    }

    #[test]
    fn vector_arithmetic() {
        let a = Vector::new(1, 2).unwrap();
        let b = Vector::new(-2, 1).unwrap();
        assert_eq!(a.checked_add(b), Vector::new(-1, 3));
        assert_eq!(a.checked_sub(b), Vector::new(3, 1));
        assert_eq!(a.scale(3), Vector::new(3, 6));
        assert!(a.scale(4).is_err());
        assert_eq!(-a, Vector::new(-1, -2).unwrap());
    }

    #[test]
    fn move_display() {
        let m = Move::new(sq("e2"), sq("e4"));
        assert_eq!(m.to_string(), "e2e4");
        assert!(!m.takes);
        assert_eq!(m.castle, Castle::None);

        let c = Move::castling(sq("e1"), sq("g1"), Castle::Short);
        assert_eq!(c.castle, Castle::Short);
        assert!(Move::capture(sq("e4"), sq("d5")).takes);
    }
}
