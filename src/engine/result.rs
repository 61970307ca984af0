//! Per-piece move classification store.
//!
//! `MoveResult` buckets the squares one piece interacts with; `ResultSet`
//! keys those buckets by piece and offers the flattened views the legality
//! filter, castling validator and termination check consume.

use std::collections::BTreeMap;

use crate::engine::coord::Position;
use crate::engine::piece::Piece;

/// Bucket a classified square lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Empty square the piece can move to.
    Passive,
    /// Enemy-occupied square the piece can move to.
    Capture,
    /// Square the piece controls (enemy king may not enter it).
    Attack,
    /// Allied piece the piece guards.
    Defend,
    /// Enemy piece found pinned to its king.
    Pin,
}

impl MoveKind {
    pub const ALL: [MoveKind; 5] = [
        MoveKind::Passive,
        MoveKind::Capture,
        MoveKind::Attack,
        MoveKind::Defend,
        MoveKind::Pin,
    ];
}

// ---------------------------------------------------------------------------
// MoveResult
// ---------------------------------------------------------------------------

/// Classified squares for a single piece.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    pub passive: Vec<Position>,
    pub capture: Vec<Position>,
    pub attack: Vec<Position>,
    pub defend: Vec<Position>,
    pub pin: Vec<Position>,
}

impl MoveResult {
    pub fn get(&self, kind: MoveKind) -> &[Position] {
        match kind {
            MoveKind::Passive => &self.passive,
            MoveKind::Capture => &self.capture,
            MoveKind::Attack => &self.attack,
            MoveKind::Defend => &self.defend,
            MoveKind::Pin => &self.pin,
        }
    }

    /// Realisable destinations: passive moves followed by captures.
    pub fn valid(&self) -> impl Iterator<Item = Position> + '_ {
        self.passive.iter().chain(self.capture.iter()).copied()
    }

    /// Any square recorded in any bucket.
    pub fn has_moves(&self) -> bool {
        MoveKind::ALL.iter().any(|&k| !self.get(k).is_empty())
    }

    /// Any realisable destination.
    pub fn has_valid(&self) -> bool {
        !self.passive.is_empty() || !self.capture.is_empty()
    }

    /// Apply `keep` to the passive and capture buckets.
    pub fn retain_valid(&mut self, keep: impl Fn(&Position) -> bool) {
        self.passive.retain(|p| keep(p));
        self.capture.retain(|p| keep(p));
    }
}

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// Move results keyed by the piece that produces them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet {
    store: BTreeMap<Piece, MoveResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, piece: Piece, result: MoveResult) {
        self.store.insert(piece, result);
    }

    pub fn get(&self, piece: &Piece) -> Option<&MoveResult> {
        self.store.get(piece)
    }

    pub fn get_mut(&mut self, piece: &Piece) -> Option<&mut MoveResult> {
        self.store.get_mut(piece)
    }

    pub fn contains(&self, piece: &Piece) -> bool {
        self.store.contains_key(piece)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Piece, &MoveResult)> {
        self.store.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Piece, &mut MoveResult)> {
        self.store.iter_mut()
    }

    /// Result for the piece standing on `pos`, if any.
    pub fn at(&self, pos: Position) -> Option<(&Piece, &MoveResult)> {
        self.store.iter().find(|(p, _)| p.position == pos)
    }

    /// Every square in bucket `kind`, across all pieces.
    pub fn all(&self, kind: MoveKind) -> Vec<Position> {
        self.store
            .values()
            .flat_map(|r| r.get(kind).iter().copied())
            .collect()
    }

    /// Every realisable destination (`passive ∪ capture`) across all pieces.
    pub fn all_valid(&self) -> Vec<Position> {
        let mut squares = self.all(MoveKind::Passive);
        squares.extend(self.all(MoveKind::Capture));
        squares
    }

    pub fn all_capture(&self) -> Vec<Position> {
        self.all(MoveKind::Capture)
    }

    pub fn all_attack(&self) -> Vec<Position> {
        self.all(MoveKind::Attack)
    }

    pub fn all_defend(&self) -> Vec<Position> {
        self.all(MoveKind::Defend)
    }

    pub fn all_pins(&self) -> Vec<Position> {
        self.all(MoveKind::Pin)
    }

    /// Whether any piece can move at all.
    pub fn has_valid(&self) -> bool {
        self.store.values().any(MoveResult::has_valid)
    }

    /// The king entry, if the set holds one.
    pub fn king(&self) -> Option<(&Piece, &MoveResult)> {
        self.store.iter().find(|(p, _)| p.is_king())
    }

    pub fn king_mut(&mut self) -> Option<(&Piece, &mut MoveResult)> {
        self.store.iter_mut().find(|(p, _)| p.is_king())
    }

    /// The piece exerting a pin on whatever stands at `square`.
    pub fn lookup_pin(&self, square: Position) -> Option<&Piece> {
        self.store
            .iter()
            .find(|(_, r)| r.pin.contains(&square))
            .map(|(p, _)| p)
    }

    /// Pieces whose capture bucket contains `square`.
    pub fn capturers_of(&self, square: Position) -> Vec<Piece> {
        self.store
            .iter()
            .filter(|(_, r)| r.capture.contains(&square))
            .map(|(p, _)| *p)
            .collect()
    }

    /// Empty the results of every piece for which `clear` holds.
    pub fn clear_where(&mut self, clear: impl Fn(&Piece) -> bool) {
        for (piece, result) in self.store.iter_mut() {
            if clear(piece) {
                *result = MoveResult::default();
            }
        }
    }
}

impl FromIterator<(Piece, MoveResult)> for ResultSet {
    fn from_iter<T: IntoIterator<Item = (Piece, MoveResult)>>(iter: T) -> Self {
        ResultSet {
            store: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = (Piece, MoveResult);
    type IntoIter = std::collections::btree_map::IntoIter<Piece, MoveResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Color, PieceKind};

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    fn sample() -> (Piece, Piece, ResultSet) {
        let king = Piece::new(PieceKind::King, Color::White, sq("e1"));
        let rook = Piece::new(PieceKind::Rook, Color::White, sq("a1"));
        let set: ResultSet = [
            (
                king,
                MoveResult {
                    passive: vec![sq("d1"), sq("f1")],
                    attack: vec![sq("d1"), sq("f1")],
                    defend: vec![sq("e2")],
                    ..MoveResult::default()
                },
            ),
            (
                rook,
                MoveResult {
                    passive: vec![sq("a2")],
                    capture: vec![sq("a7")],
                    attack: vec![sq("a2"), sq("a7")],
                    pin: vec![sq("a7")],
                    ..MoveResult::default()
                },
            ),
        ]
        .into_iter()
        .collect();
        (king, rook, set)
    }

    #[test]
    fn flattened_views() {
        let (_, _, set) = sample();
        assert_eq!(set.len(), 2);
        assert_eq!(set.all_capture(), vec![sq("a7")]);
        assert_eq!(set.all_defend(), vec![sq("e2")]);
        assert_eq!(set.all_pins(), vec![sq("a7")]);
        let valid = set.all_valid();
        assert_eq!(valid.len(), 4);
        assert!(valid.contains(&sq("a7")));
        assert!(valid.contains(&sq("f1")));
        assert_eq!(set.all_attack().len(), 4);
    }

    #[test]
    fn king_and_pin_lookup() {
        let (king, rook, set) = sample();
        assert_eq!(set.king().map(|(p, _)| *p), Some(king));
        assert_eq!(set.lookup_pin(sq("a7")), Some(&rook));
        assert_eq!(set.lookup_pin(sq("a2")), None);
        assert_eq!(set.capturers_of(sq("a7")), vec![rook]);
        assert_eq!(set.at(sq("a1")).map(|(p, _)| *p), Some(rook));
    }

    #[test]
    fn retain_valid_touches_only_movable_buckets() {
        let (_, rook, mut set) = sample();
        let result = set.get_mut(&rook).unwrap();
        result.retain_valid(|p| *p == sq("a7"));
        assert!(result.passive.is_empty());
        assert_eq!(result.capture, vec![sq("a7")]);
        assert_eq!(result.attack.len(), 2);
    }

    #[test]
    fn clear_where_empties_results() {
        let (king, rook, mut set) = sample();
        set.clear_where(|p| *p != king);
        assert!(!set.get(&rook).unwrap().has_moves());
        assert!(set.get(&king).unwrap().has_valid());
        assert!(set.has_valid());

        set.clear_where(|_| true);
        assert!(!set.has_valid());
        assert_eq!(set.len(), 2);
    }
}
