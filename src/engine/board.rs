//! Board orchestrator and move executor.
//!
//! `Board` owns the two piece lists plus turn, clock and castling state.
//! Everything else (location maps, checking pieces, legal moves, termination)
//! is derived and rebuilt by `calculate()` after every mutation, so read-only
//! queries are answered from that cache until the next move.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::engine::castling;
use crate::engine::coord::{Move, Position};
use crate::engine::legality;
use crate::engine::movegen::{self, MoveGenerator};
use crate::engine::piece::Piece;
use crate::engine::result::ResultSet;
use crate::engine::types::{Castle, CastlingRights, ChessError, Color, PieceKind, Termination};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A chess position together with its derived move data.
#[derive(Clone, Debug)]
pub struct Board {
    white: Vec<Piece>,
    black: Vec<Piece>,
    to_move: Color,
    castle_rights: CastlingRights,
    half_move_clock: u32,
    full_move_number: u32,

    // Derived in `calculate()`.
    loc_map: HashMap<Position, Piece>,
    piece_map: HashMap<Piece, Position>,
    attackers_of_king: Vec<Piece>,
    legal_moves: ResultSet,
    termination: Termination,

    history: Vec<String>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Board {
    fn with_pieces(
        white: Vec<Piece>,
        black: Vec<Piece>,
        to_move: Color,
        castle_rights: CastlingRights,
        half_move_clock: u32,
        full_move_number: u32,
    ) -> Self {
        let mut board = Board {
            white,
            black,
            to_move,
            castle_rights,
            half_move_clock,
            full_move_number,
            loc_map: HashMap::new(),
            piece_map: HashMap::new(),
            attackers_of_king: Vec::new(),
            legal_moves: ResultSet::new(),
            termination: Termination::Continuing,
            history: Vec::new(),
        };
        board.calculate();
        board
    }

    /// The standard starting position.
    pub fn starting() -> Self {
        let mut white = Vec::with_capacity(16);
        let mut black = Vec::with_capacity(16);
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let j = file as i8;
            white.push(Piece::new(kind, Color::White, Position::from_const(0, j)));
            white.push(Piece::new(PieceKind::Pawn, Color::White, Position::from_const(1, j)));
            black.push(Piece::new(kind, Color::Black, Position::from_const(7, j)));
            black.push(Piece::new(PieceKind::Pawn, Color::Black, Position::from_const(6, j)));
        }
        let mut board = Board::with_pieces(white, black, Color::White, CastlingRights::ALL, 0, 1);
        board.history.push(board.to_fen());
        board
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    /// Rebuild every derived field from the piece lists.
    fn calculate(&mut self) {
        self.loc_map = self
            .white
            .iter()
            .chain(self.black.iter())
            .filter(|p| p.active)
            .map(|p| (p.position, *p))
            .collect();
        self.piece_map = self.loc_map.iter().map(|(pos, p)| (*p, *pos)).collect();

        let mover = self.to_move;
        self.attackers_of_king = self.attackers_of(mover);
        let in_check = !self.attackers_of_king.is_empty();

        let own = self.pieces(mover);
        let opponents = self.pieces(!mover);
        let mut legal =
            legality::legal_results(&self.loc_map, own, opponents, &self.attackers_of_king);

        let castles =
            castling::castling_moves(&self.loc_map, mover, self.castle_rights, in_check, opponents);
        if !castles.is_empty()
            && let Some((_, king)) = legal.king_mut()
        {
            king.passive.extend(castles.into_iter().map(|(_, dest)| dest));
        }

        self.termination = if legal.has_valid() {
            Termination::Continuing
        } else if in_check {
            Termination::Mate
        } else {
            Termination::Stalemate
        };
        self.legal_moves = legal;

        debug!(
            to_move = %mover,
            attackers = self.attackers_of_king.len(),
            termination = ?self.termination,
            "position calculated"
        );
    }

    /// Opponent pieces whose capture list holds `color`'s king square.
    fn attackers_of(&self, color: Color) -> Vec<Piece> {
        let Some(king) = self.king(color) else {
            return Vec::new();
        };
        MoveGenerator::new(&self.loc_map)
            .pseudolegal(self.pieces(!color))
            .capturers_of(king.position)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All pieces of `color`, captured ones included.
    pub fn pieces(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn pieces_mut(&mut self, color: Color) -> &mut Vec<Piece> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// The active king of `color`.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces(color).iter().find(|p| p.active && p.is_king())
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.loc_map.get(&pos)
    }

    pub fn loc_map(&self) -> &HashMap<Position, Piece> {
        &self.loc_map
    }

    pub fn piece_map(&self) -> &HashMap<Piece, Position> {
        &self.piece_map
    }

    /// Side to make the next move.
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Full-move number; increments after Black moves.
    pub fn turn(&self) -> u32 {
        self.full_move_number
    }

    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    pub fn castle_rights(&self) -> CastlingRights {
        self.castle_rights
    }

    /// Pieces giving check to the side to move.
    pub fn attackers(&self) -> &[Piece] {
        &self.attackers_of_king
    }

    pub fn is_check(&self) -> bool {
        !self.attackers_of_king.is_empty()
    }

    pub fn is_mate(&self) -> bool {
        self.termination == Termination::Mate
    }

    pub fn is_stale(&self) -> bool {
        self.termination == Termination::Stalemate
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Legal results for the side to move.
    pub fn legal_results(&self) -> &ResultSet {
        &self.legal_moves
    }

    /// Legal results for either side. The side not to move is evaluated as if
    /// it were its turn; castling is only offered to the side to move.
    pub fn legal_moves_for(&self, color: Color) -> ResultSet {
        if color == self.to_move {
            return self.legal_moves.clone();
        }
        let attackers = self.attackers_of(color);
        legality::legal_results(&self.loc_map, self.pieces(color), self.pieces(!color), &attackers)
    }

    /// Legal moves for the side to move as executable `Move` values.
    pub fn legal_move_list(&self) -> Vec<Move> {
        movegen::legal_move_list(self)
    }

    /// FEN snapshots: the starting FEN followed by one per executed move.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    // -----------------------------------------------------------------------
    // Move execution
    // -----------------------------------------------------------------------

    /// Apply `mv` and recompute the position.
    ///
    /// The move's `takes` and `castle` flags are trusted; only the board
    /// state they refer to is checked. Legality is the caller's concern.
    pub fn make_move(&mut self, mv: Move) -> Result<&mut Self, ChessError> {
        let reject = |reason: &str| {
            warn!(%mv, reason, "move rejected");
            ChessError::InvalidMove {
                start: mv.start.to_algebraic(),
                end: mv.end.to_algebraic(),
                reason: reason.to_string(),
            }
        };

        let Some(&mover) = self.loc_map.get(&mv.start) else {
            return Err(reject("no piece on start square"));
        };
        let color = mover.color;

        // Looked up before the mover is relocated onto the same square.
        let captured = if mv.takes {
            match self.loc_map.get(&mv.end) {
                Some(target) if target.color != color => Some(*target),
                Some(_) => return Err(reject("cannot capture own piece")),
                None => return Err(reject("nothing to capture on end square")),
            }
        } else if self.loc_map.contains_key(&mv.end) {
            return Err(reject("end square is occupied"));
        } else {
            None
        };

        let rook_move = match mv.castle {
            Castle::None => None,
            side => {
                let home = castling::rook_home(color, side);
                let target = castling::rook_target(color, side);
                match (home, target) {
                    (Some(home), Some(target))
                        if self
                            .loc_map
                            .get(&home)
                            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color) =>
                    {
                        Some((home, target))
                    }
                    _ => return Err(reject("no rook available to castle with")),
                }
            }
        };

        if let Some(piece) = self.pieces_mut(color).iter_mut().find(|p| **p == mover) {
            piece.position = mv.end;
        }

        if let Some((home, target)) = rook_move {
            if let Some(rook) = self
                .pieces_mut(color)
                .iter_mut()
                .find(|p| p.active && p.position == home && p.kind == PieceKind::Rook)
            {
                rook.position = target;
            }
            self.castle_rights.clear(color);
            debug!(%color, side = ?mv.castle, rook_from = %home, rook_to = %target, "castled");
        }

        if let Some(target) = captured
            && let Some(piece) = self.pieces_mut(!color).iter_mut().find(|p| **p == target)
        {
            piece.capture();
        }

        self.update_castle_rights(&mover, mv.start, captured.as_ref());

        if mover.is_pawn() || captured.is_some() {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock += 1;
        }
        if color == Color::Black {
            self.full_move_number += 1;
        }
        self.to_move = !self.to_move;

        self.calculate();
        self.history.push(self.to_fen());
        Ok(self)
    }

    /// Restore the position before the last executed move from its FEN
    /// snapshot, dropping that move from history.
    pub fn rewind(&mut self) -> Result<(), ChessError> {
        let previous = self
            .history
            .len()
            .checked_sub(2)
            .and_then(|idx| self.history.get(idx))
            .ok_or(ChessError::NothingToUndo)?;
        let mut restored = Board::from_fen(previous)?;
        restored.history = self.history[..self.history.len() - 1].to_vec();
        *self = restored;
        Ok(())
    }

    /// Drop rights made unusable by a king or rook leaving home, or a rook
    /// being captured on its corner.
    fn update_castle_rights(&mut self, mover: &Piece, from: Position, captured: Option<&Piece>) {
        if mover.is_king() {
            self.castle_rights.clear(mover.color);
        }
        if mover.kind == PieceKind::Rook
            && let Some(side) = corner_side(mover.color, from)
        {
            self.castle_rights.remove(mover.color, side);
        }
        if let Some(victim) = captured
            && victim.kind == PieceKind::Rook
            && let Some(side) = corner_side(victim.color, victim.position)
        {
            self.castle_rights.remove(victim.color, side);
        }
    }
}

/// Which wing's rook starts on `pos` for `color`.
fn corner_side(color: Color, pos: Position) -> Option<Castle> {
    [Castle::Short, Castle::Long]
        .into_iter()
        .find(|&side| castling::rook_home(color, side) == Some(pos))
}

/// Positions compare by placement and game state; history is ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.loc_map == other.loc_map
            && self.to_move == other.to_move
            && self.castle_rights == other.castle_rights
            && self.half_move_clock == other.half_move_clock
            && self.full_move_number == other.full_move_number
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Board {
    /// Parse a FEN string into a `Board`.
    ///
    /// The en-passant field is checked for shape and otherwise ignored.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut white = Vec::new();
        let mut black = Vec::new();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let i = 7 - rank_idx as i8;
            let mut j: i8 = 0;
            for ch in rank_str.chars() {
                if j > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        i + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            i + 1
                        )));
                    }
                    j += digit as i8;
                } else {
                    let pos = Position::new(i, j).map_err(|e| ChessError::InvalidFen(e.to_string()))?;
                    let piece = Piece::from_char(ch, pos).map_err(|_| {
                        ChessError::InvalidFen(format!("invalid character '{ch}' in piece placement"))
                    })?;
                    match piece.color {
                        Color::White => white.push(piece),
                        Color::Black => black.push(piece),
                    }
                    j += 1;
                }
            }
            if j != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    i + 1,
                    j
                )));
            }
        }

        for (color, pieces) in [(Color::White, &white), (Color::Black, &black)] {
            let king_count = pieces.iter().filter(|p| p.is_king()).count();
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        let to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        let castle_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant (not tracked) -----
        if fields[3] != "-" {
            Position::from_algebraic(fields[3]).map_err(|_| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
        }

        // ----- Fields 5 & 6: Clocks -----
        let half_move_clock = fields[4].parse::<u32>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;
        let full_move_number = fields[5].parse::<u32>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if full_move_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        let mut board = Board::with_pieces(
            white,
            black,
            to_move,
            castle_rights,
            half_move_clock,
            full_move_number,
        );

        if !board.attackers_of(!to_move).is_empty() {
            return Err(ChessError::InvalidFen(format!(
                "{} is in check but it is {to_move} to move",
                !to_move
            )));
        }

        board.history.push(board.to_fen());
        debug!(fen = %board.history[0], "board loaded from FEN");
        Ok(board)
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for i in (0..8).rev() {
            let mut empty_count = 0u8;
            for j in 0..8 {
                match self.loc_map.get(&Position::from_const(i, j)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if i > 0 {
                fen.push('/');
            }
        }

        // ----- Fields 2-6 -----
        fen.push(' ');
        fen.push(self.to_move.fen_char());
        fen.push(' ');
        fen.push_str(&self.castle_rights.to_fen());
        fen.push_str(" - ");
        fen.push_str(&self.half_move_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.full_move_number.to_string());

        fen
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
