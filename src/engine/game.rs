//! Stateful game controller wrapping `Board`.
//!
//! `Game` gates moves through the legal move list, tracks the resulting
//! status, keeps a record of played moves and undoes them by rewinding the
//! board's FEN history. It is the type the CLI drives.

use tracing::debug;

use crate::engine::board::Board;
use crate::engine::coord::{Move, Position};
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus};

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// The move that was played, with capture/castle flags resolved.
    pub mv: Move,
    /// Position after the move.
    pub fen_after: String,
    /// What game status resulted from this move.
    pub status_after: GameStatus,
}

/// Split a coordinate move like "e2e4" into its two squares.
pub fn parse_coordinate_move(text: &str) -> Result<(Position, Position), ChessError> {
    if !text.is_ascii() || text.len() != 4 {
        return Err(ChessError::InvalidFormat(format!(
            "'{text}' is not a coordinate move like e2e4"
        )));
    }
    let start = Position::from_algebraic(&text[..2])?;
    let end = Position::from_algebraic(&text[2..])?;
    Ok((start, end))
}

// =========================================================================
// Game
// =========================================================================

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    move_history: Vec<MoveRecord>,
    status: GameStatus,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_board(Board::starting())
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::with_board(Board::from_fen(fen)?))
    }

    fn with_board(board: Board) -> Self {
        let status = compute_status(&board);
        Game {
            board,
            move_history: Vec::new(),
            status,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> Color {
        self.board.to_move()
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_move_list()
    }

    pub fn legal_moves_from(&self, sq: Position) -> Vec<Move> {
        movegen::legal_moves_from(&self.board, sq)
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// The FEN the game started from.
    pub fn starting_fen(&self) -> &str {
        self.board
            .history()
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play the legal move from `start` to `end`, returning it with its
    /// capture and castle flags filled in.
    pub fn make_move(&mut self, start: Position, end: Position) -> Result<Move, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(format!(
                "game is over: {}",
                self.status
            )));
        }

        let mv = self
            .legal_moves()
            .into_iter()
            .find(|m| m.start == start && m.end == end)
            .ok_or_else(|| ChessError::InvalidMove {
                start: start.to_algebraic(),
                end: end.to_algebraic(),
                reason: "not a legal move".into(),
            })?;

        self.board.make_move(mv)?;
        self.status = compute_status(&self.board);
        debug!(%mv, status = %self.status, "move played");

        self.move_history.push(MoveRecord {
            mv,
            fen_after: self.board.to_fen(),
            status_after: self.status,
        });
        Ok(mv)
    }

    /// Play a coordinate move such as "e2e4".
    pub fn play(&mut self, text: &str) -> Result<Move, ChessError> {
        let (start, end) = parse_coordinate_move(text)?;
        self.make_move(start, end)
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Undo the last move. Returns the move that was undone.
    pub fn undo_move(&mut self) -> Result<Move, ChessError> {
        let record = self.move_history.last().ok_or(ChessError::NothingToUndo)?;
        let mv = record.mv;
        self.board.rewind()?;
        self.move_history.pop();
        self.status = compute_status(&self.board);
        Ok(mv)
    }

    // -----------------------------------------------------------------
    // Load a new FEN into an existing game (reset).
    // -----------------------------------------------------------------

    /// Load a FEN position, resetting all history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }
}

fn compute_status(board: &Board) -> GameStatus {
    if board.is_mate() {
        GameStatus::Checkmate
    } else if board.is_stale() {
        GameStatus::Stalemate
    } else if board.is_check() {
        GameStatus::Check
    } else {
        GameStatus::Active
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
