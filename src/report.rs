use serde::Serialize;

use crate::engine::coord::Move;
use crate::engine::game::Game;
use crate::engine::types::Castle;

// ---------------------------------------------------------------------------
// Report models
// ---------------------------------------------------------------------------

/// Snapshot of a game's current position, as printed by the CLI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub fen: String,
    pub start_fen: String,
    pub to_move: String,
    pub status: String,
    pub check: bool,
    pub turn: u32,
    pub half_move_clock: u32,
    pub castling: String,
    pub legal_moves: Vec<String>,
    pub move_history: Vec<MoveHistoryEntry>,
    pub history: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveHistoryEntry {
    pub from: String,
    pub to: String,
    pub takes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub castle: Option<String>,
    pub status: String,
    pub fen: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn castle_name(castle: Castle) -> Option<String> {
    match castle {
        Castle::None => None,
        Castle::Short => Some("short".into()),
        Castle::Long => Some("long".into()),
    }
}

fn coordinate(mv: &Move) -> String {
    mv.to_string()
}

impl PositionReport {
    pub fn from_game(game: &Game) -> Self {
        let board = game.board();

        let mut legal_moves: Vec<String> = game.legal_moves().iter().map(coordinate).collect();
        legal_moves.sort();

        let move_history = game
            .move_history()
            .iter()
            .map(|record| MoveHistoryEntry {
                from: record.mv.start.to_algebraic(),
                to: record.mv.end.to_algebraic(),
                takes: record.mv.takes,
                castle: castle_name(record.mv.castle),
                status: record.status_after.to_string(),
                fen: record.fen_after.clone(),
            })
            .collect();

        PositionReport {
            fen: game.to_fen(),
            start_fen: game.starting_fen().to_string(),
            to_move: board.to_move().to_string(),
            status: game.status().to_string(),
            check: board.is_check(),
            turn: board.turn(),
            half_move_clock: board.half_move_clock(),
            castling: board.castle_rights().to_fen(),
            legal_moves,
            move_history,
            history: board.history().to_vec(),
        }
    }

    /// Serialise to JSON, optionally pretty-printed.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
