pub mod board;
pub mod castling;
pub mod coord;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod piece;
pub mod result;
pub mod types;

pub use board::{Board, START_FEN};
pub use coord::{Move, Position, Vector};
pub use game::{Game, MoveRecord, parse_coordinate_move};
pub use movegen::{MoveGenerator, MoveSignal, legal_move_list, legal_moves_from};
pub use piece::Piece;
pub use result::{MoveKind, MoveResult, ResultSet};
pub use types::*;
