use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grid row of this side's back rank.
    #[inline]
    pub const fn back_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Grid row every pawn of this side starts on.
    #[inline]
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// FEN side-to-move letter.
    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Knight,
    Bishop,
    Pawn,
}

impl PieceKind {
    /// All piece kinds in FEN letter order `KQRNBP`.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Pawn,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Pawn => 'p',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN piece letter; the case selects the colour.
    pub fn from_char(c: char) -> Option<(Color, PieceKind)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((color, kind))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::King => write!(f, "king"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Pawn => write!(f, "pawn"),
        }
    }
}

// ---------------------------------------------------------------------------
// Castle
// ---------------------------------------------------------------------------

/// Castling annotation carried by a king move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Castle {
    #[default]
    None,
    Short,
    Long,
}

impl Castle {
    /// File of the rook that takes part in this castle.
    pub fn rook_file(self) -> Option<i8> {
        match self {
            Castle::None => None,
            Castle::Short => Some(7),
            Castle::Long => Some(0),
        }
    }

    /// File the rook lands on after castling.
    pub fn rook_target_file(self) -> Option<i8> {
        match self {
            Castle::None => None,
            Castle::Short => Some(5),
            Castle::Long => Some(3),
        }
    }

    /// File the king lands on after castling.
    pub fn king_target_file(self) -> Option<i8> {
        match self {
            Castle::None => None,
            Castle::Short => Some(6),
            Castle::Long => Some(2),
        }
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability flags in FEN order: white-K, white-Q, black-k, black-q.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub [bool; 4]);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights([false; 4]);
    pub const ALL: CastlingRights = CastlingRights([true; 4]);

    const LETTERS: [char; 4] = ['K', 'Q', 'k', 'q'];

    #[inline]
    fn slot(color: Color, side: Castle) -> Option<usize> {
        match side {
            Castle::None => None,
            Castle::Short => Some(color.index() * 2),
            Castle::Long => Some(color.index() * 2 + 1),
        }
    }

    /// Does `color` still hold the right for `side`?
    #[inline]
    pub fn has(self, color: Color, side: Castle) -> bool {
        Self::slot(color, side).is_some_and(|i| self.0[i])
    }

    /// Drop a single right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: Castle) {
        if let Some(i) = Self::slot(color, side) {
            self.0[i] = false;
        }
    }

    /// Drop both rights of one side.
    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.remove(color, Castle::Short);
        self.remove(color, Castle::Long);
    }

    /// Does `color` hold either right?
    #[inline]
    pub fn any(self, color: Color) -> bool {
        self.has(color, Castle::Short) || self.has(color, Castle::Long)
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        if s.is_empty() {
            return None;
        }
        // Letters must appear at most once and in `KQkq` order.
        let mut rights = CastlingRights::NONE;
        let mut next = 0;
        for c in s.chars() {
            let i = next + Self::LETTERS[next..].iter().position(|&l| l == c)?;
            rights.0[i] = true;
            next = i + 1;
        }
        Some(rights)
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        let s: String = Self::LETTERS
            .iter()
            .zip(self.0)
            .filter(|&(_, held)| held)
            .map(|(&c, _)| c)
            .collect();
        if s.is_empty() { "-".to_string() } else { s }
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// Termination & GameStatus
// ---------------------------------------------------------------------------

/// Outcome of the position for the side to move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Termination {
    #[default]
    Continuing,
    Mate,
    Stalemate,
}

/// Current status of a game, as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid coordinate: {0}")]
    InvalidFormat(String),

    #[error("invalid vector ({i}, {j}): components must lie in -7..=7")]
    InvalidVector { i: i16, j: i16 },

    #[error("invalid piece: {0}")]
    InvalidPiece(String),

    #[error("invalid move: {start} -> {end}: {reason}")]
    InvalidMove {
        start: String,
        end: String,
        reason: String,
    },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
