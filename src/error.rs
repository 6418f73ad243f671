//! Error types for the checkers engine.
//!
//! Move generation and search are pure computations; anything that can go wrong
//! at the boundary (bad coordinates, malformed boards, illegal requests) is
//! reported through `CheckersError` instead of a default move.

use crate::board::{Coord, Piece, Side};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckersError {
    /// Coordinate outside the 8x8 board
    #[error("coordinate ({row}, {col}) is off the board")]
    InvalidCoord { row: i32, col: i32 },

    /// No legal successor matches the requested origin/destination pair
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Coord, to: Coord },

    /// The piece named in a move request is not the one on the origin square
    #[error("expected {expected} at {at}, found {found}")]
    PieceMismatch {
        at: Coord,
        expected: Piece,
        found: Piece,
    },

    /// The side to move has nothing to play
    #[error("{side} has no legal moves")]
    NoLegalMoves { side: Side },

    /// One side has no pieces left
    #[error("game is over, {winner} wins")]
    GameOver { winner: Side },

    #[error("board must have 8 rows, got {rows}")]
    BadRowCount { rows: usize },

    #[error("row {row} must have 8 cells, got {len}")]
    BadRowLength { row: usize, len: usize },

    #[error("unknown symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    /// Supplied piece counts disagree with the grid
    #[error("piece counts {given:?} do not match the grid {actual:?} (red men, red kings, black men, black kings)")]
    CountMismatch { given: [u32; 4], actual: [u32; 4] },

    /// A man sitting on its own promotion row
    #[error("uncrowned man on promotion row at {at}")]
    UnpromotedMan { at: Coord },

    /// A zero-ply search never picks a move
    #[error("search horizon must be at least one ply")]
    ZeroHorizon,

    /// Deadline passed before the search finished
    #[error("search aborted after {nodes} nodes")]
    SearchAborted { nodes: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CheckersResult<T> = Result<T, CheckersError>;
