pub mod api;
pub mod board;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod search;
pub mod transposition;
pub mod zobrist;

pub use board::{Board, Coord, Piece, Side};
pub use error::{CheckersError, CheckersResult};
pub use search::{SearchConfig, SearchEngine, SearchResult};
