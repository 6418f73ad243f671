// Features:
// - Seeded 64-bit keys per (square, piece kind), one side-to-move key
// - Per-depth keys so the same board at different search depths lands in
//   different cache slots
// - Deterministic for a given seed
// - Call statistics

use crate::board::{Board, Piece, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Depths beyond this share the last depth key.
pub const MAX_KEYED_DEPTH: usize = 64;

// =====================
// Core Zobrist Structure
// =====================

#[derive(Clone)]
pub struct Zobrist {
    // Piece placement keys: [square][piece kind]
    pub pieces: [[u64; 4]; 64],

    // XOR-ed in when black is to move
    pub side: u64,

    // Search depth keys
    pub depth: [u64; MAX_KEYED_DEPTH],

    stats: ZobristStats,
}

#[derive(Clone, Debug, Default)]
pub struct ZobristStats {
    pub hash_calls: u64,
}

impl Zobrist {
    /// Create a new Zobrist instance with the default seed
    pub fn new() -> Self {
        Self::with_seed(2024)
    }

    /// Create a new Zobrist instance with a custom seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut pieces = [[0u64; 4]; 64];
        for sq in pieces.iter_mut() {
            for key in sq.iter_mut() {
                *key = rng.r#gen();
            }
        }

        let mut depth = [0u64; MAX_KEYED_DEPTH];
        for key in depth.iter_mut() {
            *key = rng.r#gen();
        }

        let side = rng.r#gen();

        Self {
            pieces,
            side,
            depth,
            stats: ZobristStats::default(),
        }
    }

    /// Piece kind index (0-3), `None` for an empty cell
    pub fn piece_index(piece: Piece) -> Option<usize> {
        match piece {
            Piece::RedMan => Some(0),
            Piece::RedKing => Some(1),
            Piece::BlackMan => Some(2),
            Piece::BlackKing => Some(3),
            Piece::Empty => None,
        }
    }

    // =====================
    // Hashing
    // =====================

    /// Hash of the piece placement only
    pub fn hash_board(&mut self, board: &Board) -> u64 {
        self.stats.hash_calls += 1;
        self.hash_board_quiet(board)
    }

    /// Compute hash without updating statistics
    pub fn hash_board_quiet(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for (sq, &piece) in board.cells().iter().enumerate() {
            if let Some(idx) = Self::piece_index(piece) {
                h ^= self.pieces[sq][idx];
            }
        }
        h
    }

    /// Cache key for `board` searched with `side` to move at `depth`
    pub fn position_key(&mut self, board: &Board, side: Side, depth: u32) -> u64 {
        let mut h = self.hash_board(board);
        if side == Side::Black {
            h = self.toggle_side(h);
        }
        let d = (depth as usize).min(MAX_KEYED_DEPTH - 1);
        h ^ self.depth[d]
    }

    pub fn toggle_side(&self, current_hash: u64) -> u64 {
        current_hash ^ self.side
    }

    pub fn stats(&self) -> &ZobristStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ZobristStats::default();
    }
}

impl Default for Zobrist {
    fn default() -> Self {
        Self::new()
    }
}

// =====================
// Tests
// =====================
