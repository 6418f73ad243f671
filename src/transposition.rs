//! Search cache for the checkers engine.
//!
//! Features:
//! - Fixed bucket count (power of two), sized directly or approximately in MB,
//!   so memory stays bounded over a long game
//! - Direct-mapped by a Zobrist key of (board, side to move, depth). A hit also
//!   requires the stored board, side and depth to match exactly, so hash
//!   collisions never return a foreign result.
//! - Replacement policy: prefer entries with more remaining depth, break ties
//!   by age (entries from older searches are replaced first), then by bound type.
//! - Node types: Exact, LowerBound, UpperBound, relative to the alpha-beta window
//!   the value was computed in.
//! - Stats: probes, hits, stores.
//!
//! Usage:
//! - One table per game session, owned by the `SearchEngine`.
//! - On each new root search call `tt.new_search()` to advance the age stamp.
//! - On each node: `tt.probe(key, board, side, depth, alpha, beta)`.
//! - After searching the node: `tt.store(...)` unless the search was aborted.

use crate::board::{Board, Side};

/// The kind of value stored in an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// Exact minimax value
    Exact,
    /// Search failed high; true value >= stored value
    LowerBound,
    /// Search failed low; true value <= stored value
    UpperBound,
}

impl NodeType {
    /// Classify `value` against the window it was searched with.
    pub fn classify(value: i32, alpha: i32, beta: i32) -> NodeType {
        if value <= alpha {
            NodeType::UpperBound
        } else if value >= beta {
            NodeType::LowerBound
        } else {
            NodeType::Exact
        }
    }
}

#[derive(Clone, Debug)]
pub struct TTEntry {
    pub key: u64,
    pub board: Board,
    pub side: Side,
    /// Plies from the search root.
    pub depth: u32,
    /// Plies left to the horizon when the entry was written.
    pub remaining: u32,
    pub value: i32,
    pub node: NodeType,
    pub age: u8,
    pub best: Option<Board>,
}

impl TTEntry {
    fn matches(&self, key: u64, board: &Board, side: Side, depth: u32) -> bool {
        self.key == key && self.depth == depth && self.side == side && self.board == *board
    }
}

/// Result of probing the table.
#[derive(Clone, Debug)]
pub enum ProbeResult {
    /// No entry for this position, or its bound does not decide the current window.
    Miss,
    /// Value that can be returned right away, with the move that produced it.
    Usable(i32, Option<Board>),
}

pub struct TranspositionTable {
    buckets: Vec<Option<TTEntry>>,
    mask: usize, // index mask (buckets.len() - 1)
    pub age: u8,

    // Stats
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

impl TranspositionTable {
    /// Largest power-of-two bucket count that fits in `size_mb` megabytes.
    pub fn buckets_for_mb(size_mb: usize) -> usize {
        let bytes_per_entry = std::mem::size_of::<Option<TTEntry>>();
        let mut buckets = size_mb.saturating_mul(1024 * 1024) / bytes_per_entry;
        if buckets == 0 {
            buckets = 1;
        }
        // round down to power-of-two
        let pow = usize::BITS - buckets.leading_zeros() - 1;
        1usize << pow
    }

    /// Create a table with `buckets` entries, rounded up to a power of two.
    pub fn new_buckets(buckets: usize) -> Self {
        let count = buckets.max(1).next_power_of_two();
        TranspositionTable {
            buckets: vec![None; count],
            mask: count - 1,
            age: 1,
            probes: 0,
            hits: 0,
            stores: 0,
        }
    }

    #[inline]
    fn index_of(&self, key: u64) -> usize {
        // xor-fold to reduce clustering
        let folded = key ^ (key >> 32) ^ (key >> 16);
        (folded as usize) & self.mask
    }

    /// Advance the age stamp at the start of a root search.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    /// Look up the result for `board` with `side` to move at `depth`.
    ///
    /// Exact entries are always usable. A lower bound is usable when it is
    /// already >= beta, an upper bound when it is already <= alpha.
    pub fn probe(
        &mut self,
        key: u64,
        board: &Board,
        side: Side,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> ProbeResult {
        self.probes = self.probes.wrapping_add(1);
        let idx = self.index_of(key);
        let Some(entry) = &self.buckets[idx] else {
            return ProbeResult::Miss;
        };
        if !entry.matches(key, board, side, depth) {
            return ProbeResult::Miss;
        }
        self.hits = self.hits.wrapping_add(1);

        let usable = match entry.node {
            NodeType::Exact => true,
            NodeType::LowerBound => entry.value >= beta,
            NodeType::UpperBound => entry.value <= alpha,
        };
        if usable {
            ProbeResult::Usable(entry.value, entry.best.clone())
        } else {
            ProbeResult::Miss
        }
    }

    /// Store a searched node, subject to the replacement policy:
    /// - empty slot, or the same position -> write
    /// - more remaining depth than the occupant -> replace
    /// - equal remaining depth -> replace an older entry, otherwise prefer
    ///   Exact > LowerBound > UpperBound
    /// - less remaining depth -> replace only an entry from an older search
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        board: &Board,
        side: Side,
        depth: u32,
        remaining: u32,
        value: i32,
        node: NodeType,
        best: Option<Board>,
    ) {
        self.stores = self.stores.wrapping_add(1);
        let idx = self.index_of(key);

        let replace = match &self.buckets[idx] {
            None => true,
            Some(old) if old.matches(key, board, side, depth) => true,
            Some(old) if remaining > old.remaining => true,
            Some(old) if remaining == old.remaining => {
                if old.age != self.age {
                    true
                } else {
                    match (node, old.node) {
                        (NodeType::Exact, _) => true,
                        (NodeType::LowerBound, NodeType::UpperBound) => true,
                        (_, _) => false,
                    }
                }
            }
            Some(old) => old.age != self.age,
        };

        if replace {
            self.buckets[idx] = Some(TTEntry {
                key,
                board: board.clone(),
                side,
                depth,
                remaining,
                value,
                node,
                age: self.age,
                best,
            });
        }
    }

    /// Drop every entry and reset the stats.
    pub fn clear(&mut self) {
        for e in self.buckets.iter_mut() {
            *e = None;
        }
        self.age = 1;
        self.probes = 0;
        self.hits = 0;
        self.stores = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of occupied buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|e| e.is_none())
    }

    /// Return stats snapshot as a human-readable string.
    pub fn stats(&self) -> String {
        format!(
            "TT: buckets={} probes={} hits={} stores={} hit_rate={:.2}%",
            self.buckets.len(),
            self.probes,
            self.hits,
            self.stores,
            if self.probes == 0 {
                0.0
            } else {
                (self.hits as f64 / self.probes as f64) * 100.0
            }
        )
    }
}
