// Search:
// - Depth-limited minimax with alpha-beta pruning up to a fixed horizon
// - Successors ordered by their one-ply utility before recursing
// - Per-(board, side, depth) cache owned by the engine, one engine per game
// - A side with no legal move loses at the depth it is stuck
// - Optional deadline; an aborted search returns an error and caches nothing

use crate::board::{Board, Side};
use crate::error::{CheckersError, CheckersResult};
use crate::eval::{is_game_over, loss_for, utility};
use crate::movegen::generate_successors;
use crate::transposition::{NodeType, ProbeResult, TranspositionTable};
use crate::zobrist::Zobrist;
use std::cmp::Reverse;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_HORIZON: u32 = 10;
pub const DEFAULT_CACHE_BUCKETS: usize = 1 << 16;
const INF: i32 = 10_000_000;

// =====================
// Configuration
// =====================

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Plies searched below the root.
    pub horizon: u32,
    /// Cache buckets, rounded up to a power of two.
    pub cache_buckets: usize,
    /// Wall-clock limit for one `select_move` call.
    pub deadline: Option<Duration>,
    /// Seed for the cache hash keys.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            horizon: DEFAULT_HORIZON,
            cache_buckets: DEFAULT_CACHE_BUCKETS,
            deadline: None,
            seed: 2024,
        }
    }
}

impl SearchConfig {
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }
    pub fn with_cache_buckets(mut self, buckets: usize) -> Self {
        self.cache_buckets = buckets;
        self
    }
    pub fn with_cache_mb(mut self, size_mb: usize) -> Self {
        self.cache_buckets = TranspositionTable::buckets_for_mb(size_mb);
        self
    }
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

// =====================
// Results
// =====================

#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub cache_hits: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Chosen successor; `None` when the root is terminal or the side to move is stuck.
    pub best: Option<Board>,
    /// Minimax value from black's point of view.
    pub score: i32,
    pub stats: SearchStats,
}

struct SearchInfo {
    nodes: u64,
    cutoffs: u64,
    cache_hits: u64,
    start: Instant,
    deadline: Option<Duration>,
    aborted: bool,
}

impl SearchInfo {
    fn new(deadline: Option<Duration>) -> Self {
        SearchInfo {
            nodes: 0,
            cutoffs: 0,
            cache_hits: 0,
            start: Instant::now(),
            deadline,
            aborted: false,
        }
    }

    fn out_of_time(&mut self) -> bool {
        if let Some(limit) = self.deadline {
            if self.start.elapsed() >= limit {
                self.aborted = true;
            }
        }
        self.aborted
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            nodes: self.nodes,
            cutoffs: self.cutoffs,
            cache_hits: self.cache_hits,
            elapsed: self.start.elapsed(),
        }
    }
}

// =====================
// Engine
// =====================

/// Move selection for one game session. The cache lives as long as the engine;
/// call `new_game` before reusing the engine for an unrelated game.
pub struct SearchEngine {
    config: SearchConfig,
    tt: TranspositionTable,
    zob: Zobrist,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        SearchEngine {
            tt: TranspositionTable::new_buckets(config.cache_buckets),
            zob: Zobrist::with_seed(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.zob.reset_stats();
        debug!(buckets = self.tt.capacity(), "search cache cleared");
    }

    /// Best successor for `side` and its value.
    ///
    /// A terminal root, or a root where `side` cannot move, yields `best: None`
    /// with the corresponding win/loss value.
    pub fn select_move(&mut self, board: &Board, side: Side) -> CheckersResult<SearchResult> {
        self.tt.new_search();
        let mut info = SearchInfo::new(self.config.deadline);
        let (best, score) = self.minimax(board, side, 0, -INF, INF, &mut info);

        if info.aborted {
            warn!(nodes = info.nodes, elapsed = ?info.start.elapsed(), "search aborted at deadline");
            return Err(CheckersError::SearchAborted { nodes: info.nodes });
        }

        let stats = info.stats();
        debug!(
            %side,
            score,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            cache_hits = stats.cache_hits,
            hash_calls = self.zob.stats().hash_calls,
            elapsed = ?stats.elapsed,
            "{}",
            self.tt.stats()
        );
        Ok(SearchResult { best, score, stats })
    }

    fn minimax(
        &mut self,
        board: &Board,
        side: Side,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        info: &mut SearchInfo,
    ) -> (Option<Board>, i32) {
        if info.out_of_time() {
            return (None, 0);
        }
        info.nodes += 1;

        if is_game_over(board) || depth >= self.config.horizon {
            return (None, utility(board, depth));
        }

        // the root is never cached
        let key = if depth > 0 {
            let key = self.zob.position_key(board, side, depth);
            if let ProbeResult::Usable(value, best) =
                self.tt.probe(key, board, side, depth, alpha, beta)
            {
                info.cache_hits += 1;
                return (best, value);
            }
            Some(key)
        } else {
            None
        };

        let mut successors = generate_successors(board, side);
        if successors.is_empty() {
            return (None, loss_for(side, depth));
        }

        let maximizing = side.is_maximizer();
        if maximizing {
            successors.sort_by_cached_key(|s| Reverse(utility(s, depth)));
        } else {
            successors.sort_by_cached_key(|s| utility(s, depth));
        }

        let (alpha0, beta0) = (alpha, beta);
        let mut value = if maximizing { i32::MIN } else { i32::MAX };
        let mut best = None;

        for succ in successors {
            let (_, child) = self.minimax(&succ, side.opponent(), depth + 1, alpha, beta, info);
            if info.aborted {
                return (None, 0);
            }
            if maximizing {
                if child > value {
                    value = child;
                    best = Some(succ);
                }
                alpha = alpha.max(value);
            } else {
                if child < value {
                    value = child;
                    best = Some(succ);
                }
                beta = beta.min(value);
            }
            if alpha >= beta {
                info.cutoffs += 1;
                break;
            }
        }

        if let Some(key) = key {
            let node = NodeType::classify(value, alpha0, beta0);
            let remaining = self.config.horizon - depth;
            self.tt
                .store(key, board, side, depth, remaining, value, node, best.clone());
        }

        (best, value)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new(SearchConfig::default())
    }
}
