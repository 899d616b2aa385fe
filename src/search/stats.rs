//! Search statistics
//!
//! Tracks nodes searched, leaves, capture-search nodes, hash table hits,
//! cutoffs, repetition draws and timing information.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched (root children included)
    pub nodes: u64,

    /// Depth-0 nodes
    pub leaf_nodes: u64,

    /// Nodes visited by the contested-square capture search
    pub capture_nodes: u64,

    /// Transposition table probes that answered the node
    pub tt_hits: u64,

    /// Transposition table stores
    pub tt_stores: u64,

    /// Beta cutoffs
    pub cutoffs: u64,

    /// Nodes scored as draws by repetition
    pub repetition_draws: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    /// Elapsed milliseconds since `start_timing`
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_leaf(&mut self) {
        self.leaf_nodes += 1;
    }

    pub fn inc_capture_node(&mut self) {
        self.capture_nodes += 1;
    }

    pub fn inc_tt_hit(&mut self) {
        self.tt_hits += 1;
    }

    pub fn inc_tt_store(&mut self) {
        self.tt_stores += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn inc_repetition_draw(&mut self) {
        self.repetition_draws += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Log a formatted summary at debug level
    pub fn log_summary(&self) {
        let hit_rate = if self.nodes > 0 {
            (self.tt_hits as f64 / self.nodes as f64) * 100.0
        } else {
            0.0
        };
        tracing::debug!(
            nodes = self.nodes,
            leaves = self.leaf_nodes,
            capture_nodes = self.capture_nodes,
            tt_hits = self.tt_hits,
            tt_hit_pct = format_args!("{:.1}", hit_rate),
            cutoffs = self.cutoffs,
            repetition_draws = self.repetition_draws,
            time_ms = self.search_time.as_millis() as u64,
            nps = self.nps,
            "search statistics"
        );
    }
}
