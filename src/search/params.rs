//! Search parameters and configuration
//!
//! Controls the depth limit, transposition table size, the low-clock depth
//! reduction, leaf capture resolution and the tie-break RNG seed.

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum search depth in plies
    pub max_depth: u8,

    /// Transposition table size in megabytes
    pub tt_size_mb: usize,

    /// Below this remaining clock (ms) the effective depth drops by one
    pub low_time_ms: u64,

    /// Resolve captures on the last contested square at the leaves
    pub capture_search: bool,

    /// Seed for the root tie-break; None draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            tt_size_mb: 16,
            low_time_ms: 10_000,
            capture_search: true,
            seed: None,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies (at least 1)
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set transposition table size in megabytes
    pub fn tt_size_mb(mut self, mb: usize) -> Self {
        self.tt_size_mb = mb;
        self
    }

    /// Set the low-clock threshold in milliseconds
    pub fn low_time_ms(mut self, ms: u64) -> Self {
        self.low_time_ms = ms;
        self
    }

    /// Enable or disable leaf capture resolution
    pub fn capture_search(mut self, enable: bool) -> Self {
        self.capture_search = enable;
        self
    }

    /// Fix the tie-break seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
