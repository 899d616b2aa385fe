//! Occurrence counts of position hashes along the current search line
//!
//! Entries are pushed when a branch is entered and popped when it returns, so
//! the table always describes exactly the game history plus the path from
//! the root to the node being searched.

use std::collections::HashMap;

/// Occurrences (the current one included) at which a position is drawn
pub const THREEFOLD: u32 = 3;

#[derive(Debug, Default, Clone)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a game history
    pub fn seed(&mut self, hashes: &[u64]) {
        self.counts.clear();
        for &h in hashes {
            self.push(h);
        }
    }

    pub fn push(&mut self, hash: u64) {
        *self.counts.entry(hash).or_insert(0) += 1;
    }

    /// Undo one `push` of `hash`
    pub fn pop(&mut self, hash: u64) {
        if let Some(count) = self.counts.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&hash);
            }
        }
    }

    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    /// Has `hash` been recorded often enough to be a threefold repetition
    #[inline]
    pub fn is_threefold(&self, hash: u64) -> bool {
        self.count(hash) >= THREEFOLD
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
