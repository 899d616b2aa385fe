//! Transposition table indexed by hash modulo table length
//!
//! Collisions overwrite. An entry answers a probe only when its full key
//! matches and its draft is at least the requested depth.

/// Node type for transposition table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    LowerBound,
    UpperBound,
}

/// Single TT entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub score: i32,
    pub depth: u8,
    pub node_type: NodeType,
}

impl TTEntry {
    pub fn new(key: u64, score: i32, depth: u8, node_type: NodeType) -> Self {
        Self {
            key,
            score,
            depth,
            node_type,
        }
    }

    /// Fail-hard cutoff value within (alpha, beta), if this entry decides the node
    pub fn cutoff(&self, alpha: i32, beta: i32) -> Option<i32> {
        match self.node_type {
            NodeType::Exact => Some(self.score.clamp(alpha, beta)),
            NodeType::LowerBound if self.score >= beta => Some(beta),
            NodeType::UpperBound if self.score <= alpha => Some(alpha),
            _ => None,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
}

impl TranspositionTable {
    /// Create a TT with approximately `size_mb` megabytes (at least 1024 slots)
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let slots = ((size_mb * 1024 * 1024) / entry_size).max(1024);
        Self {
            entries: vec![None; slots],
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Entry for `key` searched to at least `depth`
    pub fn probe(&self, key: u64, depth: u8) -> Option<TTEntry> {
        self.entries[self.index(key)].filter(|e| e.key == key && e.depth >= depth)
    }

    /// Always-replace store
    pub fn store(&mut self, key: u64, score: i32, depth: u8, node_type: NodeType) {
        let index = self.index(key);
        self.entries[index] = Some(TTEntry::new(key, score, depth, node_type));
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
        tracing::trace!(slots = self.entries.len(), "transposition table cleared");
    }

    pub fn fill_percentage(&self) -> f64 {
        let filled = self.entries.iter().filter(|e| e.is_some()).count();
        (filled as f64 / self.entries.len() as f64) * 100.0
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_basic_store_probe() {
        let mut tt = TranspositionTable::new(1);
        tt.store(0x1111, 42, 3, NodeType::Exact);

        let entry = tt.probe(0x1111, 3).expect("Entry should exist");
        assert_eq!(entry.score, 42);
        assert_eq!(entry.node_type, NodeType::Exact);

        assert!(tt.probe(0x9999, 0).is_none());
    }

    #[test]
    fn test_tt_shallow_entry_does_not_answer_deeper_probe() {
        let mut tt = TranspositionTable::new(1);
        tt.store(0x5678, 7, 2, NodeType::Exact);
        assert!(tt.probe(0x5678, 1).is_some());
        assert!(tt.probe(0x5678, 2).is_some());
        assert!(tt.probe(0x5678, 3).is_none());
    }

    #[test]
    fn test_tt_collision_overwrites() {
        let mut tt = TranspositionTable::new(1);
        let len = tt.size() as u64;
        tt.store(5, 1, 4, NodeType::Exact);
        tt.store(5 + len, 2, 1, NodeType::Exact);
        // Same slot: the later store wins, even with a shallower draft
        assert!(tt.probe(5, 0).is_none());
        assert_eq!(tt.probe(5 + len, 0).map(|e| e.score), Some(2));
    }

    #[test]
    fn test_tt_clear() {
        let mut tt = TranspositionTable::new(1);
        tt.store(0xABCD, 3, 1, NodeType::Exact);
        assert!(tt.fill_percentage() > 0.0);
        tt.clear();
        assert!(tt.probe(0xABCD, 0).is_none());
        assert_eq!(tt.fill_percentage(), 0.0);
    }

    #[test]
    fn test_bounds_only_cut_outside_window() {
        let lower = TTEntry::new(1, 5, 1, NodeType::LowerBound);
        assert_eq!(lower.cutoff(0, 4), Some(4));
        assert_eq!(lower.cutoff(0, 10), None);

        let upper = TTEntry::new(1, -3, 1, NodeType::UpperBound);
        assert_eq!(upper.cutoff(-2, 4), Some(-2));
        assert_eq!(upper.cutoff(-5, 4), None);

        let exact = TTEntry::new(1, 3, 1, NodeType::Exact);
        assert_eq!(exact.cutoff(-1, 2), Some(2));
        assert_eq!(exact.cutoff(-1, 5), Some(3));
    }
}
