//! Remaining-clock to search-depth policy
//!
//! The search has no cancellation; time is honoured by choosing the depth
//! up front. A clock below the low-time threshold costs one ply.

/// Clock information from a `go` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub movetime: Option<u64>,
}

impl Clock {
    /// Milliseconds left for the side to move: `movetime` wins over the
    /// side's own clock
    pub fn remaining_for(&self, side_is_white: bool) -> Option<u64> {
        if let Some(mt) = self.movetime {
            return Some(mt);
        }
        if side_is_white {
            self.wtime
        } else {
            self.btime
        }
    }
}

/// Depth to search given the requested depth and the remaining clock
pub fn effective_depth(requested: u8, remaining_ms: Option<u64>, low_time_ms: u64) -> u8 {
    let requested = requested.max(1);
    match remaining_ms {
        Some(ms) if ms < low_time_ms => requested.saturating_sub(1).max(1),
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_clock_costs_one_ply() {
        assert_eq!(effective_depth(4, None, 10_000), 4);
        assert_eq!(effective_depth(4, Some(60_000), 10_000), 4);
        assert_eq!(effective_depth(4, Some(10_000), 10_000), 4);
        assert_eq!(effective_depth(4, Some(9_999), 10_000), 3);
        assert_eq!(effective_depth(1, Some(5), 10_000), 1);
        assert_eq!(effective_depth(0, None, 10_000), 1);
    }

    #[test]
    fn clock_picks_side_or_movetime() {
        let clock = Clock {
            wtime: Some(1_000),
            btime: Some(2_000),
            movetime: None,
        };
        assert_eq!(clock.remaining_for(true), Some(1_000));
        assert_eq!(clock.remaining_for(false), Some(2_000));
        let fixed = Clock {
            movetime: Some(500),
            ..clock
        };
        assert_eq!(fixed.remaining_for(false), Some(500));
        assert_eq!(Clock::default().remaining_for(true), None);
    }
}
