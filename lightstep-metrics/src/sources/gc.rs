use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SourceError;

/// Number of collector generations that are reported.
pub const GC_GENERATIONS: usize = 3;

/// Cumulative collection counts, indexed by generation.
pub type GcCounts = [u64; GC_GENERATIONS];

/// Statistics of a garbage collecting runtime embedded in the host.
///
/// Rust has no collector of its own, so these statistics always come from
/// the host application, e.g. a scripting runtime it embeds.
pub trait GcStatsSource: Send + Sync + 'static {
    /// Returns the number of collections run so far, per generation.
    fn collections(&self) -> Result<GcCounts, SourceError>;
}

/// A [`GcStatsSource`] the host feeds by calling
/// [`record_collection`](GcCounters::record_collection).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use lightstep_metrics::sources::{GcCounters, GcStatsSource};
///
/// let counters = Arc::new(GcCounters::new());
/// counters.record_collection(0);
/// counters.record_collection(2);
/// assert_eq!(counters.collections().unwrap(), [1, 0, 1]);
/// ```
#[derive(Default)]
pub struct GcCounters {
    generations: [AtomicU64; GC_GENERATIONS],
}

impl GcCounters {
    /// Creates counters starting at zero.
    pub fn new() -> GcCounters {
        GcCounters::default()
    }

    /// Records one finished collection of `generation`.
    ///
    /// Generations beyond the oldest are accounted to the oldest one.
    pub fn record_collection(&self, generation: usize) {
        let idx = generation.min(GC_GENERATIONS - 1);
        self.generations[idx].fetch_add(1, Ordering::Relaxed);
    }
}

impl GcStatsSource for GcCounters {
    fn collections(&self) -> Result<GcCounts, SourceError> {
        let mut counts = [0; GC_GENERATIONS];
        for (count, generation) in counts.iter_mut().zip(&self.generations) {
            *count = generation.load(Ordering::Relaxed);
        }
        Ok(counts)
    }
}

impl fmt::Debug for GcCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcCounters")
            .field("collections", &self.collections().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_generation() {
        let counters = GcCounters::new();
        counters.record_collection(7);
        assert_eq!(counters.collections().unwrap(), [0, 0, 1]);
    }
}
