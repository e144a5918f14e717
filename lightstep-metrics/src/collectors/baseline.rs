use std::collections::BTreeMap;

/// Last observed cumulative totals of a collector, with one step of undo.
///
/// [`advance`](Baseline::advance) turns new totals into deltas and makes
/// them the baseline; [`rollback`](Baseline::rollback) reinstates the
/// baseline those deltas were computed against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Baseline {
    current: BTreeMap<&'static str, f64>,
    previous: Option<BTreeMap<&'static str, f64>>,
}

impl Baseline {
    /// Creates an empty baseline; every key starts at zero.
    pub fn new() -> Baseline {
        Baseline::default()
    }

    /// Stores `totals` and returns the deltas against the stored values.
    ///
    /// Deltas never go negative: a counter that was reset reports zero.
    pub fn advance<I>(&mut self, totals: I) -> BTreeMap<&'static str, f64>
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        let totals: BTreeMap<_, _> = totals.into_iter().collect();
        let deltas = totals
            .iter()
            .map(|(&key, &value)| {
                let stored = self.current.get(key).copied().unwrap_or(0.0);
                (key, (value - stored).max(0.0))
            })
            .collect();
        self.previous = Some(std::mem::replace(&mut self.current, totals));
        deltas
    }

    /// Marks a tick in which nothing was observed.
    ///
    /// A following rollback then leaves the baseline untouched instead of
    /// undoing an older, successfully reported tick.
    pub fn hold(&mut self) {
        self.previous = Some(self.current.clone());
    }

    /// Restores the baseline from before the last advance.
    pub fn rollback(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.current = previous;
        }
    }

    /// Returns the stored total for `key`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.current.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_computes_deltas() {
        let mut baseline = Baseline::new();
        let deltas = baseline.advance([("a", 10.0), ("b", 3.0)]);
        assert_eq!(deltas["a"], 10.0);
        assert_eq!(deltas["b"], 3.0);

        let deltas = baseline.advance([("a", 15.0), ("b", 3.0)]);
        assert_eq!(deltas["a"], 5.0);
        assert_eq!(deltas["b"], 0.0);
    }

    #[test]
    fn test_rollback_restores_previous() {
        let mut baseline = Baseline::new();
        baseline.advance([("a", 10.0)]);
        let before = baseline.clone();
        baseline.advance([("a", 20.0)]);
        baseline.rollback();
        assert_eq!(baseline.get("a"), before.get("a"));

        let deltas = baseline.advance([("a", 20.0)]);
        assert_eq!(deltas["a"], 10.0);
    }

    #[test]
    fn test_hold_makes_rollback_a_noop() {
        let mut baseline = Baseline::new();
        baseline.advance([("a", 10.0)]);
        baseline.advance([("a", 20.0)]);
        baseline.hold();
        baseline.rollback();
        assert_eq!(baseline.get("a"), Some(20.0));
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let mut baseline = Baseline::new();
        baseline.advance([("a", 10.0)]);
        let deltas = baseline.advance([("a", 4.0)]);
        assert_eq!(deltas["a"], 0.0);
    }
}
