use std::time::{Duration, Instant};

/// Exponentially growing waits between retries, bounded by a total time
/// budget.
///
/// Waits start at [`INITIAL_INTERVAL`](Self::INITIAL_INTERVAL) and double
/// after every retry.  With jitter enabled each wait is drawn uniformly
/// from zero up to the nominal value.  A wait never extends past the
/// budget; once the budget is spent no further wait is handed out.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    started: Instant,
    max_elapsed: Duration,
    current: Duration,
    jitter: bool,
}

impl ExponentialBackoff {
    /// First nominal wait.
    pub const INITIAL_INTERVAL: Duration = Duration::from_secs(1);

    /// Starts a new retry schedule with a total budget of `max_elapsed`.
    pub fn new(max_elapsed: Duration) -> Self {
        ExponentialBackoff {
            started: Instant::now(),
            max_elapsed,
            current: Self::INITIAL_INTERVAL,
            jitter: true,
        }
    }

    /// Enables or disables jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns how long to wait before the next retry, or `None` if the
    /// budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let elapsed = self.started.elapsed();
        self.next_delay_after(elapsed)
    }

    fn next_delay_after(&mut self, elapsed: Duration) -> Option<Duration> {
        let remaining = self.max_elapsed.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }
        let nominal = self.current;
        self.current = self.current.saturating_mul(2);
        let wait = if self.jitter {
            nominal.mul_f64(rand::random::<f64>())
        } else {
            nominal
        };
        Some(wait.min(remaining))
    }
}
