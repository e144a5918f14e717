//! The periodic collect, build and send loop.

use std::fmt;
use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::aggregate::RuntimeMetrics;
use crate::envelope::EnvelopeBuilder;
use crate::Transport;

/// Runs one tick at a time: collect, build, send, and the bookkeeping that
/// follows.
///
/// The flusher tracks how many base intervals the next envelope covers.  A
/// successful send resets that to one; a failed send rolls the collectors
/// back and widens the next envelope by one interval.
pub struct Flusher {
    metrics: RuntimeMetrics,
    builder: EnvelopeBuilder,
    transport: Arc<dyn Transport>,
    attempts: u32,
}

impl Flusher {
    /// Creates a flusher.
    pub fn new(
        metrics: RuntimeMetrics,
        builder: EnvelopeBuilder,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Flusher {
            metrics,
            builder,
            transport,
            attempts: 1,
        }
    }

    /// Number of base intervals the next envelope will cover.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The aggregate this flusher collects from.
    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// Runs one tick and returns true if an envelope was delivered.
    pub fn flush(&mut self) -> bool {
        let samples = self.metrics.collect();
        if samples.is_empty() {
            log::debug!("no samples collected, skipping send");
            self.attempts = self.attempts.saturating_add(1);
            return false;
        }

        log::debug!("sending {} samples covering {} interval(s)", samples.len(), self.attempts);
        let envelope = self.builder.build(samples, self.attempts);
        match self.transport.send_envelope(envelope) {
            Ok(()) => {
                self.attempts = 1;
                true
            }
            Err(err) => {
                log::warn!("failed to send runtime metrics: {}", err);
                self.metrics.rollback();
                self.attempts = self.attempts.saturating_add(1);
                false
            }
        }
    }
}

impl fmt::Debug for Flusher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flusher")
            .field("metrics", &self.metrics)
            .field("builder", &self.builder)
            .field("attempts", &self.attempts)
            .finish()
    }
}

/// Background thread that drives a [`Flusher`] on a fixed cadence.
///
/// Ticks never overlap: a tick that is due while the previous one is still
/// sending runs right after it.  Shutting down stops the schedule and runs
/// exactly one final flush before the thread exits.
pub struct MetricsWorker {
    shutdown: Arc<(Mutex<bool>, Condvar)>,
    worker: Option<JoinHandle<()>>,
}

impl MetricsWorker {
    /// Spawns the worker thread.
    pub fn spawn(mut flusher: Flusher, interval: Duration) -> io::Result<Self> {
        #[allow(clippy::mutex_atomic)]
        let shutdown = Arc::new((Mutex::new(false), Condvar::new()));

        let worker_shutdown = shutdown.clone();
        let worker = std::thread::Builder::new()
            .name("lightstep-metrics".into())
            .spawn(move || {
                let (lock, cvar) = worker_shutdown.as_ref();
                // `None` when the interval reaches past what `Instant` can hold
                let mut next_tick = Instant::now().checked_add(interval);
                loop {
                    let mut shutdown = lock.lock().unwrap_or_else(PoisonError::into_inner);
                    while !*shutdown {
                        let now = Instant::now();
                        shutdown = match next_tick {
                            Some(tick) if now >= tick => break,
                            Some(tick) => {
                                cvar.wait_timeout(shutdown, tick - now)
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .0
                            }
                            None => cvar.wait(shutdown).unwrap_or_else(PoisonError::into_inner),
                        };
                    }
                    if *shutdown {
                        break;
                    }
                    // release the flag so shutdown can be requested mid-tick
                    drop(shutdown);

                    flusher.flush();
                    next_tick = next_tick
                        .and_then(|tick| tick.checked_add(interval))
                        .map(|tick| tick.max(Instant::now()));
                }
                log::debug!("worker shutting down, running final flush");
                flusher.flush();
            })?;

        log::info!("runtime metrics worker started, interval {:?}", interval);
        Ok(MetricsWorker {
            shutdown,
            worker: Some(worker),
        })
    }

    /// Returns true until the worker was shut down.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stops the worker, waiting for the final flush.
    ///
    /// Returns false if the worker had already been shut down.
    pub fn shutdown(&mut self) -> bool {
        let worker = match self.worker.take() {
            Some(worker) => worker,
            None => return false,
        };
        let (lock, cvar) = self.shutdown.as_ref();
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_one();

        if worker.join().is_err() {
            log::warn!("runtime metrics worker panicked");
        }
        log::info!("runtime metrics worker stopped");
        true
    }
}

impl Drop for MetricsWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for MetricsWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsWorker")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::collectors::{GcCollector, ResourceCollector};
    use crate::envelope::ReporterIdentity;
    use crate::sources::{GcCounters, ResourceSnapshot};
    use crate::test::{StaticSource, TestTransport};

    const INTERVAL: Duration = Duration::from_secs(30);

    fn flusher(transport: Arc<TestTransport>) -> Flusher {
        let metrics = RuntimeMetrics::new(vec![Box::new(ResourceCollector::with_source(
            StaticSource::new(ResourceSnapshot::default()),
        ))]);
        let builder = EnvelopeBuilder::new(&ReporterIdentity::new("test"), INTERVAL);
        Flusher::new(metrics, builder, transport)
    }

    #[test]
    fn test_failure_widens_next_duration() {
        let transport = TestTransport::new();
        let mut flusher = flusher(transport.clone());

        transport.fail_next(1);
        assert!(!flusher.flush());
        assert_eq!(flusher.attempts(), 2);

        assert!(flusher.flush());
        assert_eq!(flusher.attempts(), 1);
        assert!(flusher.flush());

        let envelopes = transport.fetch_and_clear_envelopes();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].duration(), INTERVAL * 2);
        assert_eq!(envelopes[1].duration(), INTERVAL);

        let rejected = transport.fetch_and_clear_rejected();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].duration(), INTERVAL);
    }

    #[test]
    fn test_consecutive_failures_keep_widening() {
        let transport = TestTransport::new();
        let mut flusher = flusher(transport.clone());

        transport.fail_next(3);
        for _ in 0..3 {
            flusher.flush();
        }
        assert!(flusher.flush());
        let envelopes = transport.fetch_and_clear_envelopes();
        assert_eq!(envelopes[0].duration(), INTERVAL * 4);
    }

    #[test]
    fn test_failure_rolls_back_collectors() {
        let counters = Arc::new(GcCounters::new());
        let metrics = RuntimeMetrics::new(vec![Box::new(GcCollector::new(counters.clone()))]);
        let builder = EnvelopeBuilder::new(&ReporterIdentity::new("test"), INTERVAL);
        let transport = TestTransport::new();
        let mut flusher = Flusher::new(metrics, builder, transport.clone());

        // establishes the baseline
        assert!(flusher.flush());

        counters.record_collection(0);
        transport.fail_next(1);
        assert!(!flusher.flush());

        counters.record_collection(0);
        assert!(flusher.flush());

        let rejected = transport.fetch_and_clear_rejected();
        let delivered = transport.fetch_and_clear_envelopes();
        let gen0 = |samples: &[crate::MetricSample]| {
            samples
                .iter()
                .find(|s| s.name == catalog::GC_COUNT_GEN0)
                .map(|s| s.value)
        };
        assert_eq!(gen0(rejected[0].samples()), Some(1.0));
        assert_eq!(gen0(delivered[0].samples()), Some(0.0));
        assert_eq!(gen0(delivered[1].samples()), Some(2.0));
    }

    #[test]
    fn test_empty_tick_is_not_sent() {
        let transport = TestTransport::new();
        let builder = EnvelopeBuilder::new(&ReporterIdentity::new("test"), INTERVAL);
        let mut flusher = Flusher::new(RuntimeMetrics::new(vec![]), builder, transport.clone());
        assert!(!flusher.flush());
        assert_eq!(flusher.attempts(), 2);
        assert!(transport.fetch_and_clear_envelopes().is_empty());
    }

    #[test]
    fn test_shutdown_flushes_once() {
        let transport = TestTransport::new();
        let mut worker = MetricsWorker::spawn(flusher(transport.clone()), Duration::from_secs(3600))
            .unwrap();
        assert!(worker.is_running());
        assert!(worker.shutdown());
        assert!(!worker.is_running());
        assert!(!worker.shutdown());
        assert_eq!(transport.fetch_and_clear_envelopes().len(), 1);
    }

    #[test]
    fn test_unbounded_interval_waits_for_shutdown() {
        let transport = TestTransport::new();
        let mut worker = MetricsWorker::spawn(flusher(transport.clone()), Duration::MAX).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(transport.is_empty());
        assert!(worker.shutdown());
        assert_eq!(transport.len(), 1);
    }

    #[test]
    fn test_periodic_ticks() {
        let transport = TestTransport::new();
        let worker = MetricsWorker::spawn(flusher(transport.clone()), Duration::from_millis(10))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while transport.len() < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        drop(worker);
        assert!(transport.len() >= 4);
    }
}
