//! This provides testing functionality for building tests.
//!
//! **Feature:** `test` (*disabled by default*)
//!
//! If the crate has been compiled with the test support feature this module
//! becomes available and provides a transport that captures envelopes
//! instead of sending them, plus synthetic sample sources.
//!
//! # Example usage
//!
//! ```
//! use lightstep_metrics::test::TestTransport;
//! use lightstep_metrics::ReporterOptions;
//!
//! let transport = TestTransport::new();
//! let guard = lightstep_metrics::init(ReporterOptions::new().with_transport(transport.clone()));
//! drop(guard);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{SourceError, TransportError};
use crate::sources::{ResourceSnapshot, SampleSource};
use crate::{Envelope, Transport};

/// Collects envelopes instead of sending them.
///
/// # Examples
///
/// ```
/// use lightstep_metrics::test::TestTransport;
/// use lightstep_metrics::ReporterOptions;
///
/// let transport = TestTransport::new();
/// let options = ReporterOptions::new()
///     .with_component_name("checkout")
///     .with_transport(transport.clone());
/// assert!(options.transport.is_some());
/// ```
#[derive(Debug, Default)]
pub struct TestTransport {
    collected: Mutex<Vec<Envelope>>,
    rejected: Mutex<Vec<Envelope>>,
    failures: AtomicUsize,
}

impl TestTransport {
    /// Creates a new test transport.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Arc<TestTransport> {
        Arc::new(TestTransport::default())
    }

    /// Makes the next `count` sends fail.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Number of delivered envelopes not yet fetched.
    pub fn len(&self) -> usize {
        self.collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no envelope was delivered since the last fetch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches and clears the delivered envelopes.
    pub fn fetch_and_clear_envelopes(&self) -> Vec<Envelope> {
        let mut guard = self.collected.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }

    /// Fetches and clears the envelopes whose send was made to fail.
    pub fn fetch_and_clear_rejected(&self) -> Vec<Envelope> {
        let mut guard = self.rejected.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl Transport for TestTransport {
    fn send_envelope(&self, envelope: Envelope) -> Result<(), TransportError> {
        let fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            self.rejected
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(envelope);
            return Err(TransportError::Http(503));
        }
        self.collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope);
        Ok(())
    }
}

/// A source that returns the same snapshot forever.
#[derive(Debug, Clone)]
pub struct StaticSource {
    snapshot: ResourceSnapshot,
    system_cpu: bool,
}

impl StaticSource {
    /// Creates a source returning `snapshot`.
    pub fn new(snapshot: ResourceSnapshot) -> Self {
        StaticSource {
            snapshot,
            system_cpu: true,
        }
    }

    /// Makes the source behave like a host without system CPU times.
    #[must_use]
    pub fn without_system_cpu(mut self) -> Self {
        self.system_cpu = false;
        self
    }
}

impl SampleSource for StaticSource {
    fn snapshot(&mut self) -> Result<ResourceSnapshot, SourceError> {
        Ok(self.snapshot)
    }

    fn provides_system_cpu(&self) -> bool {
        self.system_cpu
    }
}

/// A source that replays snapshots in order and fails once they run out.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    snapshots: VecDeque<ResourceSnapshot>,
    system_cpu: bool,
}

impl SequenceSource {
    /// Creates a source replaying `snapshots`.
    pub fn new(snapshots: Vec<ResourceSnapshot>) -> Self {
        SequenceSource {
            snapshots: snapshots.into(),
            system_cpu: true,
        }
    }

    /// Makes the source behave like a host without system CPU times.
    #[must_use]
    pub fn without_system_cpu(mut self) -> Self {
        self.system_cpu = false;
        self
    }
}

impl SampleSource for SequenceSource {
    fn snapshot(&mut self) -> Result<ResourceSnapshot, SourceError> {
        self.snapshots
            .pop_front()
            .ok_or(SourceError::Unavailable("synthetic snapshot"))
    }

    fn provides_system_cpu(&self) -> bool {
        self.system_cpu
    }
}
