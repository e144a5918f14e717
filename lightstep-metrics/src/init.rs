use std::fmt;
use std::sync::Arc;

use crate::aggregate::RuntimeMetrics;
use crate::defaults::apply_defaults;
use crate::envelope::{EnvelopeBuilder, ReporterIdentity};
use crate::sources::Capabilities;
use crate::options::MIN_FLUSH_INTERVAL;
use crate::transports::DefaultTransportFactory;
use crate::worker::{Flusher, MetricsWorker};
use crate::{ReporterOptions, Transport, TransportFactory};

/// Component name used when none is configured and none can be derived.
pub const UNKNOWN_COMPONENT_NAME: &str = "unknown_service";

/// Helper struct that is returned from `init`.
///
/// When this is dropped the worker runs one last tick and then stops.
#[must_use = "when the init guard is dropped the metrics worker stops"]
pub struct MetricsGuard(Option<MetricsWorker>);

impl MetricsGuard {
    /// A guard with nothing running behind it.
    pub fn disabled() -> Self {
        MetricsGuard(None)
    }

    /// Quick check if a worker is running.
    pub fn is_enabled(&self) -> bool {
        self.0.as_ref().is_some_and(MetricsWorker::is_running)
    }

    /// Stops the worker after a final flush.
    ///
    /// Returns true if a running worker was stopped by this call.
    pub fn shutdown(&mut self) -> bool {
        self.0.as_mut().is_some_and(MetricsWorker::shutdown)
    }
}

impl Drop for MetricsGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for MetricsGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsGuard")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Creates the metrics reporter and starts its worker thread.
///
/// This fills unset options from the environment, detects which metrics this
/// host can supply and starts reporting them every
/// [`flush_interval`](ReporterOptions::flush_interval).  Nothing here fails:
/// when reporting is disabled, or nothing can be measured, a disabled guard
/// is returned and the reason is logged.
///
/// # Examples
///
/// ```
/// let _guard = lightstep_metrics::init(lightstep_metrics::ReporterOptions {
///     component_name: Some("checkout".into()),
///     disabled: true,
///     ..Default::default()
/// });
/// ```
pub fn init(options: ReporterOptions) -> MetricsGuard {
    let options = apply_defaults(options);
    if options.disabled {
        log::info!("runtime metrics disabled by configuration");
        return MetricsGuard::disabled();
    }
    let capabilities = Capabilities::detect(options.gc_source.clone());
    log::debug!("detected {:?}", capabilities);
    init_with_metrics(options, RuntimeMetrics::from_capabilities(&capabilities))
}

/// Like [`init`] but reports the given aggregate.
///
/// No defaults are applied and no capabilities are detected; this is for
/// hosts that assemble their own collectors.
pub fn init_with_metrics(options: ReporterOptions, metrics: RuntimeMetrics) -> MetricsGuard {
    if options.disabled {
        return MetricsGuard::disabled();
    }
    if metrics.is_empty() {
        log::info!("no runtime metrics available on this host, not reporting");
        return MetricsGuard::disabled();
    }

    let interval = if options.flush_interval < MIN_FLUSH_INTERVAL {
        log::warn!(
            "flush interval {:?} is too short, using {:?}",
            options.flush_interval,
            MIN_FLUSH_INTERVAL
        );
        MIN_FLUSH_INTERVAL
    } else {
        options.flush_interval
    };

    let transport = create_transport(&options);
    let identity = identity(&options);
    let builder = EnvelopeBuilder::new(&identity, interval);
    let flusher = Flusher::new(metrics, builder, transport);

    match MetricsWorker::spawn(flusher, interval) {
        Ok(worker) => {
            log::info!(
                "reporting runtime metrics for {} to {}",
                identity.component_name,
                options.host()
            );
            MetricsGuard(Some(worker))
        }
        Err(err) => {
            log::warn!("failed to start metrics worker: {}", err);
            MetricsGuard::disabled()
        }
    }
}

fn create_transport(options: &ReporterOptions) -> Arc<dyn Transport> {
    match options.transport {
        Some(ref factory) => factory.create_transport(options),
        None => DefaultTransportFactory.create_transport(options),
    }
}

fn identity(options: &ReporterOptions) -> ReporterIdentity {
    let mut identity = ReporterIdentity::new(
        options
            .component_name
            .as_deref()
            .unwrap_or(UNKNOWN_COMPONENT_NAME),
    );
    identity.service_version = options.service_version.clone();
    identity.hostname = options.hostname.clone();
    identity
}
