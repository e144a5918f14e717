//! This crate reports runtime metrics of the current process and host to a
//! [Lightstep](https://lightstep.com/) metrics ingest endpoint.
//!
//! # Quickstart
//!
//! The most convenient way to use this library is the [`init`] function,
//! which detects what the host can measure and starts a background thread
//! that reports it every 30 seconds.
//!
//! The [`init`] function returns a guard that when dropped reports one last
//! time and stops the thread.  Keep the guard around or reporting stops.
//!
//! ```
//! let _guard = lightstep_metrics::init(lightstep_metrics::ReporterOptions {
//!     component_name: Some("checkout".into()),
//!     access_token: Some("<access token>".into()),
//!     disabled: true,
//!     ..Default::default()
//! });
//! ```
//!
//! # Reported metrics
//!
//! Process CPU times and resident memory, system CPU times, memory and
//! network totals (see [`catalog`]).  Counters are reported as deltas over
//! the reporting window; a window whose delivery failed is folded into the
//! next one.  Hosts that embed a garbage collected runtime can additionally
//! report collection counts through a [`GcStatsSource`](sources::GcStatsSource).
//!
//! # Configuration
//!
//! Unset [`ReporterOptions`] are filled from `LIGHTSTEP_*` environment
//! variables, see [`apply_defaults`].  Setting `LIGHTSTEP_METRICS_DISABLE=1`
//! turns [`init`] into a no-op.
//!
//! # Features
//!
//! Default features:
//!
//! * `transport`: Enables the default transport, which is currently `reqwest` with `native-tls`.
//!
//! Additional features:
//!
//! * `test`: Enables testing support.
//! * `reqwest`: Enables the `reqwest` transport, which is currently the default.
//! * `native-tls`: Uses the `native-tls` crate, which is currently the default.
//! * `rustls`: Enables the `rustls` support of the `reqwest` transport.

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]

mod aggregate;
mod collector;
mod constants;
mod defaults;
mod envelope;
mod error;
mod init;
mod options;
mod transport;
mod worker;

pub mod catalog;
pub mod collectors;
pub mod sources;
#[cfg(any(test, feature = "test"))]
#[cfg_attr(doc_cfg, doc(cfg(feature = "test")))]
pub mod test;
pub mod transports;

pub use lightstep_metrics_types as types;

pub use crate::aggregate::RuntimeMetrics;
pub use crate::collector::MetricCollector;
pub use crate::defaults::{apply_defaults, server_name, ACCESS_TOKEN_ENV_VAR, DISABLE_ENV_VAR};
pub use crate::envelope::{
    EnvelopeBuilder, ReporterIdentity, COMPONENT_NAME_KEY, HOSTNAME_KEY, REPORTER_PLATFORM_KEY,
    REPORTER_PLATFORM_VERSION_KEY, SERVICE_VERSION_KEY,
};
pub use crate::error::{SourceError, TransportError};
pub use crate::init::{init, init_with_metrics, MetricsGuard, UNKNOWN_COMPONENT_NAME};
pub use crate::options::{
    ReporterOptions, DEFAULT_ACCESS_TOKEN, DEFAULT_FLUSH_INTERVAL, DEFAULT_HOST,
    DEFAULT_MAX_RETRY_TIME, DEFAULT_PATH, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT,
    MIN_FLUSH_INTERVAL,
};
pub use crate::transport::{Transport, TransportFactory};
pub use crate::types::{Envelope, MetricKind, MetricSample};
pub use crate::worker::{Flusher, MetricsWorker};
