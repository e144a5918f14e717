//! The provided transports.
//!
//! The `reqwest` feature (on by default) turns on [`HttpTransport`].

use std::sync::Arc;

use crate::error::TransportError;
use crate::{Envelope, ReporterOptions, Transport, TransportFactory};

mod backoff;

pub use self::backoff::ExponentialBackoff;

#[cfg(feature = "reqwest")]
mod http;
#[cfg(feature = "reqwest")]
pub use self::http::HttpTransport;

/// Value of the `Accept` and `Content-Type` headers.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// Name of the header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "Lightstep-Access-Token";

/// A transport that refuses every envelope.
///
/// Used when no working transport could be set up, so that the worker keeps
/// its regular bookkeeping instead of crashing the host.
#[derive(Debug, Clone)]
pub struct UnavailableTransport {
    reason: String,
}

impl UnavailableTransport {
    /// Creates a transport that fails with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableTransport {
            reason: reason.into(),
        }
    }
}

impl Transport for UnavailableTransport {
    fn send_envelope(&self, _envelope: Envelope) -> Result<(), TransportError> {
        Err(TransportError::Unavailable(self.reason.clone()))
    }
}

/// Creates the default HTTP transport.
///
/// This is the default value for `transport` on the options.  It creates a
/// [`HttpTransport`] when one was compiled in, and an
/// [`UnavailableTransport`] otherwise.
#[derive(Clone, Debug)]
pub struct DefaultTransportFactory;

impl TransportFactory for DefaultTransportFactory {
    fn create_transport(&self, options: &ReporterOptions) -> Arc<dyn Transport> {
        #[cfg(feature = "reqwest")]
        {
            match HttpTransport::new(options) {
                Ok(transport) => Arc::new(transport),
                Err(err) => {
                    log::warn!("failed to set up http transport: {}", err);
                    Arc::new(UnavailableTransport::new(err.to_string()))
                }
            }
        }
        #[cfg(not(feature = "reqwest"))]
        {
            let _ = options;
            Arc::new(UnavailableTransport::new(
                "lightstep-metrics was compiled without transport",
            ))
        }
    }
}
