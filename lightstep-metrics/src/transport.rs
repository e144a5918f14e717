use std::sync::Arc;

use crate::error::TransportError;
use crate::{Envelope, ReporterOptions};

/// The trait for transports.
///
/// A transport is responsible for delivering envelopes to the ingest
/// endpoint.  Retrying transient failures is the transport's business; an
/// error returned from [`send_envelope`](Transport::send_envelope) means the
/// envelope is lost and the caller should account for that.
pub trait Transport: Send + Sync + 'static {
    /// Sends an [`Envelope`], blocking until it was delivered or given up on.
    fn send_envelope(&self, envelope: Envelope) -> Result<(), TransportError>;
}

/// Builds the transport a worker sends through.
///
/// [`ReporterOptions`] carry a factory rather than a transport, so the same
/// options can start several workers and the transport is only set up once
/// the endpoint and access token are final.
///
/// Two blanket implementations cover the common cases.  Any
/// `Fn(&ReporterOptions) -> Arc<dyn Transport>` closure is a factory, and
/// so is an `Arc<T>` of a concrete transport, which hands out clones of
/// itself.  The latter is how an `Arc<TestTransport>` goes straight into
/// the options.
pub trait TransportFactory: Send + Sync {
    /// Given some [`ReporterOptions`], creates a [`Transport`].
    fn create_transport(&self, options: &ReporterOptions) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn(&ReporterOptions) -> Arc<dyn Transport> + Clone + Send + Sync + 'static,
{
    fn create_transport(&self, options: &ReporterOptions) -> Arc<dyn Transport> {
        (*self)(options)
    }
}

impl<T: Transport> TransportFactory for Arc<T> {
    fn create_transport(&self, options: &ReporterOptions) -> Arc<dyn Transport> {
        let _options = options;
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestTransport;

    #[test]
    fn test_closure_and_arc_factories() {
        let captured = TestTransport::new();
        let for_closure = captured.clone();
        let closure = move |options: &ReporterOptions| -> Arc<dyn Transport> {
            assert_eq!(options.access_token(), "token");
            for_closure.clone()
        };
        let options = ReporterOptions::new().with_access_token("token");

        let factories: Vec<Arc<dyn TransportFactory>> =
            vec![Arc::new(closure), Arc::new(captured.clone())];
        for factory in factories {
            let envelope = crate::EnvelopeBuilder::new(
                &crate::ReporterIdentity::new("checkout"),
                std::time::Duration::from_secs(30),
            )
            .build(vec![], 1);
            factory
                .create_transport(&options)
                .send_envelope(envelope)
                .unwrap();
        }
        assert_eq!(captured.fetch_and_clear_envelopes().len(), 2);
    }
}
