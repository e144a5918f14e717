use std::thread;
use std::time::Duration;

use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{ACCEPT, CONTENT_TYPE as CONTENT_TYPE_HEADER, USER_AGENT};

use super::{ExponentialBackoff, ACCESS_TOKEN_HEADER, CONTENT_TYPE};
use crate::error::TransportError;
use crate::{Envelope, ReporterOptions, Transport};

/// A [`Transport`] that posts envelopes via the blocking [`reqwest`] client.
///
/// Failed requests are retried with [`ExponentialBackoff`] until the
/// `max_retry_time` of the options is used up.  Endpoint and access token
/// are fixed at construction.
///
/// [`reqwest`]: https://crates.io/crates/reqwest
#[cfg_attr(doc_cfg, doc(cfg(feature = "reqwest")))]
pub struct HttpTransport {
    client: ReqwestClient,
    url: String,
    access_token: String,
    max_retry_time: Duration,
}

#[cfg_attr(doc_cfg, doc(cfg(feature = "reqwest")))]
impl HttpTransport {
    /// Creates a new transport.
    pub fn new(options: &ReporterOptions) -> Result<Self, TransportError> {
        let client = ReqwestClient::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|err| TransportError::Unavailable(err.to_string()))?;
        Self::with_client(options, client)
    }

    /// Creates a new transport that uses the specified [`ReqwestClient`].
    pub fn with_client(
        options: &ReporterOptions,
        client: ReqwestClient,
    ) -> Result<Self, TransportError> {
        let endpoint = options
            .endpoint()
            .map_err(|err| TransportError::Unavailable(format!("invalid endpoint: {}", err)))?;
        Ok(HttpTransport {
            client,
            url: endpoint.url(),
            access_token: options.access_token().to_owned(),
            max_retry_time: options.max_retry_time,
        })
    }

    /// The URL envelopes are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn post(&self, body: &[u8]) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, CONTENT_TYPE)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .header(USER_AGENT, crate::constants::USER_AGENT)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .body(body.to_vec())
            .send()
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Http(status.as_u16()))
        }
    }
}

#[cfg_attr(doc_cfg, doc(cfg(feature = "reqwest")))]
impl Transport for HttpTransport {
    fn send_envelope(&self, envelope: Envelope) -> Result<(), TransportError> {
        let body = envelope.to_vec();
        let mut backoff = ExponentialBackoff::new(self.max_retry_time);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let err = match self.post(&body) {
                Ok(()) => {
                    log::debug!(
                        "delivered {} points (key {})",
                        envelope.samples().len(),
                        envelope.idempotency_key()
                    );
                    return Ok(());
                }
                Err(err) => err,
            };
            match backoff.next_delay() {
                Some(delay) => {
                    log::debug!("send attempt {} failed: {}; retrying in {:?}", attempts, err, delay);
                    thread::sleep(delay);
                }
                None => {
                    return Err(TransportError::RetriesExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
            }
        }
    }
}
