use std::io;

use thiserror::Error;

/// Raised when a sample source cannot produce a reading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The facility does not exist on this host or runtime.
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),
    /// Reading the facility failed.
    #[error("failed to read {what}")]
    Io {
        /// What was being read.
        what: &'static str,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The facility returned data that could not be interpreted.
    #[error("malformed {0}")]
    Malformed(&'static str),
}

/// Raised when an envelope could not be delivered.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("ingest endpoint responded with status {0}")]
    Http(u16),
    /// The request did not complete.
    #[error("network error: {0}")]
    Network(String),
    /// The transport is not able to deliver anything.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    /// The retry budget ran out.
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of requests that were made.
        attempts: u32,
        /// The error of the final attempt.
        last: Box<TransportError>,
    },
}
