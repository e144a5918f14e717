//! This crate provides common types for working with the Lightstep metrics
//! ingest protocol.
//!
//! It contains the binary wire messages, the [`Envelope`] value that one
//! reporting tick produces, the [`IdempotencyKey`] attached to every
//! envelope and the [`Endpoint`] description used to address an ingest
//! server.
//!
//! Nothing in here performs I/O. The runtime side lives in the
//! `lightstep-metrics` crate.

#![warn(missing_docs)]

mod endpoint;
mod idempotency;

pub mod protocol;

pub use crate::endpoint::{Endpoint, ParseEndpointError, Scheme};
pub use crate::idempotency::IdempotencyKey;
pub use crate::protocol::{Envelope, MetricKind, MetricSample};
