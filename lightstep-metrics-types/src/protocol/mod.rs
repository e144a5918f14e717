//! The metrics ingest protocol.
//!
//! [`wire`] holds the protocol buffer messages exactly as they go over the
//! network.  [`Envelope`] and [`MetricSample`] are the friendlier values the
//! reporting pipeline works with and convert into the wire messages at the
//! very end.

mod envelope;
mod sample;

pub mod wire;

pub use self::envelope::{Envelope, ReporterTags};
pub use self::sample::MetricSample;
pub use self::wire::MetricKind;
