use std::time::{Duration, SystemTime};

use prost::Message;

use super::sample::MetricSample;
use super::wire::{metric_point, IngestRequest, KeyValue, MetricPoint, Reporter};
use crate::IdempotencyKey;

/// Ordered identity tags of a reporting process.
pub type ReporterTags = Vec<(String, String)>;

/// The unit of transmission: all samples of one tick plus the reporter
/// identity.
///
/// An envelope is immutable once built.  It covers the window that starts
/// at [`Envelope::start`] and lasts [`Envelope::duration`].
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    tags: ReporterTags,
    idempotency_key: IdempotencyKey,
    start: SystemTime,
    duration: Duration,
    samples: Vec<MetricSample>,
}

impl Envelope {
    /// Creates a new envelope.
    pub fn new(
        tags: ReporterTags,
        idempotency_key: IdempotencyKey,
        start: SystemTime,
        duration: Duration,
        samples: Vec<MetricSample>,
    ) -> Envelope {
        Envelope {
            tags,
            idempotency_key,
            start,
            duration,
            samples,
        }
    }

    /// The reporter identity tags.
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Looks up a single identity tag.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The de-duplication token of this envelope.
    pub fn idempotency_key(&self) -> &IdempotencyKey {
        &self.idempotency_key
    }

    /// Wall clock time the envelope was built at.
    pub fn start(&self) -> SystemTime {
        self.start
    }

    /// Length of the window the samples cover.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The samples of the tick.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Returns true if the envelope carries no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Converts the envelope into its wire message.
    pub fn to_request(&self) -> IngestRequest {
        let labels: Vec<KeyValue> = self
            .tags
            .iter()
            .map(|(k, v)| KeyValue::string(k.as_str(), v.as_str()))
            .collect();
        let start = prost_types::Timestamp::from(self.start);
        // durations beyond what the wire type holds are capped
        let duration = match i64::try_from(self.duration.as_secs()) {
            Ok(seconds) => prost_types::Duration {
                seconds,
                nanos: self.duration.subsec_nanos() as i32,
            },
            Err(_) => prost_types::Duration {
                seconds: i64::MAX,
                nanos: 999_999_999,
            },
        };

        let points = self
            .samples
            .iter()
            .map(|sample| MetricPoint {
                kind: sample.kind as i32,
                metric_name: sample.name.to_string(),
                labels: labels.clone(),
                start: Some(start.clone()),
                duration: Some(duration.clone()),
                value: Some(metric_point::Value::DoubleValue(sample.value)),
            })
            .collect();

        IngestRequest {
            reporter: Some(Reporter {
                reporter_id: 0,
                tags: labels,
            }),
            idempotency_key: self.idempotency_key.to_string(),
            points,
        }
    }

    /// Serializes the envelope into the binary request body.
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_request().encode_to_vec()
    }
}
