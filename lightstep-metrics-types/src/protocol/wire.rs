//! Protocol buffer messages of the metrics ingest API.
//!
//! These mirror the `IngestRequest` schema field by field; the tags must
//! never be renumbered.

/// The body of a metrics ingest call.
#[derive(Clone, PartialEq, prost::Message)]
pub struct IngestRequest {
    /// Identity of the process that produced the points.
    #[prost(message, optional, tag = "1")]
    pub reporter: Option<Reporter>,
    /// Random token for receiver side de-duplication.
    #[prost(string, tag = "2")]
    pub idempotency_key: String,
    /// The metric points of one reporting window.
    #[prost(message, repeated, tag = "3")]
    pub points: Vec<MetricPoint>,
}

/// Identity of a reporting process.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Reporter {
    /// Optional numeric reporter id, unused by metrics reporting.
    #[prost(uint64, tag = "1")]
    pub reporter_id: u64,
    /// Identity tags such as component name and hostname.
    #[prost(message, repeated, tag = "4")]
    pub tags: Vec<KeyValue>,
}

/// A tag or label.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KeyValue {
    /// The tag name.
    #[prost(string, tag = "1")]
    pub key: String,
    /// The tag value.
    #[prost(oneof = "key_value::Value", tags = "2, 3, 4, 5, 6")]
    pub value: Option<key_value::Value>,
}

impl KeyValue {
    /// Creates a string valued tag.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            key: key.into(),
            value: Some(key_value::Value::StringValue(value.into())),
        }
    }
}

/// Nested types of [`KeyValue`].
pub mod key_value {
    /// The value of a tag.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        /// A string value.
        #[prost(string, tag = "2")]
        StringValue(String),
        /// An integer value.
        #[prost(int64, tag = "3")]
        IntValue(i64),
        /// A floating point value.
        #[prost(double, tag = "4")]
        DoubleValue(f64),
        /// A boolean value.
        #[prost(bool, tag = "5")]
        BoolValue(bool),
        /// A JSON encoded value.
        #[prost(string, tag = "6")]
        JsonValue(String),
    }
}

/// A single measurement.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricPoint {
    /// Counter or gauge.
    #[prost(enumeration = "MetricKind", tag = "1")]
    pub kind: i32,
    /// Name from the metrics catalog.
    #[prost(string, tag = "2")]
    pub metric_name: String,
    /// Labels attached to the point.
    #[prost(message, repeated, tag = "3")]
    pub labels: Vec<KeyValue>,
    /// Start of the window the point covers.
    #[prost(message, optional, tag = "4")]
    pub start: Option<prost_types::Timestamp>,
    /// Length of the window the point covers.
    #[prost(message, optional, tag = "5")]
    pub duration: Option<prost_types::Duration>,
    /// The measured value.
    #[prost(oneof = "metric_point::Value", tags = "6, 7")]
    pub value: Option<metric_point::Value>,
}

/// Nested types of [`MetricPoint`].
pub mod metric_point {
    /// The value of a point.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        /// An unsigned integer value.
        #[prost(uint64, tag = "6")]
        Uint64Value(u64),
        /// A floating point value.
        #[prost(double, tag = "7")]
        DoubleValue(f64),
    }
}

/// How the receiver should interpret a point's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MetricKind {
    /// Never sent on purpose.
    InvalidMetricKind = 0,
    /// A delta since the previous successful report.
    Counter = 1,
    /// An instantaneous reading.
    Gauge = 2,
}
