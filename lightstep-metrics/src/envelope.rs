//! Packaging of a tick's samples into an [`Envelope`].

use std::time::{Duration, SystemTime};

use crate::constants;
use crate::types::IdempotencyKey;
use crate::{Envelope, MetricSample};

/// Tag key of the component (service) name.
pub const COMPONENT_NAME_KEY: &str = "lightstep.component_name";
/// Tag key of the service version.
pub const SERVICE_VERSION_KEY: &str = "service.version";
/// Tag key of the hostname.
pub const HOSTNAME_KEY: &str = "lightstep.hostname";
/// Tag key of the reporting platform.
pub const REPORTER_PLATFORM_KEY: &str = "lightstep.reporter_platform";
/// Tag key of the reporting platform's version.
pub const REPORTER_PLATFORM_VERSION_KEY: &str = "lightstep.reporter_platform_version";

/// Who is reporting.  Fixed for the lifetime of a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterIdentity {
    /// Name of the instrumented component.
    pub component_name: String,
    /// Version of the instrumented service, if known.
    pub service_version: Option<String>,
    /// Name of the host.
    pub hostname: Option<String>,
    /// Reporting platform.
    pub platform: String,
    /// Version of the reporting platform.
    pub platform_version: Option<String>,
}

impl ReporterIdentity {
    /// Creates an identity for `component_name` on this platform.
    pub fn new(component_name: impl Into<String>) -> Self {
        ReporterIdentity {
            component_name: component_name.into(),
            service_version: None,
            hostname: None,
            platform: constants::reporter_platform(),
            platform_version: constants::RUSTC_VERSION.map(str::to_owned),
        }
    }

    /// The identity as ordered tags; unknown values are left out.
    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags = vec![(COMPONENT_NAME_KEY.to_owned(), self.component_name.clone())];
        let optional = [
            (SERVICE_VERSION_KEY, &self.service_version),
            (HOSTNAME_KEY, &self.hostname),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                tags.push((key.to_owned(), value.clone()));
            }
        }
        tags.push((REPORTER_PLATFORM_KEY.to_owned(), self.platform.clone()));
        if let Some(version) = &self.platform_version {
            tags.push((REPORTER_PLATFORM_VERSION_KEY.to_owned(), version.clone()));
        }
        tags
    }
}

/// Builds one envelope per tick.
#[derive(Clone, Debug)]
pub struct EnvelopeBuilder {
    tags: Vec<(String, String)>,
    interval: Duration,
}

impl EnvelopeBuilder {
    /// Creates a builder for the given identity and base flush interval.
    pub fn new(identity: &ReporterIdentity, interval: Duration) -> Self {
        EnvelopeBuilder {
            tags: identity.tags(),
            interval,
        }
    }

    /// The base flush interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Packages `samples`.
    ///
    /// `attempts` is the number of intervals the samples span: 1 after a
    /// successful send, one more for every failed send since.  Every call
    /// generates a new idempotency key.
    pub fn build(&self, samples: Vec<MetricSample>, attempts: u32) -> Envelope {
        Envelope::new(
            self.tags.clone(),
            IdempotencyKey::generate(),
            SystemTime::now(),
            self.interval.saturating_mul(attempts.max(1)),
            samples,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ReporterIdentity {
        ReporterIdentity {
            component_name: "checkout".into(),
            service_version: Some("1.2.3".into()),
            hostname: Some("web-1".into()),
            platform: "rust-linux".into(),
            platform_version: Some("1.81.0".into()),
        }
    }

    #[test]
    fn test_tags() {
        let envelope = EnvelopeBuilder::new(&identity(), Duration::from_secs(30)).build(vec![], 1);
        assert_eq!(envelope.tag(COMPONENT_NAME_KEY), Some("checkout"));
        assert_eq!(envelope.tag(SERVICE_VERSION_KEY), Some("1.2.3"));
        assert_eq!(envelope.tag(HOSTNAME_KEY), Some("web-1"));
        assert_eq!(envelope.tag(REPORTER_PLATFORM_KEY), Some("rust-linux"));
        assert_eq!(envelope.tag(REPORTER_PLATFORM_VERSION_KEY), Some("1.81.0"));
    }

    #[test]
    fn test_unknown_tags_are_omitted() {
        let identity = ReporterIdentity::new("checkout");
        let tags = identity.tags();
        assert!(tags.iter().all(|(k, _)| k != SERVICE_VERSION_KEY && k != HOSTNAME_KEY));
        assert_eq!(tags[0].0, COMPONENT_NAME_KEY);
    }

    #[test]
    fn test_duration_spans_attempts() {
        let builder = EnvelopeBuilder::new(&identity(), Duration::from_secs(30));
        assert_eq!(builder.build(vec![], 1).duration(), Duration::from_secs(30));
        assert_eq!(builder.build(vec![], 2).duration(), Duration::from_secs(60));
        assert_eq!(builder.build(vec![], 0).duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_duration_saturates() {
        let builder = EnvelopeBuilder::new(&identity(), Duration::MAX);
        assert_eq!(builder.build(vec![], 3).duration(), Duration::MAX);
        let builder = EnvelopeBuilder::new(&identity(), Duration::from_secs(30));
        assert_eq!(builder.build(vec![], u32::MAX).duration(), Duration::from_secs(30) * u32::MAX);
    }

    #[test]
    fn test_idempotency_key() {
        let builder = EnvelopeBuilder::new(&identity(), Duration::from_secs(30));
        assert_ne!(
            builder.build(vec![], 1).idempotency_key(),
            builder.build(vec![], 1).idempotency_key()
        );
    }
}
