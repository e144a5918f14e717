use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::sources::GcStatsSource;
use crate::types::{Endpoint, ParseEndpointError, Scheme};
use crate::TransportFactory;

/// Ingest host used when none is configured.
pub const DEFAULT_HOST: &str = "ingest.lightstep.com";
/// Ingest port used when none is configured.
pub const DEFAULT_PORT: u16 = 443;
/// Request path of the metrics ingest API.
pub const DEFAULT_PATH: &str = "/metrics";
/// Access token sent when none is configured.  The endpoint rejects it.
pub const DEFAULT_ACCESS_TOKEN: &str = "INVALID_TOKEN";
/// Base flush interval.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);
/// Shortest flush interval [`init`](crate::init) accepts; shorter ones are
/// raised to this.
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_secs(1);
/// Time budget for retrying a single envelope.
pub const DEFAULT_MAX_RETRY_TIME: Duration = Duration::from_secs(5);
/// Timeout of a single ingest request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration of the metrics reporter.
///
/// Unset values are filled from the environment by
/// [`apply_defaults`](crate::apply_defaults), which [`init`](crate::init)
/// runs automatically.  Everything is read once at construction.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// let options = lightstep_metrics::ReporterOptions {
///     component_name: Some("checkout".into()),
///     flush_interval: Duration::from_secs(10),
///     ..Default::default()
/// };
/// assert_eq!(options.endpoint().unwrap().url(), "https://ingest.lightstep.com:443/metrics");
/// ```
#[derive(Clone)]
pub struct ReporterOptions {
    /// Ingest host.
    pub host: Option<String>,
    /// Ingest port.
    pub port: Option<u16>,
    /// Whether to use TLS.
    pub secure: Option<bool>,
    /// Request path.
    pub path: String,
    /// Project access token.
    pub access_token: Option<String>,
    /// Base interval between two reports.
    pub flush_interval: Duration,
    /// Value of the `lightstep.component_name` tag.
    pub component_name: Option<String>,
    /// Value of the `service.version` tag.
    pub service_version: Option<String>,
    /// Value of the `lightstep.hostname` tag.
    pub hostname: Option<String>,
    /// Turns the reporter into a no-op.
    pub disabled: bool,
    /// Time budget for retrying one envelope.
    pub max_retry_time: Duration,
    /// Timeout of a single request.
    pub request_timeout: Duration,
    /// The transport to use.
    ///
    /// This is typically either a boxed function taking the client options by
    /// reference and returning a `Transport`, a boxed `Arc<Transport>` or
    /// alternatively the `DefaultTransportFactory`.
    pub transport: Option<Arc<dyn TransportFactory>>,
    /// Collection statistics of a runtime embedded in the host.
    pub gc_source: Option<Arc<dyn GcStatsSource>>,
}

impl ReporterOptions {
    /// Creates new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the component name.
    #[must_use]
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }

    /// Sets the service version.
    #[must_use]
    pub fn with_service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the base flush interval.
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets the transport factory.
    #[must_use]
    pub fn with_transport<F: TransportFactory + 'static>(mut self, factory: F) -> Self {
        self.transport = Some(Arc::new(factory) as Arc<dyn TransportFactory>);
        self
    }

    /// Sets the collection statistics source.
    #[must_use]
    pub fn with_gc_source<S: GcStatsSource>(mut self, source: Arc<S>) -> Self {
        self.gc_source = Some(source as Arc<dyn GcStatsSource>);
        self
    }

    /// The effective ingest host.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// The effective ingest port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether TLS is used.
    pub fn secure(&self) -> bool {
        self.secure.unwrap_or(true)
    }

    /// The effective access token.
    pub fn access_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(DEFAULT_ACCESS_TOKEN)
    }

    /// The ingest endpoint described by these options.
    pub fn endpoint(&self) -> Result<Endpoint, ParseEndpointError> {
        Endpoint::new(
            Scheme::from_secure(self.secure()),
            self.host(),
            self.port(),
            &self.path,
        )
    }
}

impl Default for ReporterOptions {
    fn default() -> ReporterOptions {
        ReporterOptions {
            host: None,
            port: None,
            secure: None,
            path: DEFAULT_PATH.to_owned(),
            access_token: None,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            component_name: None,
            service_version: None,
            hostname: None,
            disabled: false,
            max_retry_time: DEFAULT_MAX_RETRY_TIME,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            transport: None,
            gc_source: None,
        }
    }
}

impl fmt::Debug for ReporterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterOptions")
            .field("endpoint", &self.endpoint().map(|e| e.url()))
            .field("access_token", &self.access_token.as_ref().map(|_| "[redacted]"))
            .field("flush_interval", &self.flush_interval)
            .field("component_name", &self.component_name)
            .field("service_version", &self.service_version)
            .field("hostname", &self.hostname)
            .field("disabled", &self.disabled)
            .field("max_retry_time", &self.max_retry_time)
            .field("request_timeout", &self.request_timeout)
            .field("transport", &self.transport.as_ref().map(|_| "TransportFactory"))
            .field("gc_source", &self.gc_source.is_some())
            .finish()
    }
}
