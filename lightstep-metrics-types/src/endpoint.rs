use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Represents an endpoint parsing error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEndpointError {
    /// Raised if the endpoint is not a valid URL.
    #[error("invalid url")]
    InvalidUrl,
    /// Raised if the scheme is neither `http` nor `https`.
    #[error("unsupported scheme")]
    InvalidScheme,
    /// Raised if the host is missing or empty.
    #[error("missing host")]
    NoHost,
    /// Raised if the path does not start with a slash.
    #[error("path must be absolute")]
    InvalidPath,
}

/// The transport scheme of an ingest endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plaintext HTTP.
    Http,
    /// TLS-secured HTTPS.
    Https,
}

impl Scheme {
    /// Picks the scheme for a secure/plaintext flag.
    pub fn from_secure(secure: bool) -> Scheme {
        if secure {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    /// Returns the default port for this scheme.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Https => 443,
            Scheme::Http => 80,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        })
    }
}

/// Address of a metrics ingest server.
///
/// The port is always explicit in the rendered URL, so
/// `Endpoint::new(Scheme::Https, "ingest.lightstep.com", 443, "/metrics")`
/// renders as `https://ingest.lightstep.com:443/metrics`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl Endpoint {
    /// Creates an endpoint from its parts, validating each of them.
    pub fn new(
        scheme: Scheme,
        host: &str,
        port: u16,
        path: &str,
    ) -> Result<Endpoint, ParseEndpointError> {
        if host.is_empty() {
            return Err(ParseEndpointError::NoHost);
        }
        if !path.starts_with('/') {
            return Err(ParseEndpointError::InvalidPath);
        }
        // round-trip through the url parser so that hosts like `a b` are rejected
        Url::parse(&format!("{}://{}:{}{}", scheme, host, port, path))
            .map_err(|_| ParseEndpointError::InvalidUrl)?;
        Ok(Endpoint {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Returns the scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the full URL envelopes are posted to.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }
}

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    fn from_str(s: &str) -> Result<Endpoint, ParseEndpointError> {
        let url = Url::parse(s).map_err(|_| ParseEndpointError::InvalidUrl)?;
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            _ => return Err(ParseEndpointError::InvalidScheme),
        };
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(ParseEndpointError::NoHost),
        };
        let port = url.port().unwrap_or_else(|| scheme.default_port());
        Endpoint::new(scheme, host, port, url.path())
    }
}
