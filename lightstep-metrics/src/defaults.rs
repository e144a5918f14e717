use std::env;
use std::sync::Arc;

use crate::transports::DefaultTransportFactory;
use crate::{ReporterOptions, TransportFactory};

/// Environment variable holding the project access token.
pub const ACCESS_TOKEN_ENV_VAR: &str = "LIGHTSTEP_ACCESS_TOKEN";
/// Environment variable that disables the reporter when set to a true value.
pub const DISABLE_ENV_VAR: &str = "LIGHTSTEP_METRICS_DISABLE";

/// Fills every unset option from the environment.
///
/// | option | variables, first match wins |
/// |---|---|
/// | `host` | `LIGHTSTEP_METRICS_HOST`, `LIGHTSTEP_HOST` |
/// | `port` | `LIGHTSTEP_METRICS_PORT`, `LIGHTSTEP_PORT` |
/// | `secure` | `LIGHTSTEP_METRICS_SECURE`, `LIGHTSTEP_SECURE` |
/// | `access_token` | `LIGHTSTEP_ACCESS_TOKEN` |
/// | `component_name` | `LIGHTSTEP_COMPONENT_NAME`, else the executable name |
/// | `service_version` | `LIGHTSTEP_SERVICE_VERSION` |
/// | `disabled` | `LIGHTSTEP_METRICS_DISABLE` |
///
/// The hostname is looked up from the operating system and the transport
/// defaults to [`DefaultTransportFactory`].
pub fn apply_defaults(opts: ReporterOptions) -> ReporterOptions {
    apply_defaults_from(opts, |key| env::var(key).ok())
}

pub(crate) fn apply_defaults_from<F>(mut opts: ReporterOptions, var: F) -> ReporterOptions
where
    F: Fn(&str) -> Option<String>,
{
    let first = |keys: &[&str]| keys.iter().find_map(|&key| var(key));

    if opts.transport.is_none() {
        opts.transport = Some(Arc::new(DefaultTransportFactory) as Arc<dyn TransportFactory>);
    }
    if opts.host.is_none() {
        opts.host = first(&["LIGHTSTEP_METRICS_HOST", "LIGHTSTEP_HOST"]);
    }
    if opts.port.is_none() {
        opts.port = first(&["LIGHTSTEP_METRICS_PORT", "LIGHTSTEP_PORT"])
            .and_then(|port| port.trim().parse().ok());
    }
    if opts.secure.is_none() {
        opts.secure = first(&["LIGHTSTEP_METRICS_SECURE", "LIGHTSTEP_SECURE"])
            .and_then(|secure| parse_flag(&secure));
    }
    if opts.access_token.is_none() {
        opts.access_token = var(ACCESS_TOKEN_ENV_VAR);
    }
    if opts.component_name.is_none() {
        opts.component_name = var("LIGHTSTEP_COMPONENT_NAME").or_else(executable_name);
    }
    if opts.service_version.is_none() {
        opts.service_version = var("LIGHTSTEP_SERVICE_VERSION");
    }
    if opts.hostname.is_none() {
        opts.hostname = server_name();
    }
    if !opts.disabled {
        opts.disabled = var(DISABLE_ENV_VAR)
            .and_then(|value| parse_flag(&value))
            .unwrap_or(false);
    }
    opts
}

/// Interprets `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Returns the server name (hostname) if available.
pub fn server_name() -> Option<String> {
    hostname::get().ok().and_then(|s| s.into_string().ok())
}

fn executable_name() -> Option<String> {
    env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
}
