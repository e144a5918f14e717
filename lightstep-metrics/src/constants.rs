include!(concat!(env!("OUT_DIR"), "/constants.gen.rs"));

/// The user agent sent with every ingest request
pub const USER_AGENT: &str = concat!("lightstep-metrics.rust/", env!("CARGO_PKG_VERSION"));

/// Value of the `lightstep.reporter_platform` tag.
pub fn reporter_platform() -> String {
    format!("rust-{}", TARGET_OS)
}
