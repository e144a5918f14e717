//! Built-in metric collectors.
//!
//! - [`ResourceCollector`]: process and host resources
//! - [`GcCollector`]: collection counts of a host supplied runtime

mod baseline;
mod gc;
mod resource;

pub use self::baseline::Baseline;
pub use self::gc::GcCollector;
pub use self::resource::ResourceCollector;
