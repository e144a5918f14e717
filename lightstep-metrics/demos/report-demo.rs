use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lightstep_metrics::sources::GcCounters;

fn main() {
    pretty_env_logger::formatted_builder()
        .parse_filters("lightstep_metrics=debug")
        .init();

    let collections = Arc::new(GcCounters::new());
    let _guard = lightstep_metrics::init(
        lightstep_metrics::ReporterOptions::new()
            .with_component_name("report-demo")
            .with_flush_interval(Duration::from_secs(5))
            .with_gc_source(collections.clone()),
    );

    for round in 0..4u32 {
        let garbage: Vec<Vec<u8>> = (0..1000).map(|_| vec![0; 4096]).collect();
        drop(garbage);
        collections.record_collection(round as usize % 3);
        log::info!("round {} done", round);
        thread::sleep(Duration::from_secs(3));
    }
}
