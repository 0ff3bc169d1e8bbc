use tracing::trace;

// Lightweight metrics helpers; trace events instead of metrics macros so
// the Prometheus recorder stays optional at runtime.

pub fn inc_requests(route: &'static str) {
    trace!(
        target = "radar.metrics",
        route = route,
        "requests_total_inc"
    );
}

pub fn item_skipped(stage: &'static str) {
    trace!(
        target = "radar.metrics",
        stage = stage,
        "items_skipped_inc"
    );
}

pub fn package_rendered(shift: &'static str, item_count: usize) {
    trace!(
        target = "radar.metrics",
        shift = shift,
        item_count = item_count as u64,
        "package_rendered"
    );
}
