//! Observability: push-side StatsD emitter and the pull-side exporter.

pub mod emitter;
pub mod exporter;
pub mod metrics;
pub mod statsd;

pub use emitter::MetricsEmitter;
pub use exporter::PullExporter;
pub use statsd::{MetricSink, StatsdClient};
