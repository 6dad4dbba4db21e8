//! Request metrics emitter (push side).
//!
//! Fire-and-forget: sink failures are logged and swallowed.

use std::sync::Arc;

use jrdemo_core::sample::{MetricSample, RequestTags, REQUEST_COUNT, REQUEST_LATENCY_METRIC_NAME};

use super::statsd::MetricSink;

#[derive(Clone)]
pub struct MetricsEmitter {
    sink: Arc<dyn MetricSink>,
}

impl MetricsEmitter {
    pub fn new(sink: Arc<dyn MetricSink>) -> Self {
        Self { sink }
    }

    /// Send one `request_latency_seconds_hist` sample.
    pub fn observe_latency(&self, seconds: f64, tags: RequestTags) {
        self.emit(MetricSample::histogram(REQUEST_LATENCY_METRIC_NAME, seconds, tags));
    }

    /// Send one `request_count` increment.
    pub fn increment_count(&self, tags: RequestTags) {
        self.emit(MetricSample::counter(REQUEST_COUNT, tags));
    }

    fn emit(&self, sample: MetricSample) {
        if let Err(e) = self.sink.send(&sample) {
            tracing::warn!(metric = sample.name, code = e.client_code().as_str(), error = %e, "metric push failed");
        }
    }
}
