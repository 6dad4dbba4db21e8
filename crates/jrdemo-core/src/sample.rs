//! Metric samples pushed to the StatsD-style collector.
//!
//! A sample is encoded as a single DogStatsD line:
//! `<name>:<value>|<type>|#<tag>:<value>,...`

use std::fmt::{self, Write};

/// Counter incremented once per completed request.
pub const REQUEST_COUNT: &str = "request_count";
/// Latency distribution observed once per completed request (seconds).
pub const REQUEST_LATENCY_METRIC_NAME: &str = "request_latency_seconds_hist";
/// Constant `service` tag value.
pub const SERVICE_NAME: &str = "webapp";

/// The fixed label set attached to every request metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTags {
    pub service: &'static str,
    pub endpoint: String,
    pub method: String,
    pub status: String,
}

impl RequestTags {
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>, status: u16) -> Self {
        Self {
            service: SERVICE_NAME,
            endpoint: endpoint.into(),
            method: method.into(),
            status: status.to_string(),
        }
    }

    /// Tags as ordered key/value pairs: service, endpoint, method, status.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("service", self.service),
            ("endpoint", &self.endpoint),
            ("method", &self.method),
            ("status", &self.status),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Counter,
    Histogram,
}

impl SampleKind {
    fn wire_type(self) -> &'static str {
        match self {
            SampleKind::Counter => "c",
            SampleKind::Histogram => "h",
        }
    }
}

/// One labeled observation destined for the push collector.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: &'static str,
    pub kind: SampleKind,
    pub value: f64,
    pub tags: RequestTags,
}

impl MetricSample {
    pub fn counter(name: &'static str, tags: RequestTags) -> Self {
        Self { name, kind: SampleKind::Counter, value: 1.0, tags }
    }

    pub fn histogram(name: &'static str, value: f64, tags: RequestTags) -> Self {
        Self { name, kind: SampleKind::Histogram, value, tags }
    }

    /// Encode as a DogStatsD datagram payload, with an optional metric prefix.
    pub fn to_line(&self, prefix: Option<&str>) -> String {
        let mut out = String::with_capacity(96);
        if let Some(p) = prefix.filter(|p| !p.is_empty()) {
            let _ = write!(out, "{p}.");
        }
        let _ = write!(out, "{}:{}|{}|#", self.name, self.value, self.kind.wire_type());
        for (i, (k, v)) in self.tags.pairs().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{k}:{}", sanitize_tag(v));
        }
        out
    }
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(None))
    }
}

// `,` and `|` delimit the datagram; `#` opens the tag section.
fn sanitize_tag(v: &str) -> String {
    v.chars()
        .map(|c| match c {
            ',' | '|' | '#' | '\n' => '_',
            c => c,
        })
        .collect()
}
