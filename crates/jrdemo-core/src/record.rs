//! Persisted request log row.

use chrono::{Local, NaiveDateTime};

/// One row of the pre-existing `request_log` table. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub timestamp: NaiveDateTime,
    pub source_ip: Option<String>,
    pub endpoint: String,
    pub status_code: i32,
    pub message: String,
}

impl LogRow {
    /// Build a row stamped with the current local time.
    pub fn now(
        source_ip: Option<String>,
        endpoint: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            source_ip,
            endpoint: endpoint.into(),
            status_code: i32::from(status_code),
            message: message.into(),
        }
    }
}
