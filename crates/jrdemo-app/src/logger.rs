//! Request logger: one `request_log` row per call, never failing the caller.

use std::sync::Arc;

use jrdemo_core::error::Result;
use jrdemo_core::record::LogRow;

use crate::context::{DbSlot, RequestContext};
use crate::obs::PullExporter;
use crate::store::Connector;

#[derive(Clone)]
pub struct RequestLogger {
    connector: Arc<dyn Connector>,
    exporter: Arc<PullExporter>,
}

impl RequestLogger {
    pub fn new(connector: Arc<dyn Connector>, exporter: Arc<PullExporter>) -> Self {
        Self { connector, exporter }
    }

    /// Insert and commit one row on the request's connection.
    ///
    /// Acquisition and write failures are logged and counted, then dropped.
    /// A failed write is rolled back. Nothing is retried.
    pub async fn log_request(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        status_code: u16,
        message: &str,
    ) {
        let mut slot = match ctx.connection(self.connector.as_ref()).await {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!(error = %e, "database connection not available for logging");
                self.record_failure("connect");
                return;
            }
        };
        let DbSlot::Open(conn) = &mut *slot else {
            return;
        };

        let row = LogRow::now(
            ctx.remote_addr().map(|ip| ip.to_string()),
            endpoint,
            status_code,
            message,
        );

        let written: Result<()> = async {
            conn.begin().await?;
            conn.insert(&row).await?;
            conn.commit().await
        }
        .await;

        match written {
            Ok(()) => tracing::info!(endpoint, status_code, "logged request"),
            Err(e) => {
                tracing::error!(endpoint, status_code, error = %e, "error logging to database");
                if let Err(rb) = conn.rollback().await {
                    tracing::warn!(error = %rb, "rollback failed");
                }
                self.record_failure("insert");
            }
        }
    }

    fn record_failure(&self, stage: &str) {
        self.exporter.request_log_errors.inc(&[("stage", stage)]);
    }
}
