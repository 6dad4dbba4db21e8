//! Shared application state.
//!
//! Process-wide collaborators (metrics emitter, pull exporter, DB connector)
//! are built once at startup and injected into handlers through this state.

use std::sync::Arc;

use jrdemo_core::error::{DemoError, Result};

use crate::config::AppConfig;
use crate::lifecycle::{setup_metrics, LifecycleHooks};
use crate::logger::RequestLogger;
use crate::obs::{MetricSink, MetricsEmitter, PullExporter, StatsdClient};
use crate::routes::SimulationPolicy;
use crate::store::{Connector, PgConnector};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    hooks: LifecycleHooks,
    logger: RequestLogger,
    emitter: MetricsEmitter,
    exporter: Arc<PullExporter>,
    simulation: SimulationPolicy,
}

impl AppState {
    /// Build state backed by Postgres and the DogStatsD agent from `cfg`.
    /// Must be called from within a tokio runtime.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let statsd = StatsdClient::new(&cfg.statsd)
            .map_err(|e| DemoError::MetricsTransport(format!("statsd socket: {e}")))?;
        tracing::info!(agent = %statsd.agent(), resolved = statsd.is_resolved(), "statsd client ready");
        statsd.resolve_in_background();
        let connector = Arc::new(PgConnector::new(&cfg.database));
        Self::with_parts(cfg, connector, Arc::new(statsd))
    }

    /// Build state from explicit collaborators.
    pub fn with_parts(
        cfg: AppConfig,
        connector: Arc<dyn Connector>,
        sink: Arc<dyn MetricSink>,
    ) -> Result<Self> {
        cfg.validate()?;

        let exporter = Arc::new(PullExporter::new(&cfg.app_info.version));
        let emitter = MetricsEmitter::new(sink);
        let logger = RequestLogger::new(connector, Arc::clone(&exporter));

        let mut hooks = LifecycleHooks::new();
        setup_metrics(&mut hooks, &emitter);

        let simulation = SimulationPolicy::new(&cfg.simulation);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                hooks,
                logger,
                emitter,
                exporter,
                simulation,
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn hooks(&self) -> &LifecycleHooks {
        &self.inner.hooks
    }

    pub fn logger(&self) -> &RequestLogger {
        &self.inner.logger
    }

    pub fn emitter(&self) -> &MetricsEmitter {
        &self.inner.emitter
    }

    pub fn exporter(&self) -> Arc<PullExporter> {
        Arc::clone(&self.inner.exporter)
    }

    pub fn simulation(&self) -> &SimulationPolicy {
        &self.inner.simulation
    }
}
