//! In-memory collaborators for router tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt; // .oneshot()

use jrdemo_app::app_state::AppState;
use jrdemo_app::config::AppConfig;
use jrdemo_app::obs::MetricSink;
use jrdemo_app::store::{Connector, LogConnection};
use jrdemo_core::error::{DemoError, Result};
use jrdemo_core::record::LogRow;
use jrdemo_core::sample::MetricSample;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbEvent {
    Open,
    Begin,
    Insert,
    Commit,
    Rollback,
    Close,
}

#[derive(Default)]
pub struct FakeDb {
    pub fail_connect: AtomicBool,
    pub fail_insert: AtomicBool,
    pub attempts: AtomicU32,
    pub opens: AtomicU32,
    pub closes: AtomicU32,
    /// Connections released by any path, including a plain drop.
    pub drops: AtomicU32,
    pub rows: Mutex<Vec<LogRow>>,
    pub events: Mutex<Vec<DbEvent>>,
}

impl FakeDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unreachable() -> Arc<Self> {
        let db = Self::default();
        db.fail_connect.store(true, Ordering::SeqCst);
        Arc::new(db)
    }

    pub fn rows(&self) -> Vec<LogRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<DbEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> u32 {
        self.drops.load(Ordering::SeqCst)
    }

    fn push(&self, e: DbEvent) {
        self.events.lock().unwrap().push(e);
    }
}

pub struct FakeConnector(pub Arc<FakeDb>);

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn LogConnection>> {
        self.0.attempts.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_connect.load(Ordering::SeqCst) {
            return Err(DemoError::Database("connection refused".into()));
        }
        self.0.opens.fetch_add(1, Ordering::SeqCst);
        self.0.push(DbEvent::Open);
        Ok(Box::new(FakeConnection {
            db: Arc::clone(&self.0),
            pending: Vec::new(),
        }))
    }
}

struct FakeConnection {
    db: Arc<FakeDb>,
    pending: Vec<LogRow>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.db.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LogConnection for FakeConnection {
    async fn begin(&mut self) -> Result<()> {
        self.db.push(DbEvent::Begin);
        Ok(())
    }

    async fn insert(&mut self, row: &LogRow) -> Result<()> {
        self.db.push(DbEvent::Insert);
        if self.db.fail_insert.load(Ordering::SeqCst) {
            return Err(DemoError::Database("relation \"request_log\" does not exist".into()));
        }
        self.pending.push(row.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.db.push(DbEvent::Commit);
        self.db.rows.lock().unwrap().append(&mut self.pending);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.db.push(DbEvent::Rollback);
        self.pending.clear();
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.db.closes.fetch_add(1, Ordering::SeqCst);
        self.db.push(DbEvent::Close);
        Ok(())
    }
}

/// Captures every pushed sample in order.
#[derive(Default)]
pub struct CaptureSink {
    pub samples: Mutex<Vec<MetricSample>>,
    pub fail: AtomicBool,
}

impl CaptureSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples.lock().unwrap().clone()
    }
}

impl MetricSink for CaptureSink {
    fn send(&self, sample: &MetricSample) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DemoError::MetricsTransport("agent unreachable".into()));
        }
        self.samples.lock().unwrap().push(sample.clone());
        Ok(())
    }
}

pub fn fast_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.simulation.latency_min_ms = 5;
    cfg.simulation.latency_max_ms = 20;
    cfg
}

pub fn state(cfg: AppConfig, db: &Arc<FakeDb>, sink: &Arc<CaptureSink>) -> AppState {
    AppState::with_parts(cfg, Arc::new(FakeConnector(Arc::clone(db))), Arc::clone(sink) as Arc<dyn MetricSink>)
        .unwrap()
}

pub fn get_req(uri: &str) -> Request<Body> {
    let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let peer: SocketAddr = "10.0.0.7:40000".parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(peer));
    req
}

pub async fn call(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app.clone().oneshot(get_req(uri)).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
