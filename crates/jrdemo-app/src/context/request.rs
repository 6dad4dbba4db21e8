use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use tokio::sync::{Mutex, MutexGuard};

use jrdemo_core::error::{DemoError, Result};

use crate::store::{Connector, LogConnection};

/// Immutable facts about the inbound request.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    pub path: String,
    pub remote_addr: Option<IpAddr>,
}

impl RequestMeta {
    pub fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().as_str().to_owned(),
            path: req.uri().path().to_owned(),
            remote_addr: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip()),
        }
    }
}

/// Per-request connection state.
pub enum DbSlot {
    Empty,
    Open(Box<dyn LogConnection>),
    /// Acquisition failed; not retried within this request.
    Unavailable(String),
    Released,
}

/// State that lives exactly as long as one request.
///
/// Shared with handlers as `Arc<RequestContext>` through request extensions.
/// The database connection is opened on first use and closed by
/// [`RequestContext::teardown`]; if teardown never runs (the request future
/// was dropped) the connection is released when the context drops.
pub struct RequestContext {
    meta: RequestMeta,
    started_at: OnceLock<Instant>,
    db: Mutex<DbSlot>,
    opened: AtomicU32,
}

impl RequestContext {
    pub fn new(meta: RequestMeta) -> Self {
        Self {
            meta,
            started_at: OnceLock::new(),
            db: Mutex::new(DbSlot::Empty),
            opened: AtomicU32::new(0),
        }
    }

    pub fn meta(&self) -> &RequestMeta {
        &self.meta
    }
    pub fn path(&self) -> &str {
        &self.meta.path
    }
    pub fn method(&self) -> &str {
        &self.meta.method
    }
    pub fn remote_addr(&self) -> Option<IpAddr> {
        self.meta.remote_addr
    }

    /// Record the start time. The first call wins.
    pub fn mark_started(&self) {
        if self.started_at.set(Instant::now()).is_err() {
            tracing::debug!("start time already recorded");
        }
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at.get().copied()
    }

    /// Number of connections opened for this request (0 or 1).
    pub fn connections_opened(&self) -> u32 {
        self.opened.load(Ordering::Relaxed)
    }

    /// Get the request's connection slot, opening it on first use.
    ///
    /// The returned guard always holds [`DbSlot::Open`].
    pub async fn connection(&self, connector: &dyn Connector) -> Result<MutexGuard<'_, DbSlot>> {
        let mut slot = self.db.lock().await;
        if matches!(*slot, DbSlot::Empty) {
            *slot = match connector.connect().await {
                Ok(conn) => {
                    self.opened.fetch_add(1, Ordering::Relaxed);
                    tracing::info!("database connection established");
                    DbSlot::Open(conn)
                }
                Err(e) => {
                    tracing::error!(error = %e, "error connecting to the database");
                    DbSlot::Unavailable(e.to_string())
                }
            };
        }
        if matches!(*slot, DbSlot::Open(_)) {
            return Ok(slot);
        }
        let reason = match &*slot {
            DbSlot::Unavailable(reason) => reason.clone(),
            _ => "connection already released".into(),
        };
        Err(DemoError::Database(reason))
    }

    /// Close the connection if one was opened. Returns whether one was closed.
    pub async fn teardown(&self) -> Result<bool> {
        let prev = std::mem::replace(&mut *self.db.lock().await, DbSlot::Released);
        match prev {
            DbSlot::Open(conn) => {
                conn.close().await?;
                tracing::info!("database connection closed");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        if matches!(self.db.get_mut(), DbSlot::Open(_)) {
            tracing::warn!(path = %self.meta.path, "request ended before teardown; dropping database connection");
        }
    }
}
