//! DogStatsD push client over raw UDP.
//!
//! Best-effort delivery: the socket is non-blocking, a datagram that would
//! block is dropped, and nothing is retried. The agent address is resolved
//! off the request path by a background task; until it resolves, samples are
//! dropped without touching DNS.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;

use jrdemo_core::error::{DemoError, Result};
use jrdemo_core::sample::MetricSample;

use crate::config::StatsdSection;

const RESOLVE_RETRY: Duration = Duration::from_secs(5);

/// Destination for encoded metric samples.
pub trait MetricSink: Send + Sync {
    fn send(&self, sample: &MetricSample) -> Result<()>;
}

#[derive(Debug)]
pub struct StatsdClient {
    socket: UdpSocket,
    host: String,
    port: u16,
    agent_addr: Arc<OnceLock<SocketAddr>>,
    prefix: Option<String>,
}

impl StatsdClient {
    /// Bind the sending socket. An IP-literal host is resolved immediately;
    /// anything else waits for [`StatsdClient::resolve_in_background`].
    pub fn new(cfg: &StatsdSection) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        let agent_addr = Arc::new(OnceLock::new());
        if let Ok(ip) = cfg.host.parse() {
            let _ = agent_addr.set(SocketAddr::new(ip, cfg.port));
        }
        Ok(Self {
            socket,
            host: cfg.host.clone(),
            port: cfg.port,
            agent_addr,
            prefix: cfg.prefix.clone(),
        })
    }

    pub fn agent(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_resolved(&self) -> bool {
        self.agent_addr.get().is_some()
    }

    /// Spawn a task that looks the agent up until it succeeds.
    /// Returns `None` when the address is already known.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resolve_in_background(&self) -> Option<JoinHandle<()>> {
        if self.is_resolved() {
            return None;
        }
        let slot = Arc::clone(&self.agent_addr);
        let host = self.host.clone();
        let port = self.port;
        Some(tokio::spawn(async move {
            loop {
                match tokio::net::lookup_host((host.as_str(), port)).await {
                    Ok(mut addrs) => {
                        if let Some(addr) = addrs.next() {
                            let _ = slot.set(addr);
                            tracing::info!(%host, %addr, "statsd agent resolved");
                            return;
                        }
                        tracing::warn!(%host, "statsd agent lookup returned no address");
                    }
                    Err(e) => tracing::warn!(%host, error = %e, "statsd agent lookup failed"),
                }
                tokio::time::sleep(RESOLVE_RETRY).await;
            }
        }))
    }
}

impl MetricSink for StatsdClient {
    fn send(&self, sample: &MetricSample) -> Result<()> {
        let addr = *self.agent_addr.get().ok_or_else(|| {
            DemoError::MetricsTransport(format!("agent {} not resolved yet", self.agent()))
        })?;
        let line = sample.to_line(self.prefix.as_deref());
        match self.socket.send_to(line.as_bytes(), addr) {
            Ok(_) => {
                tracing::trace!(metric = sample.name, %line, "sent metric");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                tracing::warn!(metric = sample.name, error = %e, "dropped metric: send would block");
                Ok(())
            }
            Err(e) => Err(DemoError::MetricsTransport(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jrdemo_core::sample::{RequestTags, REQUEST_COUNT};
    use std::time::Instant;

    fn client(host: &str, port: u16) -> StatsdClient {
        StatsdClient::new(&StatsdSection {
            host: host.into(),
            port,
            prefix: None,
        })
        .unwrap()
    }

    fn sample() -> MetricSample {
        MetricSample::counter(REQUEST_COUNT, RequestTags::new("/", "GET", 200))
    }

    #[test]
    fn datagram_reaches_local_agent() {
        let agent = UdpSocket::bind("127.0.0.1:0").unwrap();
        agent.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let port = agent.local_addr().unwrap().port();

        let client = client("127.0.0.1", port);
        assert!(client.is_resolved());
        client.send(&sample()).unwrap();

        let mut buf = [0u8; 512];
        let n = agent.recv(&mut buf).unwrap();
        assert_eq!(
            std::str::from_utf8(&buf[..n]).unwrap(),
            "request_count:1|c|#service:webapp,endpoint:/,method:GET,status:200"
        );
    }

    #[test]
    fn unresolved_agent_drops_without_lookup() {
        let client = client("statsd.invalid", 9125);
        assert!(!client.is_resolved());

        let started = Instant::now();
        for _ in 0..1000 {
            let err = client.send(&sample()).unwrap_err();
            assert!(matches!(err, DemoError::MetricsTransport(_)));
        }
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!client.is_resolved());
    }

    #[tokio::test]
    async fn hostname_resolves_in_background() {
        let client = client("localhost", 9125);
        assert!(!client.is_resolved());

        let task = client.resolve_in_background().unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(client.is_resolved());
        assert!(client.resolve_in_background().is_none());
    }
}
