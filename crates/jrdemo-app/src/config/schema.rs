use std::net::SocketAddr;

use serde::Deserialize;
use jrdemo_core::error::{DemoError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub statsd: StatsdSection,

    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub app_info: AppInfoSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            statsd: StatsdSection::default(),
            simulation: SimulationSection::default(),
            app_info: AppInfoSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DemoError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.database.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the value for a key, or `None` when unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.server.listen = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = parse_port("DB_PORT", &v)?;
        }
        if let Some(v) = lookup("STATSD_HOST") {
            self.statsd.host = v;
        }
        if let Some(v) = lookup("STATSD_PORT") {
            self.statsd.port = parse_port("STATSD_PORT", &v)?;
        }
        Ok(())
    }
}

fn parse_port(key: &str, v: &str) -> Result<u16> {
    v.trim()
        .parse::<u16>()
        .map_err(|e| DemoError::BadRequest(format!("{key} must be a port number: {e}")))
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            DemoError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}

/// Connection parameters for the request log database.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            name: default_db_name(),
            user: default_db_user(),
            password: default_db_password(),
            host: default_db_host(),
            port: default_db_port(),
        }
    }
}

impl DatabaseSection {
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(DemoError::BadRequest("database.port must be non-zero".into()));
        }
        if self.host.is_empty() {
            return Err(DemoError::BadRequest("database.host must not be empty".into()));
        }
        Ok(())
    }
}

fn default_db_name() -> String {
    "postgres".into()
}
fn default_db_user() -> String {
    "root".into()
}
fn default_db_password() -> String {
    "changeme".into()
}
fn default_db_host() -> String {
    "postgres".into()
}
fn default_db_port() -> u16 {
    5432
}

/// DogStatsD agent address.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsdSection {
    #[serde(default = "default_statsd_host")]
    pub host: String,
    #[serde(default = "default_statsd_port")]
    pub port: u16,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl Default for StatsdSection {
    fn default() -> Self {
        Self {
            host: default_statsd_host(),
            port: default_statsd_port(),
            prefix: None,
        }
    }
}

fn default_statsd_host() -> String {
    "statsd".into()
}
fn default_statsd_port() -> u16 {
    9125
}

/// `/simulation` endpoint policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            error_rate: default_error_rate(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(DemoError::BadRequest(
                "simulation.error_rate must be between 0 and 1".into(),
            ));
        }
        if self.latency_min_ms > self.latency_max_ms {
            return Err(DemoError::BadRequest(
                "simulation.latency_min_ms must not exceed latency_max_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_error_rate() -> f64 {
    0.1
}
fn default_latency_min_ms() -> u64 {
    100
}
fn default_latency_max_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppInfoSection {
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppInfoSection {
    fn default() -> Self {
        Self { version: default_app_version() }
    }
}

fn default_app_version() -> String {
    "1.0.3".into()
}
