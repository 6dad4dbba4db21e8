//! App config loader (strict parsing, env overrides).
//!
//! Precedence: defaults, then the optional YAML file, then environment.

pub mod schema;

use std::fs;
use std::path::Path;

use jrdemo_core::error::{DemoError, Result};

pub use schema::{
    AppConfig, AppInfoSection, DatabaseSection, ServerSection, SimulationSection, StatsdSection,
};

/// Env var naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "JRDEMO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "jrdemo.yaml";

/// Load from the optional YAML file and the process environment.
pub fn load() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut cfg = if Path::new(&path).exists() {
        load_from_file(&path)?
    } else {
        tracing::debug!(%path, "config file not found, using defaults");
        AppConfig::default()
    };
    cfg.apply_env(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DemoError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| DemoError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
