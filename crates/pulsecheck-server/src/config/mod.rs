//! Service config loader (strict parsing + env overrides).
//!
//! Resolution order: `PULSECHECK_CONFIG` path if set, else `pulsecheck.yaml`
//! next to the process if present, else built-in defaults. Environment
//! variables (`PORT`, `APP_ENV`, `INSTANCE`) override the loaded values.

pub mod schema;

use std::fs;
use std::path::Path;

use pulsecheck_core::error::{PulseCheckError, Result};

pub use schema::{AppSection, ServerSection, ServiceConfig};

const CONFIG_PATH_VAR: &str = "PULSECHECK_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "pulsecheck.yaml";

/// Load config from the resolved file (or defaults) and apply env overrides.
pub fn load() -> Result<ServiceConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => load_from_file(DEFAULT_CONFIG_FILE)?,
        Err(_) => ServiceConfig::default(),
    };
    apply_env_overrides(&mut cfg, |name| std::env::var(name).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PulseCheckError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| PulseCheckError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply environment overrides. The lookup is injected so tests can drive it
/// without touching the process environment.
pub fn apply_env_overrides<F>(cfg: &mut ServiceConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.parse().map_err(|_| {
            PulseCheckError::InvalidConfig(format!("PORT must be a port number, got {port:?}"))
        })?;
        let mut addr = cfg.server.listen_addr()?;
        addr.set_port(port);
        cfg.server.listen = addr.to_string();
    }
    if let Some(env) = lookup("APP_ENV") {
        cfg.app.environment = env;
    }
    if let Some(instance) = lookup("INSTANCE") {
        cfg.app.instance = instance;
    }
    Ok(())
}
