use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use pulsecheck_core::error::{PulseCheckError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub app: AppSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            app: AppSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PulseCheckError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.app.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Grace window for in-flight requests on shutdown before the process
    /// force-exits.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,

    /// Directory served at `/` (index.html) and `/static`. Absent: those
    /// routes fall through to the 404 fallback.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
            static_dir: None,
        }
    }
}

impl ServerSection {
    /// Listen address as a typed `SocketAddr`; the single place the string
    /// form is parsed.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            PulseCheckError::InvalidConfig(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1_000..=120_000).contains(&self.shutdown_grace_ms) {
            return Err(PulseCheckError::InvalidConfig(
                "server.shutdown_grace_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_shutdown_grace_ms() -> u64 {
    15_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    /// Instance identifier reported by `/api/info` (pod name, hostname, ...).
    #[serde(default = "default_instance")]
    pub instance: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
            instance: default_instance(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PulseCheckError::InvalidConfig("app.name must not be empty".into()));
        }
        if self.environment.is_empty() {
            return Err(PulseCheckError::InvalidConfig(
                "app.environment must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_app_name() -> String {
    "pulsecheck".into()
}
fn default_environment() -> String {
    "development".into()
}
fn default_instance() -> String {
    "localhost".into()
}
