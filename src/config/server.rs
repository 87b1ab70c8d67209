//! HTTP listener settings

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

const DEFAULT_PORT: u16 = 4242;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the checkout server listens.
///
/// Every field has a default, so the whole `server` section may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind (`0.0.0.0` listens on every interface).
    pub host: String,

    pub port: u16,

    pub environment: Environment,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Upper bound on handling one inbound request.
    pub request_timeout_secs: u64,

    /// Folder served at `/`; must contain `index.html`.
    pub static_dir: String,
}

/// Deployment stage. Production forbids unsigned webhooks.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            log_level: "info,saved_card_charge=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            static_dir: "public".to_string(),
        }
    }
}

impl ServerConfig {
    /// Address handed to the TCP listener. `host` must be a literal IP.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(self.static_dir.trim())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.socket_addr()?;
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.static_dir.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STATIC_DIR"));
        }
        Ok(())
    }
}
