//! Server and networking configuration types.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use serde::Deserialize;

use super::ConfigError;

/// Default listen address (all interfaces, port 5000).
pub const DEFAULT_LISTEN_ADDR: &str = ":5000";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on. A bare `:port` binds all interfaces.
    pub addr: String,
    /// Enable debug-level logging.
    pub verbose: bool,
    /// HTTPS settings.
    pub tls: TlsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_LISTEN_ADDR.to_string(),
            verbose: false,
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve the configured address to a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = if self.addr.starts_with(':') {
            format!("0.0.0.0{}", self.addr)
        } else {
            self.addr.clone()
        };

        addr.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::InvalidListenAddr(self.addr.clone()))
    }
}

/// TLS configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Serve HTTPS instead of HTTP.
    pub enabled: bool,
    /// PEM certificate chain (e.g. cert.pem).
    pub cert: String,
    /// PEM private key (e.g. key.pem).
    pub key: String,
}

impl TlsConfig {
    /// Certificate and key paths; both are required once TLS is enabled.
    pub fn pem_files(&self) -> Result<(PathBuf, PathBuf), ConfigError> {
        if self.cert.is_empty() {
            return Err(ConfigError::MissingTlsFile("cert"));
        }
        if self.key.is_empty() {
            return Err(ConfigError::MissingTlsFile("key"));
        }
        Ok((PathBuf::from(&self.cert), PathBuf::from(&self.key)))
    }
}
