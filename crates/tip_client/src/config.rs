use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9999;

/// Where the TIP service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Hostname or IP of the Raspberry Pi running the service
    pub address: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect/read/write timeout in milliseconds. 0 = block forever.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_timeout() -> u64 {
    5_000
}

impl ClientConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: default_port(),
            timeout_ms: default_timeout(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// `host:port` string suitable for `ToSocketAddrs`.
    ///
    /// An address that already carries a port (`10.0.0.5:7000`) is used as is.
    /// Bare IPv6 literals are bracketed.
    pub fn target(&self) -> String {
        if self.address.parse::<std::net::SocketAddr>().is_ok() {
            return self.address.clone();
        }
        match self.address.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{ip}]:{}", self.port),
            _ => format!("{}:{}", self.address, self.port),
        }
    }
}
