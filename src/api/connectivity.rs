//! Network reachability checks
//!
//! The cached client asks a [`Connectivity`] before every GET to decide
//! between the network and the cache. Nothing is remembered between calls.

use futures::future::{BoxFuture, FutureExt};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;
use url::{Host, Url};

use super::error::ApiError;

/// Snapshot of the current network state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    pub is_connected: bool,
}

/// Capability that reports whether the API can currently be reached
pub trait Connectivity: Send + Sync + Debug {
    fn fetch(&self) -> BoxFuture<'_, NetworkState>;
}

/// Reports a fixed state, switchable at runtime
#[derive(Debug)]
pub struct FixedConnectivity {
    connected: AtomicBool,
}

impl FixedConnectivity {
    pub fn online() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl Connectivity for FixedConnectivity {
    fn fetch(&self) -> BoxFuture<'_, NetworkState> {
        let is_connected = self.connected.load(Ordering::Relaxed);
        futures::future::ready(NetworkState { is_connected }).boxed()
    }
}

/// Considers the network up when a TCP connection to the API host opens
/// within the timeout
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probes the host and port of `api_root` (default port for the scheme
    /// when none is given)
    pub fn for_url(api_root: &str, timeout: Duration) -> Result<Self, ApiError> {
        let url = Url::parse(api_root)?;
        // IPv6 literals are bracketed in URLs but not in socket addresses
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(ApiError::InvalidUrl(url::ParseError::EmptyHost)),
        };
        let port = url
            .port_or_known_default()
            .ok_or(ApiError::InvalidUrl(url::ParseError::InvalidPort))?;
        Ok(Self::new(host, port, timeout))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Connectivity for TcpProbe {
    fn fetch(&self) -> BoxFuture<'_, NetworkState> {
        async move {
            let connect = TcpStream::connect((self.host.as_str(), self.port));
            let is_connected = matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)));
            debug!(host = %self.host, port = self.port, is_connected, "Connectivity probe");
            NetworkState { is_connected }
        }
        .boxed()
    }
}
