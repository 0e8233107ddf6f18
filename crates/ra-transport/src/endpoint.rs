//! Listener and client endpoints.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Address of a listener, by transport kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// TCP socket address.
    Tcp(SocketAddr),
    /// Local (Unix domain) socket path.
    Local(PathBuf),
}

impl Endpoint {
    /// Transport kind label, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Endpoint::Tcp(_) => "tcp",
            Endpoint::Local(_) => "local",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
            Endpoint::Local(path) => write!(f, "local://{}", path.display()),
        }
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Endpoint::Tcp(addr)
    }
}

/// Parses `tcp://host:port`, `local://path`, or a bare `host:port`.
impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("local://") {
            if path.is_empty() {
                return Err("empty local socket path".to_string());
            }
            return Ok(Endpoint::Local(PathBuf::from(path)));
        }
        let addr = s.strip_prefix("tcp://").unwrap_or(s);
        addr.parse::<SocketAddr>()
            .map(Endpoint::Tcp)
            .map_err(|e| format!("invalid endpoint '{}': {}", s, e))
    }
}
