//! Connection pool types.

use ra_transport::ConnectionId;

/// State of a retained connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Waiting for the next request.
    Idle,
    /// A handler invocation owns it.
    Active,
}

/// Result of trying to retain a connection after a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetainResult {
    /// Retained (a slot was available or it was already pooled)
    Retained,
    /// Retained after evicting the longest-idle connection
    Evicted(ConnectionId),
    /// No slot and nothing evictable; close the connection
    Refused,
}

/// Pool statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Retained connections waiting for a request.
    pub idle: usize,
    /// Retained connections currently being served.
    pub active: usize,
    /// Maximum retained connections.
    pub capacity: usize,
}
