//! Connection pool manager.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use ra_transport::ConnectionId;
use tokio::sync::Notify;

use super::types::{PoolState, PoolStats, RetainResult};

#[derive(Debug)]
struct PooledConnection {
    state: PoolState,
    since: Instant,
    evict: Arc<Notify>,
}

/// Retained connections of one listener.
///
/// Mutated only by the dispatcher; wrap in a mutex to share between tasks.
#[derive(Debug)]
pub struct ConnectionPool {
    capacity: usize,
    connections: HashMap<ConnectionId, PooledConnection>,
}

impl ConnectionPool {
    /// Create an empty pool
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            connections: HashMap::with_capacity(capacity.min(1024)),
        }
    }

    /// Maximum retained connections
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained connections in any state
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Get idle count
    pub fn idle_count(&self) -> usize {
        self.count(PoolState::Idle)
    }

    /// Get active count
    pub fn active_count(&self) -> usize {
        self.count(PoolState::Active)
    }

    /// State of a retained connection
    pub fn state(&self, id: ConnectionId) -> Option<PoolState> {
        self.connections.get(&id).map(|c| c.state)
    }

    /// Retain `id` as idle after a keep-alive request.
    ///
    /// `evict` is notified if the connection is later chosen as a victim.
    pub fn retain(&mut self, id: ConnectionId, evict: Arc<Notify>, now: Instant) -> RetainResult {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.state = PoolState::Idle;
            conn.since = now;
            return RetainResult::Retained;
        }

        let entry = PooledConnection {
            state: PoolState::Idle,
            since: now,
            evict,
        };

        if self.connections.len() < self.capacity {
            self.connections.insert(id, entry);
            return RetainResult::Retained;
        }

        if let Some(victim) = self.find_eviction_candidate() {
            if let Some(evicted) = self.connections.remove(&victim) {
                evicted.evict.notify_one();
            }
            self.connections.insert(id, entry);
            return RetainResult::Evicted(victim);
        }

        RetainResult::Refused
    }

    /// Mark a retained connection active for its next request.
    ///
    /// Returns `false` if it is no longer pooled (it was evicted).
    pub fn activate(&mut self, id: ConnectionId, now: Instant) -> bool {
        match self.connections.get_mut(&id) {
            Some(conn) => {
                conn.state = PoolState::Active;
                conn.since = now;
                true
            }
            None => false,
        }
    }

    /// Forget a connection that is being closed
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.connections.remove(&id).is_some()
    }

    /// Get statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle_count(),
            active: self.active_count(),
            capacity: self.capacity,
        }
    }

    /// Longest-idle connection
    fn find_eviction_candidate(&self) -> Option<ConnectionId> {
        self.connections
            .iter()
            .filter(|(_, c)| c.state == PoolState::Idle)
            .min_by_key(|(_, c)| c.since)
            .map(|(id, _)| *id)
    }

    fn count(&self, state: PoolState) -> usize {
        self.connections.values().filter(|c| c.state == state).count()
    }
}
