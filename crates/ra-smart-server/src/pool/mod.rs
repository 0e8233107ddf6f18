//! # Connection Pool
//!
//! Accounting for the keep-alive connections one listener retains.
//!
//! ## Design
//!
//! - **Active**: a request is being processed on the connection.
//! - **Idle**: retained, waiting for the peer's next category tag.
//!
//! When the pool is full, retaining another connection evicts the idle
//! connection that has waited longest. Active connections are never evicted;
//! if every retained connection is active, the returning one is refused and
//! closed instead.
//!
//! The pool only tracks identities and state. The owning connection task
//! holds the socket and is told to close through its eviction notifier.

mod manager;
mod types;

pub use manager::ConnectionPool;
pub use types::{PoolState, PoolStats, RetainResult};
