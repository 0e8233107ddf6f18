//! # RA Smart Server
//!
//! Binds any number of listeners, each paired with a [`ConnectionHandler`],
//! a connection-pool capacity and a worker limit, and dispatches every
//! accepted connection by its category tag.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! accept ──► read category ──► known? ──no──► close (no bytes, no handler call)
//!                 ▲               │
//!                 │              yes
//!                 │               ▼
//!                 │        acquire worker permit
//!                 │               ▼
//!                 │        handler.process()
//!                 │               │
//!                 │     Err ──────┼──────► discard
//!                 │               ▼
//!                 │        release auxiliary connections
//!                 │               ▼
//!                 └─ pooled ◄─ keep_alive? ──no──► close
//! ```
//!
//! A connection is owned by exactly one task, so requests on one connection
//! are processed strictly in arrival order. Across connections nothing is
//! ordered.
//!
//! ## Module Structure
//!
//! ```text
//! ra-smart-server/
//! ├── config      # ListenerConfig (pool capacity, worker limit)
//! ├── handler     # ConnectionHandler capability + Disposition
//! ├── pool/       # Per-listener retained-connection accounting
//! ├── dispatcher  # Accept loop and per-connection task
//! ├── shutdown    # Cooperative terminate signal
//! └── server      # SmartServer lifecycle
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod dispatcher;
mod error;
mod handler;
pub mod pool;
mod server;
mod shutdown;

pub use config::ListenerConfig;
pub use error::{HandlerError, ServerError};
pub use handler::{ConnectionHandler, Disposition, MAX_CATEGORY_LEN};
pub use pool::PoolStats;
pub use server::{SmartServer, TerminateHandle};
pub use shutdown::ShutdownSignal;
