//! Server and handler errors.

use ra_transport::{Endpoint, TransportError};
use ra_wire::WireError;
use thiserror::Error;

/// Errors surfaced by the server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A listener could not be bound. The server keeps running.
    #[error("listener bind failed: {0}")]
    Bind(#[from] TransportError),

    /// A listener configuration cannot be served.
    #[error("invalid listener config: {0}")]
    InvalidConfig(&'static str),

    /// Every configured listener failed to bind.
    #[error("no listener could be started (failed: {failed:?})")]
    NoListeners {
        /// Endpoints that failed to bind.
        failed: Vec<Endpoint>,
    },

    /// The server is already shutting down.
    #[error("server is terminating")]
    Terminating,
}

/// Errors a handler reports for one invocation.
///
/// Any error discards the connection; it is never returned to the pool.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Connection failure while reading or writing the body.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Malformed message body.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The peer broke the handler's protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A collaborator the handler depends on failed.
    #[error("{context}: {message}")]
    Collaborator {
        /// What the handler was doing.
        context: &'static str,
        /// The collaborator's error.
        message: String,
    },
}

impl HandlerError {
    /// Whether the peer simply went away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, HandlerError::Transport(e) if e.is_closed())
    }
}
