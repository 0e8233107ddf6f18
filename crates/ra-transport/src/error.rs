//! Transport errors.

use std::io;

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Errors from listeners and connections.
///
/// Bind failures take one listener out of service. Every other variant ends
/// the current use of a single connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A listener could not bind its endpoint.
    #[error("failed to bind {endpoint}: {source}")]
    Bind {
        /// Endpoint that failed.
        endpoint: Endpoint,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A client connection could not be established.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        /// Endpoint that failed.
        endpoint: Endpoint,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The peer closed the connection at a pack boundary.
    #[error("connection closed by peer")]
    Closed,

    /// A received pack announced a length above the limit.
    #[error("pack of {len} bytes exceeds limit of {max}")]
    PackTooLarge {
        /// Announced length.
        len: u64,
        /// Accepted maximum.
        max: usize,
    },

    /// A pack expected to hold text was not UTF-8.
    #[error("pack is not valid UTF-8")]
    InvalidUtf8,

    /// The transport kind is unavailable on this platform.
    #[error("{0} transport is not supported on this platform")]
    Unsupported(&'static str),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// Whether the error is an orderly close rather than a failure.
    pub fn is_closed(&self) -> bool {
        match self {
            TransportError::Closed => true,
            TransportError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
