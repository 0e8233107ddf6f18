//! # RA Transport
//!
//! Byte-stream transports for the smart server.
//!
//! ## Module Structure
//!
//! ```text
//! ra-transport/
//! ├── endpoint     # Where a listener binds / a client connects
//! ├── connection   # Framed send/receive over any byte stream
//! └── listener     # TCP and local (Unix domain socket) listeners
//! ```
//!
//! ## Framing
//!
//! A "pack" is `[length: u64 LE][payload]`, the same prefix the wire codec
//! uses. An RPC message sealed with a size header is therefore already a
//! pack and goes out through [`Connection::send_raw`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod connection;
mod endpoint;
mod error;
mod listener;

pub use connection::{ByteStream, Connection, ConnectionId, MAX_PACK_SIZE};
pub use endpoint::Endpoint;
pub use error::TransportError;
pub use listener::{bind, Listener, TcpServer};

#[cfg(unix)]
pub use listener::LocalServer;
