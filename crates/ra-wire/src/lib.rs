//! # RA Wire Codec
//!
//! Compact binary RPC framing used between peers of the attestation server.
//!
//! ## Message Layout
//!
//! ```text
//! [size header: u64 LE]?  [arg 0] [arg 1] ... [arg N-1]
//!
//! string arg    = [length: u64 LE][content bytes]
//! primitive arg = [value: fixed-width LE]
//! ```
//!
//! The optional size header carries the length of everything after it, so a
//! message built with a size header is already a complete transport "pack"
//! and can be written to a connection as raw bytes.
//!
//! ## Capacity Rules
//!
//! Capacity is always derivable before construction:
//!
//! ```rust
//! use ra_wire::{calc_size_str, RpcWriter};
//!
//! let gid = b"00000b1f";
//! let mut writer = RpcWriter::new(calc_size_str(gid.len()), 1).unwrap();
//! writer.add_string_arg(gid.len()).unwrap().fill(gid).unwrap();
//! let message = writer.seal().unwrap();
//! assert_eq!(message.payload().len(), calc_size_str(gid.len()));
//! ```
//!
//! A writer never grows. Running out of capacity, leaving capacity unused,
//! or reading before every declared slot is filled are all errors.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod message;
mod prefix;
mod reader;
mod writer;

pub use error::WireError;
pub use message::RpcMessage;
pub use prefix::{
    calc_size_prim, calc_size_str, decode_length, encode_length, WirePrimitive,
    LENGTH_PREFIX_SIZE,
};
pub use reader::RpcReader;
pub use writer::{RpcWriter, StringArg};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
