//! Sealed RPC messages.

use std::sync::Arc;

use crate::prefix::LENGTH_PREFIX_SIZE;
use crate::reader::RpcReader;

/// An immutable RPC message produced by [`RpcWriter::seal`](crate::RpcWriter::seal).
///
/// Cloning shares the underlying bytes, so one canned response can be sent
/// from many connections at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcMessage {
    bytes: Arc<[u8]>,
    size_at_front: bool,
    arg_count: usize,
}

impl RpcMessage {
    pub(crate) fn new(bytes: Arc<[u8]>, size_at_front: bool, arg_count: usize) -> Self {
        Self {
            bytes,
            size_at_front,
            arg_count,
        }
    }

    /// Wire bytes, size header included when present.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Argument bytes without the size header.
    pub fn payload(&self) -> &[u8] {
        if self.size_at_front {
            &self.bytes[LENGTH_PREFIX_SIZE..]
        } else {
            &self.bytes
        }
    }

    /// Whether the message carries its own size header.
    pub fn has_size_at_front(&self) -> bool {
        self.size_at_front
    }

    /// Number of arguments in the message.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Total wire length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the wire form is empty (only for a headerless zero-argument message).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A reader over the message arguments.
    pub fn reader(&self) -> RpcReader<'_> {
        RpcReader::new(self.payload())
    }
}
