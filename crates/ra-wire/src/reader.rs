//! RPC message reader.

use crate::error::WireError;
use crate::prefix::{decode_length, WirePrimitive, LENGTH_PREFIX_SIZE};

/// Sequential reader over the arguments of an RPC message.
#[derive(Debug, Clone)]
pub struct RpcReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RpcReader<'a> {
    /// Read arguments from a payload that has no size header.
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            data: payload,
            pos: 0,
        }
    }

    /// Read arguments from a message that starts with its own size header.
    pub fn with_size_at_front(bytes: &'a [u8]) -> Result<Self, WireError> {
        let declared = decode_length(bytes).ok_or(WireError::Truncated {
            needed: LENGTH_PREFIX_SIZE,
            available: bytes.len(),
        })?;
        let payload = &bytes[LENGTH_PREFIX_SIZE..];
        if declared != payload.len() as u64 {
            return Err(WireError::SizeHeaderMismatch {
                declared,
                actual: payload.len(),
            });
        }
        Ok(Self::new(payload))
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Read the next length-prefixed string argument.
    ///
    /// On error nothing is consumed.
    pub fn next_string_arg(&mut self) -> Result<&'a [u8], WireError> {
        let available = self.remaining();
        let len = decode_length(&self.data[self.pos..]).ok_or(WireError::Truncated {
            needed: LENGTH_PREFIX_SIZE,
            available,
        })?;
        let content = usize::try_from(len).unwrap_or(usize::MAX);
        if content > available - LENGTH_PREFIX_SIZE {
            return Err(WireError::Truncated {
                needed: content,
                available: available - LENGTH_PREFIX_SIZE,
            });
        }

        self.pos += LENGTH_PREFIX_SIZE;
        self.take(content)
    }

    /// Read the next primitive argument.
    pub fn next_primitive_arg<T: WirePrimitive>(&mut self) -> Result<T, WireError> {
        let raw = self.take(T::WIRE_SIZE)?;
        Ok(T::read_le(raw))
    }

    /// Ensure every byte has been consumed.
    pub fn finish(self) -> Result<(), WireError> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(WireError::TrailingBytes(extra)),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let available = self.remaining();
        if len > available {
            return Err(WireError::Truncated {
                needed: len,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}
