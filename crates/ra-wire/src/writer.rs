//! RPC message writer.

use crate::error::WireError;
use crate::message::RpcMessage;
use crate::prefix::{encode_length, WirePrimitive, LENGTH_PREFIX_SIZE};

/// Builds an RPC message into a buffer allocated once, at its exact size.
///
/// The writer is created with the content capacity (the sum of
/// [`calc_size_str`](crate::calc_size_str) / [`calc_size_prim`](crate::calc_size_prim)
/// over every argument) and the number of arguments it will hold.
#[derive(Debug)]
pub struct RpcWriter {
    buf: Vec<u8>,
    header_len: usize,
    capacity: usize,
    arg_count: usize,
    args_added: usize,
    /// Index of a string slot handed out but not yet filled.
    pending: Option<usize>,
}

impl RpcWriter {
    /// Create a writer whose messages carry their own size header.
    pub fn new(capacity: usize, arg_count: usize) -> Result<Self, WireError> {
        Self::with_size_at_front(capacity, arg_count, true)
    }

    /// Create a writer, choosing whether messages carry a size header.
    ///
    /// Without a header the transport must frame the message itself when
    /// sending it.
    pub fn with_size_at_front(
        capacity: usize,
        arg_count: usize,
        size_at_front: bool,
    ) -> Result<Self, WireError> {
        let header_len = if size_at_front { LENGTH_PREFIX_SIZE } else { 0 };
        let total = header_len
            .checked_add(capacity)
            .filter(|total| *total <= isize::MAX as usize)
            .ok_or(WireError::CapacityExceeded {
                requested: capacity,
                remaining: isize::MAX as usize - header_len,
            })?;
        let mut buf = Vec::with_capacity(total);
        if size_at_front {
            buf.extend_from_slice(&encode_length(capacity));
        }

        Ok(Self {
            buf,
            header_len,
            capacity,
            arg_count,
            args_added: 0,
            pending: None,
        })
    }

    /// Whether produced messages carry their own size header.
    pub fn has_size_at_front(&self) -> bool {
        self.header_len != 0
    }

    /// Declared content capacity, size header excluded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Content bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity - self.used()
    }

    /// Declared argument count.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Reserve the next argument as a string of exactly `len` bytes.
    ///
    /// The returned slot must be filled before another argument is added or
    /// the message is read.
    pub fn add_string_arg(&mut self, len: usize) -> Result<StringArg<'_>, WireError> {
        let needed = LENGTH_PREFIX_SIZE
            .checked_add(len)
            .ok_or(WireError::CapacityExceeded {
                requested: usize::MAX,
                remaining: self.remaining(),
            })?;
        self.reserve(needed)?;

        let index = self.args_added;
        self.buf.extend_from_slice(&encode_length(len));
        let start = self.buf.len();
        self.buf.resize(start + len, 0);
        self.args_added += 1;
        self.pending = Some(index);

        let Self { buf, pending, .. } = self;
        Ok(StringArg {
            data: &mut buf[start..],
            pending,
        })
    }

    /// Append a fixed-width primitive argument.
    pub fn add_primitive_arg<T: WirePrimitive>(&mut self, value: T) -> Result<(), WireError> {
        self.reserve(T::WIRE_SIZE)?;

        let start = self.buf.len();
        self.buf.resize(start + T::WIRE_SIZE, 0);
        value.write_le(&mut self.buf[start..]);
        self.args_added += 1;
        Ok(())
    }

    /// The assembled message bytes, size header included when configured.
    pub fn binary_array(&self) -> Result<&[u8], WireError> {
        self.check_complete()?;
        Ok(&self.buf)
    }

    /// Freeze the writer into an immutable, shareable message.
    pub fn seal(self) -> Result<RpcMessage, WireError> {
        self.check_complete()?;
        Ok(RpcMessage::new(
            self.buf.into(),
            self.header_len != 0,
            self.arg_count,
        ))
    }

    fn used(&self) -> usize {
        self.buf.len() - self.header_len
    }

    fn reserve(&self, needed: usize) -> Result<(), WireError> {
        if let Some(index) = self.pending {
            return Err(WireError::UnfilledArgument { index });
        }
        if self.args_added >= self.arg_count {
            return Err(WireError::TooManyArguments {
                declared: self.arg_count,
            });
        }
        let remaining = self.remaining();
        if needed > remaining {
            return Err(WireError::CapacityExceeded {
                requested: needed,
                remaining,
            });
        }
        Ok(())
    }

    fn check_complete(&self) -> Result<(), WireError> {
        if let Some(index) = self.pending {
            return Err(WireError::UnfilledArgument { index });
        }
        if self.args_added != self.arg_count {
            return Err(WireError::MissingArguments {
                added: self.args_added,
                declared: self.arg_count,
            });
        }
        if self.used() != self.capacity {
            return Err(WireError::UnusedCapacity {
                used: self.used(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// A reserved string slot inside an [`RpcWriter`].
///
/// Dropping the slot without filling it leaves the writer unusable for
/// further arguments.
#[derive(Debug)]
pub struct StringArg<'a> {
    data: &'a mut [u8],
    pending: &'a mut Option<usize>,
}

impl StringArg<'_> {
    /// Length of the slot.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the slot holds zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy `src` into the slot. `src` must be exactly the slot length.
    pub fn fill(self, src: &[u8]) -> Result<(), WireError> {
        if src.len() != self.data.len() {
            return Err(WireError::FillLengthMismatch {
                expected: self.data.len(),
                actual: src.len(),
            });
        }
        self.data.copy_from_slice(src);
        *self.pending = None;
        Ok(())
    }

    /// Write the slot in place.
    pub fn fill_with<F>(self, write: F)
    where
        F: FnOnce(&mut [u8]),
    {
        write(self.data);
        *self.pending = None;
    }
}
