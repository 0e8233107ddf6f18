//! Wire codec errors.

use thiserror::Error;

/// Errors raised while building or parsing an RPC message.
///
/// Writer-side variants indicate wrong capacity math or misuse of the
/// writer and are treated as construction failures by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// An argument did not fit in the remaining capacity.
    #[error("RPC capacity exceeded: argument needs {requested} bytes, {remaining} remaining")]
    CapacityExceeded {
        /// Bytes the argument needs, prefix included.
        requested: usize,
        /// Bytes still available.
        remaining: usize,
    },

    /// More arguments were added than were declared.
    #[error("RPC writer declared {declared} arguments, cannot add another")]
    TooManyArguments {
        /// Declared argument count.
        declared: usize,
    },

    /// A reserved string slot was never filled.
    #[error("argument {index} was reserved but never filled")]
    UnfilledArgument {
        /// Zero-based argument index.
        index: usize,
    },

    /// Fewer arguments were added than were declared.
    #[error("RPC message incomplete: {added}/{declared} arguments added")]
    MissingArguments {
        /// Arguments added so far.
        added: usize,
        /// Declared argument count.
        declared: usize,
    },

    /// All arguments were added but part of the capacity stayed unused.
    #[error("RPC capacity over-allocated: {used} of {capacity} bytes used")]
    UnusedCapacity {
        /// Bytes written.
        used: usize,
        /// Declared capacity.
        capacity: usize,
    },

    /// Fill data did not match the reserved slot length.
    #[error("slot holds {expected} bytes, fill data has {actual}")]
    FillLengthMismatch {
        /// Reserved slot length.
        expected: usize,
        /// Length of the supplied data.
        actual: usize,
    },

    /// The message ended in the middle of an argument.
    #[error("truncated RPC message: need {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required to continue.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// The embedded size header disagrees with the buffer length.
    #[error("size header declares {declared} bytes, message carries {actual}")]
    SizeHeaderMismatch {
        /// Value of the size header.
        declared: u64,
        /// Bytes actually following the header.
        actual: usize,
    },

    /// Bytes remain after the last expected argument.
    #[error("{0} trailing bytes after last argument")]
    TrailingBytes(usize),
}
