//! Whitelist errors.

use thiserror::Error;

/// Errors from building or consulting a whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhiteListError {
    /// The same component name appeared twice during construction.
    #[error("duplicate whitelist entry: {0}")]
    DuplicateName(String),

    /// The component is not listed.
    #[error("component not whitelisted: {0}")]
    NotFound(String),

    /// The reserved entry was consulted before bootstrap populated it.
    #[error("whitelist entry {0} consulted before it was populated")]
    Unpopulated(String),

    /// The reserved entry already holds a value.
    #[error("whitelist entry {0} is already populated")]
    AlreadyPopulated(String),

    /// The whitelist was built without the reserved entry.
    #[error("whitelist has no reserved entry for {0}")]
    NoReservedEntry(String),
}
