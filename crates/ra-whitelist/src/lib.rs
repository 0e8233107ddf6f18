//! # RA Whitelist
//!
//! The trust table consulted by attestation sessions: component name to the
//! identity value (measurement) a genuine instance of that component presents.
//!
//! ## Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Names are unique | duplicate names fail construction |
//! | Immutable after construction | no `&mut self` API; shared by `Arc` |
//! | Exact match | trusted iff presented bytes equal stored bytes |
//! | Reserved self entry | placeholder until bootstrap; consulting it early is an error |
//!
//! ## Usage
//!
//! ```rust
//! use ra_whitelist::{TrustDecision, WhiteList};
//!
//! let whitelist = WhiteList::from_entries([("A", b"v1".to_vec()), ("B", b"v2".to_vec())]).unwrap();
//! assert_eq!(whitelist.decide("A", b"v1"), TrustDecision::Trusted);
//! assert!(!whitelist.decide("C", b"v1").is_trusted());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod decision;
mod error;
mod identity;
mod whitelist;

pub use decision::{TrustDecision, UntrustedReason};
pub use error::WhiteListError;
pub use identity::IdentityValue;
pub use whitelist::{WhiteList, WhiteListBuilder, SELF_COMPONENT_LABEL};

#[cfg(test)]
mod tests;
