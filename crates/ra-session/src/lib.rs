//! # RA Session
//!
//! Attestation-gated request handling. A peer must prove its identity to
//! the whitelist before a single protected request is served.
//!
//! ## Protocol (`"RaSession"` category)
//!
//! ```text
//! peer                                  server
//!  │ pack: "RaSession"                    │
//!  │ pack: Hello { component, evidence } ─►  PeerAttestor::attest(evidence)
//!  │                                      │  WhiteList::decide(component, measurement)
//!  │ ◄─ pack: Status (u8)                 │
//!  │                                      │
//!  │   Accepted:                          │
//!  │ pack: request ──────────────────────►  ProtectedService::serve
//!  │ ◄─ pack: response                    │  keep alive
//!  │                                      │
//!  │   Rejected:                          │  no request read, close
//! ```
//!
//! Attestation math and the protected service are collaborators behind
//! [`PeerAttestor`] and [`ProtectedService`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod client;
mod collaborator;
mod error;
mod handler;
pub mod protocol;

pub use client::{SessionClient, SessionOutcome};
pub use collaborator::{PeerAttestor, ProtectedService};
pub use error::SessionError;
pub use handler::AttestationSessionHandler;
pub use protocol::{SessionStatus, RA_SESSION_CATEGORY};
