//! # Decent-RA Test Suite
//!
//! Unified test crate for flows that span several crates.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs          # Shared fixtures and client helpers
//!     ├── ias_flows.rs        # IAS simulator over real sockets
//!     ├── session_flows.rs    # Attestation-gated sessions, TCP + local
//!     └── dispatch_flows.rs   # Per-listener handler binding, ordering
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ra-tests
//!
//! # One flow
//! cargo test -p ra-tests integration::session_flows::
//! ```

#![allow(dead_code)]

pub mod integration;
