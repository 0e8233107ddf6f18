//! # IAS Simulator
//!
//! A local stand-in for the remote attestation authority (IAS). It serves
//! two categories over the smart server:
//!
//! | Category | Request            | Reply (one RPC message)                     |
//! |----------|--------------------|---------------------------------------------|
//! | `SigRl`  | group id (pack)    | 1 arg: signature revocation list            |
//! | `Report` | quote JSON (pack)  | 3 args: report JSON, signature, certificate |
//!
//! Replies are built once at startup and shared by every request. Before
//! replying, each request waits out the remaining simulated latency so the
//! requester sees a production-like response time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod app;
mod config;
mod error;
pub mod samples;

pub use app::{IasSimApp, REPORT_CATEGORY, SIGRL_CATEGORY};
pub use config::IasSimConfig;
pub use error::IasSimError;

/// Simulator version shown in the startup banner.
pub const SIMULATOR_VERSION: &str = "0.5";
