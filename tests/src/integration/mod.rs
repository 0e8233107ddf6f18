//! # Integration Flows
//!
//! End-to-end tests that drive a running [`ra_smart_server::SmartServer`]
//! through real TCP and local-socket connections.

#[cfg(test)]
mod harness;

pub mod dispatch_flows;
pub mod ias_flows;
pub mod session_flows;
