//! Collaborators the session handler depends on.

use async_trait::async_trait;

use crate::error::SessionError;

/// Turns a peer's attestation evidence into an identity measurement.
#[async_trait]
pub trait PeerAttestor: Send + Sync {
    /// Verify `evidence` and return the measured identity.
    async fn attest(&self, evidence: &[u8]) -> Result<Vec<u8>, SessionError>;
}

/// The operation only trusted peers may invoke.
#[async_trait]
pub trait ProtectedService: Send + Sync {
    /// Answer one request from the trusted `component`.
    async fn serve(&self, component: &str, request: Vec<u8>) -> Result<Vec<u8>, SessionError>;
}
