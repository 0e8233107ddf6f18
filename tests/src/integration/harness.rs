//! Shared fixtures for integration flows.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ias_simulator::IasSimApp;
use ra_latency::{LatencyConfig, LatencySimulator};
use ra_session::{PeerAttestor, ProtectedService, SessionError};
use ra_smart_server::ConnectionHandler;
use ra_transport::{Connection, Endpoint};
use sha2::{Digest, Sha256};
use tokio::time::timeout;

pub(crate) const WAIT: Duration = Duration::from_secs(5);

pub(crate) fn loopback() -> Endpoint {
    "127.0.0.1:0".parse().unwrap()
}

pub(crate) fn ias_app(latency: LatencyConfig) -> Arc<dyn ConnectionHandler> {
    Arc::new(IasSimApp::new(LatencySimulator::new(latency).unwrap()).unwrap())
}

/// Send a category and one body pack, then read one reply pack.
pub(crate) async fn request(conn: &mut Connection, category: &str, body: &[u8]) -> Vec<u8> {
    conn.send_pack(category.as_bytes()).await.unwrap();
    conn.send_pack(body).await.unwrap();
    timeout(WAIT, conn.receive_pack()).await.unwrap().unwrap()
}

pub(crate) async fn expect_closed(conn: &mut Connection) {
    match timeout(WAIT, conn.receive_pack()).await.unwrap() {
        Err(e) => assert!(e.is_closed(), "unexpected error: {e}"),
        Ok(bytes) => panic!("expected close, got {} bytes", bytes.len()),
    }
}

pub(crate) fn measurement(evidence: &[u8]) -> Vec<u8> {
    Sha256::digest(evidence).to_vec()
}

/// Measurement is the SHA-256 of the evidence.
pub(crate) struct Sha256Attestor;

#[async_trait]
impl PeerAttestor for Sha256Attestor {
    async fn attest(&self, evidence: &[u8]) -> Result<Vec<u8>, SessionError> {
        Ok(measurement(evidence))
    }
}

/// Replies with the request reversed.
pub(crate) struct ReverseService;

#[async_trait]
impl ProtectedService for ReverseService {
    async fn serve(&self, _component: &str, mut request: Vec<u8>) -> Result<Vec<u8>, SessionError> {
        request.reverse();
        Ok(request)
    }
}
