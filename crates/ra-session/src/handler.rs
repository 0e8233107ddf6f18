//! Attestation-gated session handler.

use std::sync::Arc;

use async_trait::async_trait;
use ra_smart_server::{ConnectionHandler, Disposition, HandlerError};
use ra_telemetry::metrics::TRUST_DECISIONS;
use ra_transport::Connection;
use ra_whitelist::WhiteList;
use ra_wire::RpcMessage;
use tracing::{debug, warn};

use crate::collaborator::{PeerAttestor, ProtectedService};
use crate::error::SessionError;
use crate::protocol::{Hello, SessionStatus, RA_SESSION_CATEGORY};

/// Serves `"RaSession"` connections.
///
/// Cheap to share: bind the same instance to a network and a local listener.
pub struct AttestationSessionHandler {
    whitelist: Arc<WhiteList>,
    attestor: Arc<dyn PeerAttestor>,
    service: Arc<dyn ProtectedService>,
    accepted: RpcMessage,
    rejected: RpcMessage,
}

impl AttestationSessionHandler {
    /// Build a handler; status replies are encoded once here.
    pub fn new(
        whitelist: Arc<WhiteList>,
        attestor: Arc<dyn PeerAttestor>,
        service: Arc<dyn ProtectedService>,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            whitelist,
            attestor,
            service,
            accepted: SessionStatus::Accepted.encode()?,
            rejected: SessionStatus::Rejected.encode()?,
        })
    }

    async fn reject(&self, connection: &mut Connection) -> Result<Disposition, HandlerError> {
        connection.send_rpc(&self.rejected).await?;
        Ok(Disposition::close())
    }
}

#[async_trait]
impl ConnectionHandler for AttestationSessionHandler {
    fn name(&self) -> &str {
        "ra-session"
    }

    fn categories(&self) -> &[&'static str] {
        &[RA_SESSION_CATEGORY]
    }

    async fn process(
        &self,
        _category: &str,
        connection: &mut Connection,
    ) -> Result<Disposition, HandlerError> {
        let payload = connection.receive_pack().await?;
        let hello = Hello::decode(&payload)?;

        let measurement = match self.attestor.attest(hello.evidence).await {
            Ok(measurement) => measurement,
            Err(e) => {
                warn!(
                    component = hello.component,
                    peer = connection.peer(),
                    error = %e,
                    "Attestation failed, rejecting peer"
                );
                TRUST_DECISIONS
                    .with_label_values(&["attestation_failed"])
                    .inc();
                return self.reject(connection).await;
            }
        };

        let decision = self.whitelist.decide(hello.component, &measurement);
        TRUST_DECISIONS
            .with_label_values(&[decision.as_str()])
            .inc();
        if !decision.is_trusted() {
            warn!(
                component = hello.component,
                peer = connection.peer(),
                decision = %decision,
                "Untrusted peer, refusing request"
            );
            return self.reject(connection).await;
        }

        debug!(component = hello.component, connection = %connection.id(), "Peer trusted");
        connection.send_rpc(&self.accepted).await?;

        let request = connection.receive_pack().await?;
        let response = self.service.serve(hello.component, request).await?;
        connection.send_pack(&response).await?;
        Ok(Disposition::keep_alive())
    }
}
