//! Peer side of an attestation session.

use ra_transport::{Connection, Endpoint};

use crate::error::SessionError;
use crate::protocol::{Hello, SessionStatus, RA_SESSION_CATEGORY};

/// Result of one session attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Trusted; the protected service answered.
    Response(Vec<u8>),
    /// Not trusted; the server has closed the connection.
    Rejected,
}

/// Opens attestation sessions over one connection.
#[derive(Debug)]
pub struct SessionClient {
    connection: Connection,
}

impl SessionClient {
    /// Connect to a server listening on `endpoint`.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, SessionError> {
        Ok(Self::new(Connection::connect(endpoint).await?))
    }

    /// Use an established connection.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Attest as `component` and, if trusted, send `request`.
    ///
    /// After [`SessionOutcome::Response`] the connection may be reused for
    /// another session.
    pub async fn request(
        &mut self,
        component: &str,
        evidence: &[u8],
        request: &[u8],
    ) -> Result<SessionOutcome, SessionError> {
        let hello = Hello {
            component,
            evidence,
        }
        .encode()?;

        self.connection
            .send_pack(RA_SESSION_CATEGORY.as_bytes())
            .await?;
        self.connection.send_rpc(&hello).await?;

        let status = SessionStatus::decode(&self.connection.receive_pack().await?)?;
        if status == SessionStatus::Rejected {
            return Ok(SessionOutcome::Rejected);
        }

        self.connection.send_pack(request).await?;
        Ok(SessionOutcome::Response(
            self.connection.receive_pack().await?,
        ))
    }

    /// The underlying connection.
    pub fn into_inner(self) -> Connection {
        self.connection
    }
}
