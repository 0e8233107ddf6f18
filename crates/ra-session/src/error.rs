//! Session errors.

use ra_transport::TransportError;
use ra_wire::WireError;
use thiserror::Error;

/// Errors from session collaborators and the session client.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Evidence could not be verified.
    #[error("attestation failed: {0}")]
    Attestation(String),

    /// The protected service could not answer.
    #[error("protected service failed: {0}")]
    Service(String),

    /// The peer sent something the protocol does not allow.
    #[error("malformed session message: {0}")]
    Malformed(String),

    /// Connection failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Message encoding failure.
    #[error(transparent)]
    Wire(#[from] WireError),
}

impl From<SessionError> for ra_smart_server::HandlerError {
    fn from(err: SessionError) -> Self {
        use ra_smart_server::HandlerError;

        match err {
            SessionError::Transport(e) => HandlerError::Transport(e),
            SessionError::Wire(e) => HandlerError::Wire(e),
            SessionError::Malformed(message) => HandlerError::Protocol(message),
            SessionError::Attestation(message) => HandlerError::Collaborator {
                context: "peer attestation",
                message,
            },
            SessionError::Service(message) => HandlerError::Collaborator {
                context: "protected service",
                message,
            },
        }
    }
}
