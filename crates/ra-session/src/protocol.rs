//! Session message formats.
//!
//! All messages travel as transport packs; their payloads are RPC arguments
//! without a size header.

use ra_wire::{calc_size_prim, calc_size_str, RpcMessage, RpcReader, RpcWriter, WireError};

use crate::error::SessionError;

/// Category tag of an attestation session.
pub const RA_SESSION_CATEGORY: &str = "RaSession";

/// Server verdict sent after the trust decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionStatus {
    /// Peer trusted; one request may follow.
    Accepted = 0,
    /// Peer not trusted; the server closes the connection.
    Rejected = 1,
}

impl SessionStatus {
    /// Encode as a one-argument message.
    pub fn encode(self) -> Result<RpcMessage, WireError> {
        let mut writer = RpcWriter::with_size_at_front(calc_size_prim::<u8>(), 1, false)?;
        writer.add_primitive_arg(self as u8)?;
        writer.seal()
    }

    /// Decode from a received payload.
    pub fn decode(payload: &[u8]) -> Result<Self, SessionError> {
        let mut reader = RpcReader::new(payload);
        let raw = reader.next_primitive_arg::<u8>()?;
        reader.finish()?;
        match raw {
            0 => Ok(SessionStatus::Accepted),
            1 => Ok(SessionStatus::Rejected),
            other => Err(SessionError::Malformed(format!("unknown status {other}"))),
        }
    }
}

/// Opening message: who the peer claims to be and its evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello<'a> {
    /// Claimed component name.
    pub component: &'a str,
    /// Attestation evidence for the attestor.
    pub evidence: &'a [u8],
}

impl<'a> Hello<'a> {
    /// Encode as a two-argument message.
    pub fn encode(&self) -> Result<RpcMessage, WireError> {
        let component = self.component.as_bytes();
        let mut writer = RpcWriter::with_size_at_front(
            calc_size_str(component.len()) + calc_size_str(self.evidence.len()),
            2,
            false,
        )?;
        writer.add_string_arg(component.len())?.fill(component)?;
        writer
            .add_string_arg(self.evidence.len())?
            .fill(self.evidence)?;
        writer.seal()
    }

    /// Decode from a received payload.
    pub fn decode(payload: &'a [u8]) -> Result<Self, SessionError> {
        let mut reader = RpcReader::new(payload);
        let component = std::str::from_utf8(reader.next_string_arg()?)
            .map_err(|_| SessionError::Malformed("component name is not UTF-8".into()))?;
        let evidence = reader.next_string_arg()?;
        reader.finish()?;
        Ok(Self {
            component,
            evidence,
        })
    }
}
