//! Framed connections over any byte stream.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ra_wire::{decode_length, encode_length, RpcMessage, LENGTH_PREFIX_SIZE};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::endpoint::Endpoint;
use crate::error::TransportError;

/// Largest pack a connection accepts by default (16 MiB).
pub const MAX_PACK_SIZE: usize = 16 * 1024 * 1024;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A bidirectional byte stream a [`Connection`] can run over.
pub trait ByteStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ByteStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Process-unique connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// An open connection of either transport kind.
///
/// Owned by one handler invocation at a time; all operations take `&mut self`.
pub struct Connection {
    id: ConnectionId,
    peer: String,
    stream: Box<dyn ByteStream>,
    max_pack_size: usize,
}

impl Connection {
    /// Wrap an established stream.
    pub fn new<S>(stream: S, peer: impl Into<String>) -> Self
    where
        S: ByteStream + 'static,
    {
        Self {
            id: ConnectionId::next(),
            peer: peer.into(),
            stream: Box::new(stream),
            max_pack_size: MAX_PACK_SIZE,
        }
    }

    /// Open a client connection to `endpoint`.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, TransportError> {
        let connect_err = |source| TransportError::Connect {
            endpoint: endpoint.clone(),
            source,
        };

        match endpoint {
            Endpoint::Tcp(addr) => {
                let stream = tokio::net::TcpStream::connect(addr)
                    .await
                    .map_err(connect_err)?;
                stream.set_nodelay(true)?;
                Ok(Self::new(stream, endpoint.to_string()))
            }
            #[cfg(unix)]
            Endpoint::Local(path) => {
                let stream = tokio::net::UnixStream::connect(path)
                    .await
                    .map_err(connect_err)?;
                Ok(Self::new(stream, endpoint.to_string()))
            }
            #[cfg(not(unix))]
            Endpoint::Local(_) => Err(TransportError::Unsupported("local")),
        }
    }

    /// Change the largest pack this connection will receive.
    pub fn with_max_pack_size(mut self, max: usize) -> Self {
        self.max_pack_size = max;
        self
    }

    /// Connection identifier.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Description of the remote side.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Write bytes exactly as given.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        trace!(connection = %self.id, len = bytes.len(), "Sent raw bytes");
        Ok(())
    }

    /// Write `payload` as a length-prefixed pack.
    pub async fn send_pack(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(&encode_length(payload.len())).await?;
        self.stream.write_all(payload).await?;
        self.stream.flush().await?;
        trace!(connection = %self.id, len = payload.len(), "Sent pack");
        Ok(())
    }

    /// Send a sealed RPC message.
    ///
    /// A message with its own size header is already a pack and is written
    /// raw; otherwise the connection frames it.
    pub async fn send_rpc(&mut self, message: &RpcMessage) -> Result<(), TransportError> {
        if message.has_size_at_front() {
            self.send_raw(message.as_bytes()).await
        } else {
            self.send_pack(message.as_bytes()).await
        }
    }

    /// Receive one pack.
    ///
    /// Returns [`TransportError::Closed`] when the peer closed the stream
    /// before the first byte of a pack.
    pub async fn receive_pack(&mut self) -> Result<Vec<u8>, TransportError> {
        self.receive_bounded(self.max_pack_size).await
    }

    /// Receive one pack holding UTF-8 text of at most `max` bytes.
    pub async fn receive_pack_string(&mut self, max: usize) -> Result<String, TransportError> {
        let bytes = self.receive_bounded(max.min(self.max_pack_size)).await?;
        String::from_utf8(bytes).map_err(|_| TransportError::InvalidUtf8)
    }

    /// Shut down the write half and drop the stream.
    pub async fn close(mut self) -> Result<(), TransportError> {
        self.stream.shutdown().await?;
        Ok(())
    }

    async fn receive_bounded(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        let mut head = [0u8; LENGTH_PREFIX_SIZE];
        let first = self.stream.read(&mut head).await?;
        if first == 0 {
            return Err(TransportError::Closed);
        }
        self.stream.read_exact(&mut head[first..]).await?;

        let len = decode_length(&head).unwrap_or(0);
        if len > max as u64 {
            return Err(TransportError::PackTooLarge { len, max });
        }

        let mut payload = vec![0u8; len as usize];
        self.stream.read_exact(&mut payload).await?;
        trace!(connection = %self.id, len, "Received pack");
        Ok(payload)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}
