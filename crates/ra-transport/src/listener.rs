//! TCP and local-socket listeners.

use async_trait::async_trait;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::connection::Connection;
use crate::endpoint::Endpoint;
use crate::error::TransportError;

/// Accepts connections of one transport kind.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Wait for the next inbound connection.
    async fn accept(&self) -> Result<Connection, TransportError>;

    /// The endpoint actually bound (ephemeral ports resolved).
    fn local_endpoint(&self) -> &Endpoint;
}

/// Bind a listener for `endpoint`.
pub async fn bind(endpoint: &Endpoint) -> Result<Box<dyn Listener>, TransportError> {
    match endpoint {
        Endpoint::Tcp(_) => Ok(Box::new(TcpServer::bind(endpoint).await?)),
        #[cfg(unix)]
        Endpoint::Local(_) => Ok(Box::new(LocalServer::bind(endpoint)?)),
        #[cfg(not(unix))]
        Endpoint::Local(_) => Err(TransportError::Unsupported("local")),
    }
}

/// TCP listener.
#[derive(Debug)]
pub struct TcpServer {
    listener: TcpListener,
    endpoint: Endpoint,
}

impl TcpServer {
    /// Bind a TCP endpoint.
    pub async fn bind(endpoint: &Endpoint) -> Result<Self, TransportError> {
        let Endpoint::Tcp(addr) = endpoint else {
            return Err(TransportError::Unsupported("non-tcp endpoint for tcp"));
        };
        let bind_err = |source| TransportError::Bind {
            endpoint: endpoint.clone(),
            source,
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local = listener.local_addr().map_err(bind_err)?;
        info!(endpoint = %Endpoint::Tcp(local), "TCP listener bound");

        Ok(Self {
            listener,
            endpoint: Endpoint::Tcp(local),
        })
    }
}

#[async_trait]
impl Listener for TcpServer {
    async fn accept(&self) -> Result<Connection, TransportError> {
        let (stream, peer) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        debug!(listener = %self.endpoint, peer = %peer, "Accepted TCP connection");
        Ok(Connection::new(stream, peer.to_string()))
    }

    fn local_endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[cfg(unix)]
pub use local::LocalServer;

#[cfg(unix)]
mod local {
    use std::io;
    use std::os::unix::fs::FileTypeExt;
    use std::os::unix::net::UnixStream as StdUnixStream;
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;
    use tokio::net::UnixListener;
    use tracing::{debug, info, warn};

    use super::Listener;
    use crate::connection::Connection;
    use crate::endpoint::Endpoint;
    use crate::error::TransportError;

    /// Local (Unix domain socket) listener.
    ///
    /// The socket file is removed when the listener is dropped.
    #[derive(Debug)]
    pub struct LocalServer {
        listener: UnixListener,
        endpoint: Endpoint,
        path: PathBuf,
    }

    impl LocalServer {
        /// Bind a local endpoint, replacing a stale socket file.
        ///
        /// A socket file with a live listener behind it, or a path that is not
        /// a socket at all, fails the bind and is left in place.
        pub fn bind(endpoint: &Endpoint) -> Result<Self, TransportError> {
            let Endpoint::Local(path) = endpoint else {
                return Err(TransportError::Unsupported("non-local endpoint for local"));
            };
            let bind_err = |source| TransportError::Bind {
                endpoint: endpoint.clone(),
                source,
            };

            clear_stale_socket(path).map_err(bind_err)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(bind_err)?;
            }

            let listener = UnixListener::bind(path).map_err(bind_err)?;
            info!(endpoint = %endpoint, "Local listener bound");

            Ok(Self {
                listener,
                endpoint: endpoint.clone(),
                path: path.clone(),
            })
        }
    }

    #[async_trait]
    impl Listener for LocalServer {
        async fn accept(&self) -> Result<Connection, TransportError> {
            let (stream, _addr) = self.listener.accept().await?;
            debug!(listener = %self.endpoint, "Accepted local connection");
            Ok(Connection::new(stream, self.endpoint.to_string()))
        }

        fn local_endpoint(&self) -> &Endpoint {
            &self.endpoint
        }
    }

    fn clear_stale_socket(path: &Path) -> io::Result<()> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if !metadata.file_type().is_socket() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "path exists and is not a socket",
            ));
        }

        match StdUnixStream::connect(path) {
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::AddrInUse,
                "socket is served by a live listener",
            )),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
                ) =>
            {
                debug!(path = %path.display(), "Removing stale socket file");
                std::fs::remove_file(path)
            }
            Err(e) => Err(e),
        }
    }

    impl Drop for LocalServer {
        fn drop(&mut self) {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove socket file");
                }
            }
        }
    }
}
