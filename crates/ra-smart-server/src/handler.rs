//! The handler capability bound to each listener.

use async_trait::async_trait;
use ra_transport::Connection;

use crate::error::HandlerError;

/// Longest category tag the dispatcher will read.
pub const MAX_CATEGORY_LEN: usize = 256;

/// What the dispatcher should do with a connection after an invocation.
#[derive(Debug, Default)]
#[must_use]
pub struct Disposition {
    /// Return the connection to the pool for another request.
    pub keep_alive: bool,
    /// Auxiliary connections the handler borrowed and is handing back to be freed.
    pub release: Vec<Connection>,
}

impl Disposition {
    /// Close the connection after this request.
    pub fn close() -> Self {
        Self::default()
    }

    /// Keep the connection for further requests.
    pub fn keep_alive() -> Self {
        Self {
            keep_alive: true,
            release: Vec::new(),
        }
    }

    /// Also free `connection` once the invocation returns.
    pub fn releasing(mut self, connection: Connection) -> Self {
        self.release.push(connection);
        self
    }
}

/// Processes one categorized message per invocation.
///
/// A handler instance may be bound to several listeners at once, so it must
/// be shareable across tasks. It never sees pool internals, only the
/// connection it was given.
#[async_trait]
pub trait ConnectionHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Category tags this handler serves. Compared case-sensitively.
    ///
    /// Read once when the handler is bound to a listener.
    fn categories(&self) -> &[&'static str];

    /// Read the body for `category` from `connection` and respond.
    async fn process(
        &self,
        category: &str,
        connection: &mut Connection,
    ) -> Result<Disposition, HandlerError>;
}
