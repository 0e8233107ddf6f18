//! Cooperative terminate signal.

use tokio::sync::watch;

/// Observes the server-wide terminate flag.
///
/// Cheap to clone; every accept loop and connection task holds one.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub(crate) fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// Whether terminate has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once terminate is requested.
    ///
    /// Also resolves if the server was dropped.
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Owned form of [`ShutdownSignal::triggered`], for use as a cancel future.
    pub async fn wait(mut self) {
        self.triggered().await
    }
}
