//! Server lifecycle: listener registration, startup checks, terminate.

use std::future::Future;
use std::sync::Arc;

use ra_telemetry::metrics::LISTENER_BIND_FAILURES;
use ra_transport::{Endpoint, Listener};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ListenerConfig;
use crate::dispatcher::{accept_loop, ListenerContext};
use crate::error::ServerError;
use crate::handler::ConnectionHandler;
use crate::pool::PoolStats;
use crate::shutdown::ShutdownSignal;

struct RunningListener {
    context: Arc<ListenerContext>,
    task: JoinHandle<()>,
}

/// Dispatching server over any number of listeners.
///
/// Each listener runs its own accept loop with its own handler, pool and
/// worker budget. Several listeners may share one handler instance.
pub struct SmartServer {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown: ShutdownSignal,
    listeners: Vec<RunningListener>,
    failed: Vec<Endpoint>,
}

/// Requests terminate from outside the owning task.
#[derive(Debug, Clone)]
pub struct TerminateHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl TerminateHandle {
    /// Stop accepting on every listener. Idempotent.
    pub fn terminate(&self) {
        let _ = self.tx.send(true);
    }
}

impl SmartServer {
    /// Server with no listeners.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: Arc::new(tx),
            shutdown: ShutdownSignal::new(rx),
            listeners: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Bind `endpoint` and start serving it with `handler`.
    ///
    /// Returns the bound endpoint (ephemeral ports resolved). A bind failure
    /// is logged and returned but leaves the server and its other listeners
    /// untouched.
    pub async fn add_listener(
        &mut self,
        endpoint: &Endpoint,
        handler: Arc<dyn ConnectionHandler>,
        config: ListenerConfig,
    ) -> Result<Endpoint, ServerError> {
        self.check_accepting(&config)?;

        match ra_transport::bind(endpoint).await {
            Ok(listener) => Ok(self.start_listener(listener, handler, config)),
            Err(e) => {
                warn!(
                    listener = %endpoint,
                    handler = handler.name(),
                    error = %e,
                    "Listener failed to bind, continuing without it"
                );
                LISTENER_BIND_FAILURES.inc();
                self.failed.push(endpoint.clone());
                Err(ServerError::Bind(e))
            }
        }
    }

    /// Start serving an already bound listener.
    pub fn add_bound_listener(
        &mut self,
        listener: Box<dyn Listener>,
        handler: Arc<dyn ConnectionHandler>,
        config: ListenerConfig,
    ) -> Result<Endpoint, ServerError> {
        self.check_accepting(&config)?;
        Ok(self.start_listener(listener, handler, config))
    }

    fn check_accepting(&self, config: &ListenerConfig) -> Result<(), ServerError> {
        config.validate().map_err(ServerError::InvalidConfig)?;
        if self.shutdown.is_triggered() {
            return Err(ServerError::Terminating);
        }
        Ok(())
    }

    fn start_listener(
        &mut self,
        listener: Box<dyn Listener>,
        handler: Arc<dyn ConnectionHandler>,
        config: ListenerConfig,
    ) -> Endpoint {
        let endpoint = listener.local_endpoint().clone();
        info!(
            listener = %endpoint,
            handler = handler.name(),
            categories = ?handler.categories(),
            pool_capacity = config.pool_capacity,
            worker_limit = config.worker_limit,
            "Listener started"
        );

        let context = Arc::new(ListenerContext::new(
            endpoint.clone(),
            handler,
            config,
            self.shutdown.clone(),
        ));
        let task = tokio::spawn(accept_loop(listener, Arc::clone(&context)));
        self.listeners.push(RunningListener { context, task });
        endpoint
    }

    /// Listeners currently serving.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Bound endpoints, in registration order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.listeners
            .iter()
            .map(|l| l.context.endpoint().clone())
            .collect()
    }

    /// Endpoints that failed to bind.
    pub fn failed_endpoints(&self) -> &[Endpoint] {
        &self.failed
    }

    /// Pool statistics of the listener bound to `endpoint`.
    pub fn pool_stats(&self, endpoint: &Endpoint) -> Option<PoolStats> {
        self.listeners
            .iter()
            .find(|l| l.context.endpoint() == endpoint)
            .map(|l| l.context.pool_stats())
    }

    /// Fail only if no configured listener is serving.
    pub fn ensure_listening(&self) -> Result<(), ServerError> {
        if self.listeners.is_empty() {
            return Err(ServerError::NoListeners {
                failed: self.failed.clone(),
            });
        }
        Ok(())
    }

    /// Signal that resolves when terminate is requested.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Handle for requesting terminate from another task.
    pub fn terminate_handle(&self) -> TerminateHandle {
        TerminateHandle {
            tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Serve until `signal` resolves, then terminate.
    pub async fn run_until<F>(self, signal: F)
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = signal => {}
            _ = shutdown.triggered() => {}
        }
        self.terminate().await;
    }

    /// Stop accepting, let in-flight invocations finish, close idle pooled
    /// connections and release every listener.
    pub async fn terminate(mut self) {
        info!(listeners = self.listeners.len(), "Terminating server");
        let _ = self.shutdown_tx.send(true);

        for listener in std::mem::take(&mut self.listeners) {
            let endpoint = listener.context.endpoint().clone();
            if let Err(e) = listener.task.await {
                error!(listener = %endpoint, error = %e, "Accept loop ended abnormally");
            }
        }
        info!("Server terminated");
    }
}

impl Default for SmartServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SmartServer {
    fn drop(&mut self) {
        // Background accept loops must not outlive an abandoned server
        let _ = self.shutdown_tx.send(true);
    }
}
