//! Accept loop and per-connection dispatch.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use ra_telemetry::metrics::{
    CONNECTIONS_ACCEPTED, HANDLER_FAILURES, HANDLER_INVOCATIONS, POOL_EVICTIONS,
    UNKNOWN_CATEGORIES,
};
use ra_transport::{Connection, Endpoint, Listener};
use tokio::sync::{Notify, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, trace, warn};

use crate::config::ListenerConfig;
use crate::handler::{ConnectionHandler, Disposition, MAX_CATEGORY_LEN};
use crate::pool::{ConnectionPool, PoolStats, RetainResult};
use crate::shutdown::ShutdownSignal;

/// Pause after a failed accept (e.g. descriptor exhaustion).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Everything one listener's tasks share.
pub(crate) struct ListenerContext {
    endpoint: Endpoint,
    handler: Arc<dyn ConnectionHandler>,
    categories: HashSet<&'static str>,
    pool: Mutex<ConnectionPool>,
    workers: Semaphore,
    shutdown: ShutdownSignal,
}

impl ListenerContext {
    pub(crate) fn new(
        endpoint: Endpoint,
        handler: Arc<dyn ConnectionHandler>,
        config: ListenerConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        let categories = handler.categories().iter().copied().collect();
        Self {
            endpoint,
            handler,
            categories,
            pool: Mutex::new(ConnectionPool::new(config.pool_capacity)),
            workers: Semaphore::new(config.worker_limit),
            shutdown,
        }
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub(crate) fn pool_stats(&self) -> PoolStats {
        self.pool.lock().stats()
    }
}

/// Accept until terminate, then drain in-flight connections and release
/// the listener.
pub(crate) async fn accept_loop(listener: Box<dyn Listener>, ctx: Arc<ListenerContext>) {
    let mut shutdown = ctx.shutdown.clone();
    let mut connections = JoinSet::new();
    info!(
        listener = %ctx.endpoint,
        handler = ctx.handler.name(),
        "Accept loop started"
    );

    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                reap(&ctx, joined);
            }
            accepted = listener.accept() => match accepted {
                Ok(connection) => {
                    CONNECTIONS_ACCEPTED
                        .with_label_values(&[ctx.endpoint.kind()])
                        .inc();
                    debug!(
                        listener = %ctx.endpoint,
                        connection = %connection.id(),
                        peer = connection.peer(),
                        "Accepted connection"
                    );
                    connections.spawn(serve_connection(connection, Arc::clone(&ctx)));
                }
                Err(e) => {
                    warn!(listener = %ctx.endpoint, error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }

    info!(
        listener = %ctx.endpoint,
        in_flight = connections.len(),
        "Stopped accepting, draining connections"
    );
    while let Some(joined) = connections.join_next().await {
        reap(&ctx, joined);
    }

    drop(listener);
    info!(listener = %ctx.endpoint, "Listener released");
}

fn reap(ctx: &ListenerContext, joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(listener = %ctx.endpoint, error = %e, "Connection task ended abnormally");
    }
}

/// Serve one connection until it closes, fails, or is evicted.
async fn serve_connection(mut connection: Connection, ctx: Arc<ListenerContext>) {
    let id = connection.id();
    let evict = Arc::new(Notify::new());
    let mut shutdown = ctx.shutdown.clone();
    let mut pooled = false;

    loop {
        let received = tokio::select! {
            biased;
            _ = shutdown.triggered() => {
                debug!(connection = %id, "Closing waiting connection on terminate");
                break;
            }
            _ = evict.notified(), if pooled => {
                debug!(connection = %id, "Evicted from pool");
                break;
            }
            received = connection.receive_pack_string(MAX_CATEGORY_LEN) => received,
        };

        let tag = match received {
            Ok(tag) => tag,
            Err(e) if e.is_closed() => {
                debug!(connection = %id, "Peer closed connection");
                break;
            }
            Err(e) => {
                warn!(connection = %id, error = %e, "Unreadable category tag, closing");
                break;
            }
        };

        let Some(category) = ctx.categories.get(tag.as_str()).copied() else {
            warn!(
                listener = %ctx.endpoint,
                connection = %id,
                category = %tag,
                "Unknown category, closing connection"
            );
            UNKNOWN_CATEGORIES.inc();
            break;
        };

        // Evicted between the read and here: serve this request, then close
        let last_request = pooled && !ctx.pool.lock().activate(id, Instant::now());
        if last_request {
            debug!(connection = %id, "Evicted while reading; serving final request");
        }

        let Ok(permit) = ctx.workers.acquire().await else {
            break;
        };
        HANDLER_INVOCATIONS.with_label_values(&[category]).inc();
        trace!(connection = %id, category, "Dispatching to handler");
        let outcome = ctx.handler.process(category, &mut connection).await;
        drop(permit);

        let Disposition {
            keep_alive,
            release,
        } = match outcome {
            Ok(disposition) => disposition,
            Err(e) if e.is_disconnect() => {
                debug!(connection = %id, category, "Peer disconnected mid-request");
                break;
            }
            Err(e) => {
                warn!(
                    listener = %ctx.endpoint,
                    connection = %id,
                    category,
                    error = %e,
                    "Handler failed, discarding connection"
                );
                HANDLER_FAILURES.inc();
                break;
            }
        };

        release_connections(&ctx, release).await;

        if !keep_alive || last_request || shutdown.is_triggered() {
            break;
        }

        let retained = ctx.pool.lock().retain(id, Arc::clone(&evict), Instant::now());
        match retained {
            RetainResult::Retained => pooled = true,
            RetainResult::Evicted(victim) => {
                POOL_EVICTIONS.inc();
                debug!(connection = %id, victim = %victim, "Evicted idle connection to make room");
                pooled = true;
            }
            RetainResult::Refused => {
                debug!(connection = %id, "Pool exhausted, closing");
                break;
            }
        }
    }

    ctx.pool.lock().remove(id);
    if let Err(e) = connection.close().await {
        trace!(connection = %id, error = %e, "Close failed");
    }
    debug!(connection = %id, "Connection closed");
}

async fn release_connections(ctx: &ListenerContext, release: Vec<Connection>) {
    for aux in release {
        let aux_id = aux.id();
        ctx.pool.lock().remove(aux_id);
        if let Err(e) = aux.close().await {
            trace!(connection = %aux_id, error = %e, "Close failed");
        }
        debug!(connection = %aux_id, "Released auxiliary connection");
    }
}
