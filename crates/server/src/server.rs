use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{RequestDispatcher, expenses};
use ledger::ExpenseLedger;

#[derive(Clone)]
pub struct ServerState {
    pub dispatcher: RequestDispatcher,
}

/// Build the expense API on top of `ledger`.
pub fn router(ledger: Arc<dyn ExpenseLedger>) -> Router {
    let state = ServerState {
        dispatcher: RequestDispatcher::new(ledger),
    };

    Router::new()
        .route("/expenses", post(expenses::create))
        .route("/expenses/{date}", get(expenses::on_date))
        .with_state(state)
}

/// Serve until Ctrl-C is received.
pub async fn run_with_listener<L>(
    ledger: L,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error>
where
    L: ExpenseLedger + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(ledger)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub fn spawn_with_listener<L>(
    ledger: L,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error>
where
    L: ExpenseLedger + 'static,
{
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => {
            tracing::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
