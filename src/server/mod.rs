//! The HTTP server: an axum `Router` in front of the `Ledger`.
//!
//! axum serves each connection on its own tokio task. All handlers share one `AppState`, which
//! holds the `Ledger` behind an `Arc`; the ledger does its own locking.

mod form;
mod pages;
mod response;
mod routes;

pub use routes::router;

use crate::config::Credentials;
use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::Result;
use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// What request handlers get to see: the ledger and the login credentials.
#[derive(Debug, Clone)]
pub struct AppState {
    ledger: Arc<Ledger>,
    credentials: Credentials,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>, credentials: Credentials) -> Self {
        Self {
            ledger,
            credentials,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// A bound, not yet running, HTTP server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Binds the listening socket. Use port `0` to let the OS pick a free port, then ask
    /// `local_addr` which one it chose.
    pub async fn bind(addr: SocketAddr, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Unable to listen on {addr}"))
            .pub_result(ErrorType::Service)?;
        Ok(Self {
            listener,
            router: router(state),
        })
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Unable to get the local address of the listener")
            .pub_result(ErrorType::Service)
    }

    /// Serves requests until `shutdown` completes, then waits for in-flight requests to finish.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = self.local_addr()?;
        info!("Listening on http://{local_addr}");
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutting down, no longer accepting connections on {local_addr}");
        })
        .await
        .context("The HTTP server failed")
        .pub_result(ErrorType::Service)
    }
}
