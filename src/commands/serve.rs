use crate::commands::Out;
use crate::ledger::Ledger;
use crate::server::{AppState, Server};
use crate::{Config, Result};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// What a finished `serve` reports.
#[derive(Debug, Clone, Serialize)]
pub struct ServeSummary {
    /// The address the server listened on.
    pub address: SocketAddr,
    /// The number of expenses held when the server stopped. They are not saved anywhere.
    pub expenses_discarded: usize,
}

/// Runs the web server until Ctrl-C is pressed.
///
/// The `Ledger` is created here and lives as long as the server does. Nothing is persisted, so
/// every run starts with an empty ledger.
pub async fn serve(config: Config) -> Result<Out<ServeSummary>> {
    serve_until(config, ctrl_c()).await
}

/// Runs the web server until `shutdown` completes.
pub async fn serve_until<F>(config: Config, shutdown: F) -> Result<Out<ServeSummary>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ledger = Arc::new(Ledger::new());
    let state = AppState::new(Arc::clone(&ledger), config.credentials());
    let server = Server::bind(config.socket_addr(), state).await?;
    let address = server.local_addr()?;
    info!("Open http://{address} in your browser to log in");
    server.run(shutdown).await?;

    let summary = ServeSummary {
        address,
        expenses_discarded: ledger.len(),
    };
    let message = format!(
        "Server stopped, discarding {} expense{}",
        summary.expenses_discarded,
        if summary.expenses_discarded == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, summary))
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // returning stops the server
        error!("Unable to listen for Ctrl-C: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path())
            .await
            .unwrap()
            .with_bind_address(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .with_port(0);

        let out = serve_until(config, async {}).await.unwrap();
        assert_eq!(out.message(), "Server stopped, discarding 0 expenses");
        let summary = out.structure().unwrap();
        assert_eq!(summary.expenses_discarded, 0);
        assert_ne!(summary.address.port(), 0);
    }
}
