//! `serve`: run the HTTP API and queue consumer.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::Application;
use crate::domain::models::Config;

/// Run until Ctrl-C or SIGTERM, then shut down gracefully.
pub async fn execute(config: Config) -> Result<()> {
    let app = Application::build(config).await?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for interrupt");
            return;
        }
        tracing::info!("interrupt received, shutting down");
        signal.cancel();
    });

    app.run(shutdown).await
}
