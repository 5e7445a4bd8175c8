mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use snip_gateway::{App, AppState};
use snip_generator::DigestGenerator;
use snip_shortener::{ShortenerService, ShortenerSettings};
use snip_storage::InMemoryStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    snip_telemetry::init(config.log_format.into())?;

    let listen_addr = SocketAddr::new(config.host, config.port);
    info!(
        listen_addr = %listen_addr,
        base_url = %config.base_url,
        log_format = %config.log_format,
        "starting gateway server"
    );

    let service = ShortenerService::new(
        InMemoryStore::new(),
        DigestGenerator::new(),
        ShortenerSettings::builder()
            .base_url(config.base_url)
            .build(),
    );
    let router = App::router(AppState::new(Arc::new(service)));

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
