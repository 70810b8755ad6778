use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use inkdrop_core::{
    BrowserlessFetcher, OutboxDelivery, PageFetcher, Pipeline, ReadabilityPass, SentLedger, Settings, SmoothieReadability,
};
use inkdrop_server::{AppState, log_filter, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .init();

    let settings = Settings::from_env()?;
    if let Err(e) = settings.credentials() {
        tracing::warn!(error = %e, "starting without session credentials; requests will fail until they are set");
    }

    let fetcher: Box<dyn PageFetcher> =
        Box::new(BrowserlessFetcher::new(settings.fetch_config(), settings.deferred_credential_cache())?);
    let readability: Box<dyn ReadabilityPass> = Box::new(SmoothieReadability::default());

    let state = Arc::new(AppState {
        pipeline: Pipeline::new(fetcher, readability),
        ledger: SentLedger::new(&settings.ledger_path),
        delivery: Box::new(OutboxDelivery::new(&settings.outbox_dir)),
    });

    let addr = settings.bind_addr();
    info!("Ink Drop starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
