use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;

use odinscan::api::routes::create_router;
use odinscan::config::AppConfig;
use odinscan::services::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    dotenv().ok();
    let config = AppConfig::from_env()?;
    tracing::info!(
        "Using upstream {} ({} req/s), BTC price feed {}",
        config.upstream_api_url,
        config.upstream_rps,
        config.btc_price_url
    );

    let client = Arc::new(UpstreamClient::new(&config)?);
    let addr = config.listen_addr;
    let app = create_router((client, Arc::new(config)));

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve API: {:?}", e);
        return Err(e.into());
    }

    Ok(())
}
