use iptv_gateway::{Config, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iptv_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr = config.listen_addr();

    tracing::info!("Starting iptv-gateway on {}", addr);
    tracing::info!("PLAYLIST_URL={}", config.playlist_url);
    if config.proxy_segments {
        tracing::info!("Segment proxying is enabled");
    }

    let state = server::AppState::new(config)?;
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
