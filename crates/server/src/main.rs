use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use funnel_core::{Config, CredentialSet};
use funnel_queue::QueueSink;
use funnel_server::router::build_router;
use funnel_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    funnel_core::config::load_dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    config.log_summary();

    let sink = QueueSink::from_config(&config).await?;
    let provider = sink.provider();
    info!(provider, "Queue sink initialized");

    let state = Arc::new(AppState {
        credentials: CredentialSet::new(config.auth.api_keys.clone()),
        sink: Arc::new(sink),
        sink_provider: provider,
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
