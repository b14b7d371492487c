use anyhow::Result;
use tracing::info;
use translation_gateway::config::Config;
use translation_gateway::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_gateway=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting translation gateway");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Backend: {:?}, listening address: {}",
        config.translation_backend,
        config.listen_addr()
    );

    server::serve(&config).await
}
