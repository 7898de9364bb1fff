/// OIDC Identity Cache server
use oidc_identity_cache::{config::ServerConfig, error::IdentityResult, server, AppContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> IdentityResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oidc_identity_cache=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting OIDC identity cache v{} (log level {})",
        env!("CARGO_PKG_VERSION"),
        config.logging.level
    );

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
