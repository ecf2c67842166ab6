//! BookShare
//!
//! Loads the catalog from the configured backend and serves the UI surface.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bookshare::config::Config;
use bookshare::session::{Session, SessionHandle};
use bookshare::{create_router, gateway, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BookShare");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Backend request timeout: {:?}", config.request_timeout);

    let gateway = gateway::connect(&config).await?;

    // Initial catalog load; the UI stays usable with an empty catalog
    let mut session = Session::new();
    if let Err(e) = session.catalog.refresh(gateway.as_ref()).await {
        tracing::warn!("Initial catalog load failed: {}", e);
    }

    let state = AppState {
        session: SessionHandle::new(gateway, session, config.success_delay),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
