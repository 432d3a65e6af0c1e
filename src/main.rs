//! Runs the storefront's backend web server.

use storefront::{app, config::Config, db, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let address = config.address.clone();
    let migrate = config.database_migrate;

    let state = AppState::new(config)?;

    if migrate {
        tracing::info!("migrating database...");
        db::migrate(&state.db_pool).await?;
    }

    tracing::info!(%address, "listening...");

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("ready!");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
