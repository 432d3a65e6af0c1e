//! The storefront's backend web server.
//!
//! Orders, users, sessions, and uploaded files all live in hosted services. This server looks
//! orders up by token, wraps the identity provider and media service for the website, and serves
//! the website's translations.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod i18n;
pub mod media;

use std::{any::Any, sync::Arc};

use axum::{response::IntoResponse, Router};
use sqlx::PgPool;
use tower_cookies::CookieManagerLayer;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{auth::AuthClient, config::Config, media::MediaClient};

/// The state shared by every request handler. Cloning it is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The record store's connection pool.
    pub db_pool: PgPool,

    /// The identity provider client.
    pub auth: AuthClient,

    /// The media service client.
    pub media: MediaClient,

    /// The server's configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Constructs the [`AppState`] from a configuration, creating each hosted service's client.
    ///
    /// # Errors
    ///
    /// Fails if the database URL is invalid. The database itself isn't contacted.
    pub fn new(config: Config) -> sqlx::Result<Self> {
        Ok(Self {
            db_pool: db::connect(&config.database_url)?,
            auth: AuthClient::new(config.supabase_url.clone(), config.supabase_anon_key.clone()),
            media: MediaClient::new(config.media.clone()),
            config: Arc::new(config),
        })
    }
}

/// Builds the server's router.
pub fn app(state: AppState) -> Router {
    with_layers(api::routes::router()).with_state(state)
}

/// Wraps a router in the middleware every request passes through.
fn with_layers<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router
        .layer(CookieManagerLayer::new())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Renders a panic in a request handler as a generic server error.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let details = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(details, "request handler panicked");

    api::Error::Internal.into_response()
}
