//! All routes for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{api, AppState};

pub mod v1 {
    //! The routes for version 1 of the HTTP API.

    pub mod messages;
    pub mod orders;
    pub mod pathnames;
    pub mod sessions;
    pub mod uploads;
    pub mod users;
}

/// The largest upload request body accepted, in bytes.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Builds the API router.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/messages", get(v1::messages::get))
        .route("/api/v1/orders/:token", get(v1::orders::get))
        .route("/api/v1/pathnames", get(v1::pathnames::get))
        .route(
            "/api/v1/sessions",
            get(v1::sessions::get)
                .post(v1::sessions::post)
                .delete(v1::sessions::delete),
        )
        .route(
            "/api/v1/uploads",
            post(v1::uploads::post).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/users", post(v1::users::post))
        .fallback(|| async { api::Error::RouteNotFound })
}
