//! An HTTP resource representing the set of all user accounts.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{
        validation::{UserEmail, UserPassword},
        Json, Response,
    },
    AppState,
};

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The user's email address.
    pub email: UserEmail,

    /// The user's password in plain text.
    pub password: UserPassword,
}

/// Registers a new user with the identity provider, responding with the provider's payload as is.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    Json(body): Json<PostRequest>,
) -> Response<Value> {
    let payload = state
        .auth
        .sign_up(body.email.as_str(), body.password.as_str())
        .await?;

    Ok((StatusCode::OK, Json(payload)))
}
