//! The set of users' sign-in sessions.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    api::{
        auth::{removal_cookie, session_cookie, AccessToken, SignedIn},
        validation::{UserEmail, UserPassword},
        Json, Response,
    },
    auth::{Role, User},
    AppState,
};

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The email address of the user signing in.
    pub email: UserEmail,

    /// The user's password in plain text.
    pub password: UserPassword,
}

/// Signs a user in with the identity provider and stores their access token in a session cookie.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<PostRequest>,
) -> Response<PostResponse> {
    let session = state
        .auth
        .sign_in(body.email.as_str(), body.password.as_str())
        .await?;

    cookies.add(session_cookie(
        &state.config.website_origin,
        session.access_token,
        session.expires_in,
    ));

    tracing::info!(user_id = %session.user.id, "user signed in");

    Ok((StatusCode::OK, Json(PostResponse { user: session.user })))
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// The signed-in user.
    pub user: User,
    // To reduce the access token's attack surface, it isn't included in the response. It's set as
    // an `HttpOnly` cookie instead so browser scripts can't access it.
}

/// Gets the signed-in user and their role.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler(state = AppState)]
pub async fn get(signed_in: SignedIn) -> Response<GetResponse> {
    Ok((
        StatusCode::OK,
        Json(GetResponse {
            user: signed_in.user,
            role: signed_in.role,
        }),
    ))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The signed-in user.
    pub user: User,

    /// The user's role.
    pub role: Role,
}

/// Signs the user out, revoking their session and removing their session cookie.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    AccessToken(access_token): AccessToken,
) -> Response<DeleteResponse> {
    state.auth.sign_out(&access_token).await?;

    cookies.add(removal_cookie(&state.config.website_origin));

    Ok((StatusCode::OK, Json(DeleteResponse {})))
}

/// A `DELETE` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {}
