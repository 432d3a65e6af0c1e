//! The website's translated messages.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    api::{Json, Response},
    i18n::{self, Locale, RequestLocale},
    AppState,
};

/// Gets the message bundle for the request's locale.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn get(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Response<GetResponse> {
    let messages = i18n::load_messages(&state.config.messages_dir, locale).await?;

    Ok((StatusCode::OK, Json(GetResponse { locale, messages })))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The locale the messages are in.
    pub locale: Locale,

    /// The messages, keyed by message ID.
    pub messages: Map<String, Value>,
}
