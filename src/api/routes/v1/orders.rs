//! An HTTP resource representing a single order, identified by its token.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::Serialize;
use serde_json::Value;

use crate::{
    api::{self, Json, Path, Response},
    db, AppState,
};

/// Gets the order with the specified token.
///
/// A failed query is reported the same as a missing order, so clients only ever see `404` for a
/// lookup that didn't produce an order.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response<GetResponse> {
    let order = match db::find_order(&state.db_pool, &token).await {
        Ok(Some(order)) => order,
        Ok(None) => return Err(api::Error::OrderNotFound),
        Err(error) => {
            tracing::error!(%error, "order lookup failed");
            return Err(api::Error::OrderNotFound);
        }
    };

    Ok((StatusCode::OK, Json(GetResponse { order })))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// Every column of the order, as stored.
    pub order: Value,
}
