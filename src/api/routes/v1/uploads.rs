//! Files uploaded to the media service by admins.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
};
use axum_macros::debug_handler;

use crate::{
    api::{self, auth::SignedIn, Json, Response},
    media::Upload,
    AppState,
};

/// The name of the multipart field holding the file.
const FILE_FIELD: &str = "file";

/// Uploads the `file` field of a multipart request body to the media service.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    signed_in: SignedIn,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Response<Upload> {
    signed_in.require_admin()?;

    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(ToOwned::to_owned);
        let bytes = field.bytes().await?;

        let upload = state.media.upload(bytes.into(), file_name).await?;

        tracing::info!(
            user_id = %signed_in.user.id,
            public_id = %upload.public_id,
            "file uploaded",
        );

        return Ok((StatusCode::OK, Json(upload)));
    }

    Err(api::Error::MissingFile)
}
