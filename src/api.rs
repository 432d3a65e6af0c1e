//! The HTTP API, served under `/api/`.

pub mod auth;
pub mod routes;
pub mod validation;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::{auth as identity, i18n::BundleError, media};

/// An API error. Each renders as a `{ "error": message }` JSON body with its own status code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The requested API route doesn't exist.
    #[error("Route not found")]
    RouteNotFound,

    /// No single order matches the requested token.
    #[error("Order not found")]
    OrderNotFound,

    /// The request has no access token.
    #[error("Not signed in")]
    NotSignedIn,

    /// The signed-in user isn't allowed to do this.
    #[error("Forbidden")]
    Forbidden,

    /// The request is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// A multipart upload request has no `file` field.
    #[error("Missing file")]
    MissingFile,

    /// The identity provider returned an error or couldn't be reached.
    #[error(transparent)]
    Identity(#[from] identity::Error),

    /// The media service returned an error or couldn't be reached.
    #[error(transparent)]
    Media(#[from] media::Error),

    /// A record store query failed.
    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    /// A message bundle couldn't be loaded.
    #[error("Internal server error")]
    Bundle(#[from] BundleError),

    /// Something unexpected went wrong.
    #[error("Internal server error")]
    Internal,
}

impl Error {
    /// Gets the response status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::NotSignedIn => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Identity(identity::Error::Provider { status, .. })
            | Self::Media(media::Error::Provider { status, .. }) => *status,
            Self::Identity(identity::Error::Request(_)) | Self::Media(media::Error::Request(_)) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Database(_) | Self::Bundle(_) | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Gets the message sent to the client. Provider errors keep the provider's own message.
    fn message(&self) -> String {
        match self {
            Self::Identity(identity::Error::Provider { message, .. })
            | Self::Media(media::Error::Provider { message, .. }) => message.clone(),
            Self::Identity(identity::Error::Request(_)) => "Identity provider unavailable".into(),
            Self::Media(media::Error::Request(_)) => "Media service unavailable".into(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        match &self {
            Self::Identity(_) | Self::Media(_) => tracing::warn!(error = %self, "provider error"),
            _ if status.is_server_error() => tracing::error!(error = ?self, "request failed"),
            _ => {}
        }

        (status, axum::Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for Error {
    fn from(error: MultipartError) -> Self {
        Self::BadRequest(error.body_text())
    }
}

/// Equivalent to [`axum::Json`], but fails with an API [`Error`] instead of a plain text response.
#[derive(FromRequest, Clone, Copy, Default, Debug)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Equivalent to [`axum::extract::Path`], but fails with an API [`Error`] instead of a plain text
/// response.
#[derive(FromRequestParts, Clone, Copy, Default, Debug)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// The result type of an API route handler.
pub type Response<T> = Result<(StatusCode, Json<T>), Error>;
