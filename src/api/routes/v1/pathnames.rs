//! The website's localized pathnames.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum_macros::debug_handler;
use serde::Serialize;

use crate::{
    api::{Json, Response},
    i18n::{routing, Locale, RequestLocale},
};

/// Gets every page's pathname in the request's locale.
///
/// # Errors
///
/// Infallible, but returns [`Response`] for consistency with other API routes.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub async fn get(RequestLocale(locale): RequestLocale) -> Response<GetResponse> {
    Ok((
        StatusCode::OK,
        Json(GetResponse {
            locale,
            pathnames: routing::pathnames(locale).collect(),
        }),
    ))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The locale the pathnames are in.
    pub locale: Locale,

    /// Each page's localized pathname, keyed by its logical pathname.
    pub pathnames: BTreeMap<&'static str, &'static str>,
}
