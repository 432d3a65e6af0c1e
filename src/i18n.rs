//! Locale resolution and message bundles.

pub mod routing;

use std::{convert::Infallible, io, path::Path};

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderMap},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use tower_cookies::Cookie;

/// The cookie a client's chosen locale is remembered in.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// A locale the website is translated into.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    DeserializeFromStr,
    SerializeDisplay,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
)]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,

    /// Indonesian.
    Id,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Self; 2] = [Self::En, Self::Id];

    /// Resolves a requested locale code, falling back to the default locale if it's absent or
    /// unsupported. Codes must match exactly.
    pub fn resolve(requested: Option<&str>) -> Self {
        requested
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    /// Picks a locale for a request from, in order of precedence, an explicitly requested code,
    /// the [`LOCALE_COOKIE`] value, and an `Accept-Language` header value.
    ///
    /// The first of the first two that's present is resolved with [`Self::resolve`], even if it's
    /// unsupported. `Accept-Language` is only consulted when neither is present, and yields the
    /// supported language with the highest weight.
    pub fn negotiate(
        requested: Option<&str>,
        cookie: Option<&str>,
        accept_language: Option<&str>,
    ) -> Self {
        if let Some(code) = requested.or(cookie) {
            return Self::resolve(Some(code));
        }

        accept_language
            .and_then(best_accepted_locale)
            .unwrap_or_default()
    }
}

/// Returns the supported locale with the highest weight in an `Accept-Language` header value.
/// Entries with equal weights keep their listed order.
fn best_accepted_locale(accept_language: &str) -> Option<Locale> {
    let mut entries: Vec<(Locale, f32)> = accept_language
        .split(',')
        .filter_map(|entry| {
            let mut params = entry.split(';');
            let tag = params.next()?.trim();

            let primary = tag.split('-').next()?.to_ascii_lowercase();
            let locale = primary.parse::<Locale>().ok()?;

            let weight = params
                .find_map(|param| param.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;

            (weight > 0.0).then_some((locale, weight))
        })
        .collect();

    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries.first().map(|&(locale, _)| locale)
}

/// A query string that may request a locale.
#[derive(Deserialize, Debug)]
struct LocaleQuery {
    /// The requested locale code.
    locale: Option<String>,
}

/// An extractor for the [`Locale`] negotiated from a request. See [`Locale::negotiate`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let requested = Query::<LocaleQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.locale);

        let cookie = locale_cookie(&parts.headers);

        let accept_language = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Ok(Self(Locale::negotiate(
            requested.as_deref(),
            cookie.as_deref(),
            accept_language,
        )))
    }
}

/// Reads the [`LOCALE_COOKIE`] value from a request's `Cookie` headers.
fn locale_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == LOCALE_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// An error loading a message bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The bundle file couldn't be read.
    #[error("failed to read message bundle: {0}")]
    Io(#[from] io::Error),

    /// The bundle file isn't valid JSON.
    #[error("failed to parse message bundle: {0}")]
    Json(#[from] serde_json::Error),

    /// The bundle file's top-level JSON value isn't an object.
    #[error("message bundle should be a JSON object")]
    NotAnObject,
}

/// Loads the message bundle for a locale from `<dir>/<locale>.json`.
///
/// # Errors
///
/// Fails if the file can't be read or doesn't contain a JSON object.
pub async fn load_messages(dir: &Path, locale: Locale) -> Result<Map<String, Value>, BundleError> {
    let path = dir.join(format!("{locale}.json"));
    let bytes = tokio::fs::read(&path).await?;

    match serde_json::from_slice(&bytes)? {
        Value::Object(messages) => Ok(messages),
        _ => Err(BundleError::NotAnObject),
    }
}
