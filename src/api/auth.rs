//! Various API utilities to help with authentication and authorization.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use crate::{
    api,
    auth::{self, Role, User},
    AppState,
};

/// The name of the cookie holding the signed-in user's access token.
pub const TOKEN_COOKIE: &str = "token";

/// An extractor for the request's access token, from an `Authorization: Bearer` header or else
/// the [`TOKEN_COOKIE`].
///
/// Rejects with [`api::Error::NotSignedIn`] if there's neither.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AccessToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AccessToken {
    type Rejection = api::Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        if let Some(token) = bearer {
            return Ok(Self(token.to_owned()));
        }

        // This only fails if the cookie manager layer is missing.
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| api::Error::Internal)?;

        cookies
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
            .map(Self)
            .ok_or(api::Error::NotSignedIn)
    }
}

/// An extractor for the signed-in user, validated with the identity provider, along with their
/// role.
#[derive(Clone, Debug)]
pub struct SignedIn {
    /// The user's access token.
    pub access_token: String,

    /// The user's record from the identity provider.
    pub user: User,

    /// The user's role.
    pub role: Role,
}

impl SignedIn {
    /// Fails with [`api::Error::Forbidden`] unless the user is an admin.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn require_admin(&self) -> Result<(), api::Error> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(api::Error::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = api::Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AccessToken(access_token) = AccessToken::from_request_parts(parts, state).await?;

        let user = state.auth.session(&access_token).await?;
        let role = auth::role(&state.db_pool, &user.id).await?;

        Ok(Self {
            access_token,
            user,
            role,
        })
    }
}

/// Builds the [`TOKEN_COOKIE`] for a new session on the website at `website_origin`.
///
/// To reduce the access token's attack surface, it's `HttpOnly` so browser scripts can't read it.
pub fn session_cookie(
    website_origin: &str,
    access_token: String,
    max_age: Option<i64>,
) -> Cookie<'static> {
    let mut cookie = base_cookie(website_origin, access_token);

    if let Some(seconds) = max_age {
        cookie.set_max_age(Duration::seconds(seconds));
    }

    cookie
}

/// Builds a cookie that removes the [`TOKEN_COOKIE`] from the website at `website_origin`.
pub fn removal_cookie(website_origin: &str) -> Cookie<'static> {
    let mut cookie = base_cookie(website_origin, String::new());
    cookie.make_removal();
    cookie
}

/// Builds a [`TOKEN_COOKIE`] with the attributes shared by setting and removing it.
fn base_cookie(website_origin: &str, value: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .domain(domain_from_origin(website_origin).to_owned())
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(website_origin.starts_with("https:"))
        .build()
}

/// Returns the domain from an origin URI string, or the whole string if it has no `//`.
fn domain_from_origin(origin: &str) -> &str {
    let start = origin.find("//").map_or(0, |index| index + 2);
    let end = origin[start..]
        .find(':')
        .map_or(origin.len(), |index| index + start);

    &origin[start..end]
}
