//! Thin wrappers around the hosted identity provider.
//!
//! Each helper makes exactly one call and hands back the provider's payload, or the provider's
//! error exactly as it was reported. Nothing is retried.

use axum::http::StatusCode;
use reqwest::{header::AUTHORIZATION, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use sqlx::PgPool;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::db;

/// A user's role, as stored in their profile.
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
    Hash,
    Debug,
)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// A customer. Users without a profile role are treated as this.
    #[default]
    Client,

    /// A store administrator.
    Admin,
}

impl Role {
    /// Interprets a profile's raw role. A missing or unrecognized role is the unprivileged
    /// default.
    pub fn from_profile(role: Option<&str>) -> Self {
        let Some(role) = role else {
            return Self::default();
        };

        role.parse().unwrap_or_else(|_| {
            tracing::warn!(role, "unrecognized profile role");
            Self::default()
        })
    }
}

/// A user record as returned by the identity provider. Only the ID is interpreted; every other
/// field passes through untouched.
#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct User {
    /// The user's ID.
    pub id: String,

    /// The rest of the provider's user record.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A sign-in session as returned by the identity provider.
#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct Session {
    /// The bearer token authorizing requests on the user's behalf.
    pub access_token: String,

    /// How many seconds the access token is valid for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// The signed-in user.
    pub user: User,

    /// The rest of the provider's session record.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// An error from an identity provider call.
#[derive(Error, Debug)]
pub enum Error {
    /// The provider responded with an error.
    #[error("identity provider responded with {status}: {message}")]
    Provider {
        /// The provider's response status.
        status: StatusCode,

        /// The provider's error message.
        message: String,
    },

    /// The request couldn't be sent or the response couldn't be read.
    #[error("identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A client for the identity provider's REST API.
#[derive(Clone, Debug)]
pub struct AuthClient {
    /// The HTTP client, shared between requests.
    http: reqwest::Client,

    /// The provider's base URL, without a trailing slash.
    base_url: String,

    /// The provider's public API key.
    api_key: String,
}

impl AuthClient {
    /// Constructs an [`AuthClient`] for the provider at `base_url`.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Builds a request to an endpoint of the provider's auth API.
    fn request(&self, method: reqwest::Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/auth/v1/{endpoint}", self.base_url))
            .header("apikey", &self.api_key)
    }

    /// Signs a user in with their email and password.
    ///
    /// # Errors
    ///
    /// Forwards the provider's error, e.g. when the credentials are wrong.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let request = self
            .request(reqwest::Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": email,
                "password": password,
            }));

        send_json(request).await
    }

    /// Registers a new user with an email and password, returning the provider's payload as is.
    /// Depending on the provider's settings, that's either the new user or a session for them.
    ///
    /// # Errors
    ///
    /// Forwards the provider's error, e.g. when the password is too weak.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Value, Error> {
        let request = self.request(reqwest::Method::POST, "signup").json(&json!({
            "email": email,
            "password": password,
        }));

        send_json(request).await
    }

    /// Signs the user owning an access token out, revoking their session.
    ///
    /// # Errors
    ///
    /// Forwards the provider's error, e.g. when the token is invalid.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        let request = self
            .request(reqwest::Method::POST, "logout")
            .header(AUTHORIZATION, format!("Bearer {access_token}"));

        send(request).await?;
        Ok(())
    }

    /// Fetches the user owning an access token, validating the session in the process.
    ///
    /// # Errors
    ///
    /// Forwards the provider's error, e.g. when the token is expired.
    pub async fn session(&self, access_token: &str) -> Result<User, Error> {
        let request = self
            .request(reqwest::Method::GET, "user")
            .header(AUTHORIZATION, format!("Bearer {access_token}"));

        send_json(request).await
    }
}

/// Looks up a user's role from their profile, defaulting to [`Role::Client`] if they have no
/// profile or their profile has no role.
///
/// # Errors
///
/// Forwards the record store's error.
pub async fn role(pool: &PgPool, user_id: &str) -> sqlx::Result<Role> {
    let role = db::find_profile_role(pool, user_id).await?;

    Ok(Role::from_profile(role.as_deref()))
}

/// Sends a request, turning an error status into [`Error::Provider`].
async fn send(request: RequestBuilder) -> Result<reqwest::Response, Error> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<Value>().await.unwrap_or_default();

    Err(Error::Provider {
        status,
        message: provider_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error"))
            .to_owned(),
    })
}

/// Sends a request and deserializes its successful JSON response.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
    Ok(send(request).await?.json().await?)
}

/// Finds the human-readable message in an identity provider error body. The provider has used
/// several shapes for these over time.
fn provider_message(body: &Value) -> Option<&str> {
    ["msg", "error_description", "message", "error"]
        .into_iter()
        .find_map(|key| body.get(key)?.as_str())
}
