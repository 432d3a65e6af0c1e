//! Runtime configuration read from the environment.

use std::{env::VarError, path::PathBuf};

use thiserror::Error;

/// The media API base URL used when `CLOUDINARY_API_URL` isn't set.
const DEFAULT_MEDIA_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// The message bundle directory used when `MESSAGES_DIR` isn't set.
const DEFAULT_MESSAGES_DIR: &str = "messages";

/// The server's configuration, read from the environment variable named in each field's doc.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address to listen on (`ADDRESS`).
    pub address: String,

    /// The Postgres URL of the record store (`DATABASE_URL`).
    pub database_url: String,

    /// Whether to run the bundled migrations at startup (`DATABASE_MIGRATE`).
    pub database_migrate: bool,

    /// The identity provider's base URL (`SUPABASE_URL`).
    pub supabase_url: String,

    /// The identity provider's public API key (`SUPABASE_ANON_KEY`).
    pub supabase_anon_key: String,

    /// The media service's credentials and target (`CLOUDINARY_*`, `UPLOAD_FOLDER`).
    pub media: MediaConfig,

    /// The directory containing `<locale>.json` message bundles (`MESSAGES_DIR`).
    pub messages_dir: PathBuf,

    /// The URI origin of the website, e.g. `https://shop.example.com` (`WEBSITE_ORIGIN`).
    pub website_origin: String,
}

/// The media service's configuration.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// The media API base URL, without a trailing slash.
    pub api_url: String,

    /// The cloud (account) name.
    pub cloud_name: String,

    /// The API key.
    pub api_key: String,

    /// The API secret used to sign requests.
    pub api_secret: String,

    /// The folder uploads are placed in, if any.
    pub folder: Option<String>,
}

/// An error reading the [`Config`].
#[derive(Error, Debug)]
pub enum Error {
    /// A required environment variable wasn't set or wasn't valid Unicode.
    #[error("environment variable `{name}` should be set: {source}")]
    Missing {
        /// The variable's name.
        name: &'static str,

        /// Why it couldn't be read.
        source: dotenvy::Error,
    },

    /// An environment variable was set to a value that couldn't be parsed.
    #[error("environment variable `{name}` has an invalid value {value:?}")]
    Invalid {
        /// The variable's name.
        name: &'static str,

        /// The offending value.
        value: String,
    },
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or a variable's value is invalid.
    pub fn from_env() -> Result<Self, Error> {
        // A missing `.env` file is fine; the variables may be set directly.
        _ = dotenvy::dotenv();

        Ok(Self {
            address: required("ADDRESS")?,
            database_url: required("DATABASE_URL")?,
            database_migrate: optional("DATABASE_MIGRATE")
                .map(|value| parse_bool("DATABASE_MIGRATE", value))
                .transpose()?
                .unwrap_or(false),
            supabase_url: trim_trailing_slash(required("SUPABASE_URL")?),
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            media: MediaConfig {
                api_url: trim_trailing_slash(
                    optional("CLOUDINARY_API_URL")
                        .unwrap_or_else(|| DEFAULT_MEDIA_API_URL.into()),
                ),
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                folder: optional("UPLOAD_FOLDER"),
            },
            messages_dir: optional("MESSAGES_DIR")
                .unwrap_or_else(|| DEFAULT_MESSAGES_DIR.into())
                .into(),
            website_origin: trim_trailing_slash(required("WEBSITE_ORIGIN")?),
        })
    }
}

/// Reads a variable that must be set. An empty value counts as unset.
fn required(name: &'static str) -> Result<String, Error> {
    match dotenvy::var(name) {
        Ok(value) if value.is_empty() => Err(Error::Missing {
            name,
            source: dotenvy::Error::EnvVar(VarError::NotPresent),
        }),
        result => result.map_err(|source| Error::Missing { name, source }),
    }
}

/// Reads a variable that may be unset. An empty value counts as unset.
fn optional(name: &'static str) -> Option<String> {
    dotenvy::var(name).ok().filter(|value| !value.is_empty())
}

/// Parses a boolean flag, accepting `true`/`false` and `1`/`0`.
fn parse_bool(name: &'static str, value: String) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::Invalid { name, value }),
    }
}

/// Removes any trailing `/` so paths can be appended with `format!("{base}/...")`.
fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }

    url
}
