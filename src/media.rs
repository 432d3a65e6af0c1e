//! Uploads to the hosted media service.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::MediaConfig;

/// The file name sent when the uploader didn't give one.
const DEFAULT_FILE_NAME: &str = "upload";

/// A successfully uploaded file.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    /// The HTTPS URL the file is delivered from.
    pub url: String,

    /// The media service's identifier for the file.
    pub public_id: String,
}

/// The fields of the media service's upload response this server uses.
#[derive(Deserialize, Debug)]
struct UploadResponse {
    /// See [`Upload::url`].
    secure_url: String,

    /// See [`Upload::public_id`].
    public_id: String,
}

/// An error uploading a file.
#[derive(Error, Debug)]
pub enum Error {
    /// The media service rejected the upload.
    #[error("media service responded with {status}: {message}")]
    Provider {
        /// The media service's response status.
        status: StatusCode,

        /// The media service's error message.
        message: String,
    },

    /// The request couldn't be sent or the response couldn't be read.
    #[error("media service request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A client for the media service's upload API.
#[derive(Clone, Debug)]
pub struct MediaClient {
    /// The HTTP client, shared between requests.
    http: reqwest::Client,

    /// The credentials and target folder.
    config: MediaConfig,
}

impl MediaClient {
    /// Constructs a [`MediaClient`] from its configuration.
    pub fn new(config: MediaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Uploads a file, letting the media service detect its type.
    ///
    /// Resolves once, with either the uploaded file's URL and ID or the media service's error.
    ///
    /// # Errors
    ///
    /// Forwards the media service's error, or fails if the service can't be reached.
    pub async fn upload(&self, file: Vec<u8>, file_name: Option<String>) -> Result<Upload, Error> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();

        let mut params = BTreeMap::from([("timestamp", timestamp)]);

        if let Some(folder) = &self.config.folder {
            params.insert("folder", folder.clone());
        }

        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(file).file_name(file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.into())),
            )
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        for (name, value) in params {
            form = form.text(name, value);
        }

        let response = self
            .http
            .post(format!(
                "{}/{}/auto/upload",
                self.config.api_url, self.config.cloud_name
            ))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or_default();

            return Err(Error::Provider {
                status,
                message: body["error"]["message"]
                    .as_str()
                    .or(status.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_owned(),
            });
        }

        let uploaded: UploadResponse = response.json().await?;

        Ok(Upload {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}

/// Signs upload parameters: the SHA-1 hex digest of the parameters joined as `k=v&k=v` in
/// alphabetical order, followed by the API secret.
fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let mut to_sign = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    to_sign.push_str(api_secret);

    digest(&SHA1_FOR_LEGACY_USE_ONLY, to_sign.as_bytes())
        .as_ref()
        .iter()
        .fold(String::with_capacity(40), |mut hex, byte| {
            _ = write!(hex, "{byte:02x}");
            hex
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_documented_example() {
        let params = BTreeMap::from([
            ("timestamp", "1315060510".to_owned()),
            ("public_id", "sample_image".to_owned()),
        ]);

        assert_eq!(
            sign(&params, "abcd"),
            "b4ad47fb4e25c7bf5f92a20089f9db59bc302313",
        );
    }

    #[test]
    fn signature_includes_folder() {
        let params = BTreeMap::from([
            ("timestamp", "1700000000".to_owned()),
            ("folder", "products".to_owned()),
        ]);

        assert_eq!(sign(&params, "secret"), "bc9e22e54c1e184171f38e2dca41c66ea461866d");
    }

    #[test]
    fn upload_serializes_camel_case() -> anyhow::Result<()> {
        let upload = Upload {
            url: "https://res.example.com/a.png".into(),
            public_id: "products/a".into(),
        };

        assert_eq!(
            serde_json::to_value(upload)?,
            serde_json::json!({ "url": "https://res.example.com/a.png", "publicId": "products/a" }),
        );

        Ok(())
    }
}
