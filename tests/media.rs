//! Tests of the upload helper against a stand-in for the media service.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use storefront::media::{self, MediaClient, Upload};

/// Builds a client for a freshly started fake media service.
async fn client(api_key: &str) -> Result<MediaClient> {
    let media_url = common::spawn(common::fake_media_service()).await?;

    let mut config = common::config(String::new(), media_url).media;
    config.api_key = api_key.into();

    Ok(MediaClient::new(config))
}

#[tokio::test]
async fn upload_resolves_with_url_and_id() -> Result<()> {
    let client = client(common::API_KEY).await?;

    let upload = client
        .upload(b"\x89PNG".to_vec(), Some("photo.png".into()))
        .await?;

    assert_eq!(
        upload,
        Upload {
            url: "https://res.example.com/demo/image/upload/products/photo.png".into(),
            public_id: "products/photo".into(),
        },
    );

    Ok(())
}

#[tokio::test]
async fn upload_rejects_with_provider_error() -> Result<()> {
    let client = client(common::API_KEY).await?;

    let error = client
        .upload(b"not an image".to_vec(), Some("reject.png".into()))
        .await
        .expect_err("upload should be rejected");

    match &error {
        media::Error::Provider { status, message } => {
            assert_eq!(*status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Invalid image file");
        }
        media::Error::Request(_) => panic!("expected a provider error, got {error:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn upload_with_wrong_credentials_rejected() -> Result<()> {
    let client = client("wrong-key").await?;

    let error = client
        .upload(b"\x89PNG".to_vec(), Some("photo.png".into()))
        .await
        .expect_err("upload should be rejected");

    assert!(
        matches!(
            &error,
            media::Error::Provider { status, message }
                if *status == StatusCode::UNAUTHORIZED && message == "Invalid Signature"
        ),
        "unexpected error: {error:?}",
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_service_fails() -> Result<()> {
    let mut config = common::config(String::new(), "http://127.0.0.1:1".into()).media;
    config.api_key = common::API_KEY.into();

    let error = MediaClient::new(config)
        .upload(Vec::new(), None)
        .await
        .expect_err("upload should fail");

    assert!(matches!(error, media::Error::Request(_)), "{error:?}");

    Ok(())
}
