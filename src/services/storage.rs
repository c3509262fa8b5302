use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object {key} could not be fetched: {message}")]
    Fetch { key: String, message: String },
    #[error("object {key} could not be uploaded: {message}")]
    Upload { key: String, message: String },
    #[error("download link for {key} could not be generated: {message}")]
    Presign { key: String, message: String },
}

/// Object key for a generated invoice. Second granularity matches the
/// documented storage layout; concurrent completions in the same second
/// overwrite, which the storage contract tolerates (last writer wins).
pub fn invoice_key(now: DateTime<Utc>) -> String {
    format!("docs/factura_{}.pdf", now.format("%Y%m%d%H%M%S"))
}

#[derive(Clone)]
pub struct StorageClient {
    client: S3Client,
    bucket: String,
}

impl StorageClient {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Downloads a company image stored under `images/`.
    pub async fn fetch_image(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let key = format!("images/{name}");

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Fetch {
                key: key.clone(),
                message: e.to_string(),
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Fetch {
                key: key.clone(),
                message: e.to_string(),
            })?
            .into_bytes()
            .to_vec();

        info!("Fetched {} ({} bytes)", key, bytes.len());
        Ok(bytes)
    }

    /// Uploads a rendered invoice under `docs/` and returns its object key.
    pub async fn upload_invoice(&self, pdf: Vec<u8>) -> Result<String, StorageError> {
        let key = invoice_key(Utc::now());
        let size = pdf.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(pdf))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.clone(),
                message: e.to_string(),
            })?;

        info!("Uploaded {} ({} bytes)", key, size);
        Ok(key)
    }

    /// Generates a time-bounded, credential-free download link.
    pub async fn presigned_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let config = PresigningConfig::expires_in(expires_in).map_err(|e| StorageError::Presign {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| StorageError::Presign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(request.uri().to_string())
    }
}
