use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::config::S3Config;
use crate::error::{AppError, Result};
use crate::storage::StorageProvider;

type HmacSha1 = Hmac<Sha1>;

/// S3-compatible object storage provider
pub struct S3Storage {
    config: S3Config,
    client: reqwest::Client,
}

impl S3Storage {
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Virtual-host style bucket host
    fn host(&self) -> String {
        if self.config.endpoint.is_empty() {
            format!("{}.s3.{}.amazonaws.com", self.config.bucket, self.config.region)
        } else {
            format!("{}.{}", self.config.bucket, self.config.endpoint)
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!("https://{}/{}", self.host(), urlencoding::encode(name))
    }

    /// AWS V2 style authorization header: HMAC-SHA1 over the canonical
    /// request string, base64 encoded
    fn authorization(
        &self,
        method: &str,
        content_type: &str,
        date: &str,
        name: &str,
    ) -> Result<String> {
        let resource = format!("/{}/{}", self.config.bucket, name);
        let string_to_sign = format!("{}\n\n{}\n{}\n{}", method, content_type, date, resource);

        let mut mac = HmacSha1::new_from_slice(self.config.secret_key.as_bytes())
            .map_err(|e| AppError::Storage(format!("Invalid secret key: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!("AWS {}:{}", self.config.access_key, signature))
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn put(&self, name: &str, data: Bytes) -> Result<()> {
        let content_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .to_string();
        let date = Utc::now().format("%a, %d %b %Y %T GMT").to_string();
        let authorization = self.authorization("PUT", &content_type, &date, name)?;

        let response = self
            .client
            .put(self.object_url(name))
            .header("Date", date)
            .header("Content-Type", content_type)
            .header("Authorization", authorization)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Object store request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Object store returned {}: {}",
                status, body
            )));
        }

        tracing::debug!("Uploaded media to bucket {} as {}", self.config.bucket, name);
        Ok(())
    }

    fn url_for(&self, name: &str) -> String {
        match &self.config.public_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), name),
            None => self.object_url(name),
        }
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
