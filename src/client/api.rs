use reqwest::multipart;
use reqwest::StatusCode;

use crate::error::{AppError, ErrorBody, Result};
use crate::models::{ItemType, TimelineItem};

/// HTTP client for the timeline API
#[derive(Debug, Clone)]
pub struct TimelineClient {
    base_url: String,
    client: reqwest::Client,
}

impl TimelineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// List timeline items, newest first
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<TimelineItem>> {
        let response = self
            .client
            .get(format!("{}/api/timeline/", self.base_url))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch a single item by id
    pub async fn get(&self, id: i64) -> Result<TimelineItem> {
        let response = self
            .client
            .get(format!("{}/api/timeline/{}", self.base_url, id))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Create a text-only status entry
    pub async fn create_status(&self, text: &str) -> Result<TimelineItem> {
        let response = self
            .client
            .post(format!("{}/api/timeline/", self.base_url))
            .form(&[("type", "status"), ("text", text)])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Create an entry carrying a media file
    pub async fn create_with_file(
        &self,
        item_type: ItemType,
        text: Option<&str>,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<TimelineItem> {
        let part = multipart::Part::bytes(data).file_name(filename.to_string());
        let mut form = multipart::Form::new()
            .text("type", item_type.as_str())
            .part("file", part);
        if let Some(text) = text {
            form = form.text("text", text.to_string());
        }

        let response = self
            .client
            .post(format!("{}/api/timeline/", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Turn a stored media reference into a fetchable URL.
    /// Relative references point back at this server; absolute ones
    /// (object store) pass through unchanged.
    pub fn resolve_media_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}{}", self.base_url, reference)
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("Request failed with status {}", status),
        };

        Err(match status {
            StatusCode::BAD_REQUEST => AppError::Validation(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Internal(message),
        })
    }
}
