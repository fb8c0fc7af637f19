//! Blocking HTTP implementation of [`Backend`].

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use super::Backend;
use super::types::{
    AnalyzeRequest, AnalyzeResponse, SaveImageRequest, SaveImageResponse, ServiceStatus,
};
use crate::config::BackendConfig;
use crate::error::{Error, Result};

const STATUS_PATH: &str = "/api/ai-indexing/status";
const ANALYZE_PATH: &str = "/api/ai-indexing/analyze";
const SAVE_IMAGE_PATH: &str = "/api/save-edited-image";

/// Backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the server described by `config`.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::backend(status.as_u16(), message));
        }
        Ok(response.json()?)
    }
}

impl Backend for HttpBackend {
    fn status(&self) -> Result<ServiceStatus> {
        log::debug!("Checking AI indexing status");
        let response = self
            .client
            .get(self.url(STATUS_PATH))
            .header(ACCEPT, "application/json")
            .send()?;
        Self::decode(response)
    }

    fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        log::info!(
            "🚀 Analyzing {} image(s) for {}",
            request.images.len(),
            request.document_name
        );
        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(request)
            .send()?;
        let body: AnalyzeResponse = Self::decode(response)?;
        if !body.success {
            return Err(Error::backend(
                0,
                body.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(body)
    }

    fn save_edited_image(&self, request: &SaveImageRequest) -> Result<SaveImageResponse> {
        log::info!(
            "💾 Saving edited {} (replace: {})",
            request.original_filename,
            request.replace_original
        );
        let response = self
            .client
            .post(self.url(SAVE_IMAGE_PATH))
            .json(request)
            .send()?;
        Self::decode(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_secs: None,
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(
            backend.url(STATUS_PATH),
            "http://localhost:5000/api/ai-indexing/status"
        );
    }
}
