//! REST client for the pipeline service endpoints.
//!
//! Wraps every endpoint the panel talks to using [`reqwest`] and sorts
//! failures into transport, status and shape errors.

use std::time::Duration;

use async_trait::async_trait;
use brainrot_core::endpoints;
use brainrot_core::outputs::file_url;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::backend::PipelineBackend;
use crate::messages::{
    GenerateRequest, GenerateResponse, ListOutputsResponse, PipelineRunReport,
    RunPipelineRequest, StatusResponse, VoicesResponse,
};

/// HTTP client for a single pipeline service.
pub struct PipelineApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the pipeline REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or its body could not be read
    /// (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something other than `200 OK`.
    #[error("Pipeline API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape the endpoint promises.
    #[error("Unexpected response from {endpoint}: {source}")]
    Shape {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Build the shared [`reqwest::Client`].
///
/// No timeout is applied unless one is given; a hung call then blocks
/// only the task awaiting it.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, ApiError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(format!("brainrot-panel/{}", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

impl PipelineApi {
    /// Create a new API client for a pipeline service.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- private helpers ----

    /// Ensure the response is `200 OK`. Returns the response unchanged on
    /// success, or an [`ApiError::Status`] with the body text otherwise.
    async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Decode a JSON body, keeping decode failures apart from transport
    /// failures.
    fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|source| ApiError::Shape { endpoint, source })
    }

    /// Check the status, then parse the JSON body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_ok(response).await?;
        let body = response.text().await?;
        Self::decode(endpoint, &body)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        Self::parse_response(endpoint, response).await
    }
}

#[async_trait]
impl PipelineBackend for PipelineApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn pipeline_status(&self) -> Result<StatusResponse, ApiError> {
        self.get_json(endpoints::PIPELINE_STATUS).await
    }

    async fn tts_voices(&self) -> Result<VoicesResponse, ApiError> {
        self.get_json(endpoints::TTS_VOICES).await
    }

    async fn run_pipeline(
        &self,
        request: &RunPipelineRequest,
    ) -> Result<PipelineRunReport, ApiError> {
        let response = self
            .client
            .post(self.url(endpoints::RUN_PIPELINE))
            .json(request)
            .send()
            .await?;

        // Any JSON body with a 200 is a success; its shape is not checked.
        let body: serde_json::Value =
            Self::parse_response(endpoints::RUN_PIPELINE, response).await?;
        Ok(PipelineRunReport::from_body(body))
    }

    async fn list_outputs(&self) -> Result<ListOutputsResponse, ApiError> {
        self.get_json(endpoints::LIST_OUTPUTS).await
    }

    async fn fetch_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(file_url(&self.base_url, folder, file))
            .send()
            .await?;

        let response = Self::ensure_ok(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// The legacy endpoint reports failures in a JSON body, sometimes with
    /// a 500 status. Any status whose body still parses is returned as a
    /// normal response.
    async fn legacy_generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ApiError> {
        let response = self
            .client
            .post(self.url(endpoints::LEGACY_GENERATE))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match Self::decode::<GenerateResponse>(endpoints::LEGACY_GENERATE, &body) {
            Ok(parsed) => {
                if status != StatusCode::OK {
                    tracing::warn!(
                        status = status.as_u16(),
                        "Legacy generate returned an error status"
                    );
                }
                Ok(parsed)
            }
            Err(_) if status != StatusCode::OK => Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(e),
        }
    }
}
