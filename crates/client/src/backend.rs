//! Seam between the panel and the pipeline service.
//!
//! The panel only ever talks to a [`PipelineBackend`]; [`PipelineApi`]
//! is the HTTP implementation, and tests substitute scripted ones.
//!
//! [`PipelineApi`]: crate::api::PipelineApi

use async_trait::async_trait;

use crate::api::ApiError;
use crate::messages::{
    GenerateRequest, GenerateResponse, ListOutputsResponse, PipelineRunReport,
    RunPipelineRequest, StatusResponse, VoicesResponse,
};

#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Base URL the service is reached at, without a trailing slash.
    fn base_url(&self) -> &str;

    /// URL serving `<folder>/<file>` through the get-file endpoint.
    fn file_url(&self, folder: &str, file: &str) -> String {
        brainrot_core::outputs::file_url(self.base_url(), folder, file)
    }

    async fn pipeline_status(&self) -> Result<StatusResponse, ApiError>;

    async fn tts_voices(&self) -> Result<VoicesResponse, ApiError>;

    /// Run the pipeline once. Anything but `200 OK` is an error.
    async fn run_pipeline(&self, request: &RunPipelineRequest)
        -> Result<PipelineRunReport, ApiError>;

    /// Output folders, newest first.
    async fn list_outputs(&self) -> Result<ListOutputsResponse, ApiError>;

    /// Raw bytes of `<folder>/<file>`.
    async fn fetch_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, ApiError>;

    async fn legacy_generate(&self, request: &GenerateRequest)
        -> Result<GenerateResponse, ApiError>;
}
