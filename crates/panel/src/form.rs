//! Everything the user has selected but not necessarily saved.

use std::sync::Arc;

use brainrot_client::messages::RunPipelineRequest;
use brainrot_core::config::ServiceUrls;
use brainrot_core::job::DEFAULT_ENQUEUE_COUNT;
use brainrot_core::selections::RunSelections;
use tokio::sync::RwLock;

/// Form state shared between the console and the job runner.
pub type SharedForm = Arc<RwLock<FormState>>;

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Service URLs as currently edited (saved or not).
    pub urls: ServiceUrls,
    pub selections: RunSelections,
    /// Jobs queued by a plain `generate`.
    pub count: u32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            urls: ServiceUrls::default(),
            selections: RunSelections::default(),
            count: DEFAULT_ENQUEUE_COUNT,
        }
    }
}

impl FormState {
    pub fn shared(self) -> SharedForm {
        Arc::new(RwLock::new(self))
    }

    /// Request body for one pipeline run, reflecting the form right now.
    pub fn run_request(&self) -> RunPipelineRequest {
        RunPipelineRequest::from_selections(&self.selections, &self.urls)
    }
}
