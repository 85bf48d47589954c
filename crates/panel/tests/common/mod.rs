//! Scripted [`PipelineBackend`] for panel integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use brainrot_client::messages::{
    GenerateRequest, GenerateResponse, ListOutputsResponse, PipelineRunReport,
    RunPipelineRequest, StatusResponse, VoicesResponse,
};
use brainrot_client::{ApiError, PipelineBackend};
use brainrot_core::outputs::OutputItem;
use brainrot_core::service::ServiceStatus;
use brainrot_panel::events::PanelEvent;
use tokio::sync::{broadcast, Semaphore};

pub const BASE_URL: &str = "http://pipeline.test";

pub fn status_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "boom".to_string(),
    }
}

pub fn service(name: &str, status: &str) -> ServiceStatus {
    ServiceStatus {
        name: name.to_string(),
        status: status.to_string(),
        url: None,
    }
}

pub fn output(path: &str, files: &[&str]) -> OutputItem {
    OutputItem {
        id: None,
        path: path.to_string(),
        files: files.iter().map(|f| f.to_string()).collect(),
        mtime: None,
    }
}

/// Backend whose responses are set up by the test.
///
/// `None` in a scripted slot makes the call fail with a 500. Pipeline
/// runs succeed unless a `false` is queued in `run_outcomes`, and can be
/// held back with [`MockBackend::gated`].
#[derive(Default)]
pub struct MockBackend {
    pub services: Mutex<Option<Vec<ServiceStatus>>>,
    pub voices: Mutex<Option<Vec<String>>>,
    pub outputs: Mutex<Option<Vec<OutputItem>>>,
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub legacy: Mutex<Option<GenerateResponse>>,
    pub legacy_delay: Mutex<Option<Duration>>,
    pub run_outcomes: Mutex<VecDeque<bool>>,
    /// Every call, by endpoint name, in order.
    pub calls: Mutex<Vec<String>>,
    pub run_requests: Mutex<Vec<RunPipelineRequest>>,
    gate: Option<Arc<Semaphore>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockBackend {
    /// A backend where every scripted slot answers successfully but empty.
    pub fn new() -> Self {
        Self {
            services: Mutex::new(Some(Vec::new())),
            voices: Mutex::new(Some(Vec::new())),
            outputs: Mutex::new(Some(Vec::new())),
            ..Default::default()
        }
    }

    /// Pipeline runs wait for a permit from the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new()
        };
        (backend, gate)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl PipelineBackend for MockBackend {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn pipeline_status(&self) -> Result<StatusResponse, ApiError> {
        self.record("pipeline_status");
        let services = self.services.lock().unwrap().clone();
        services
            .map(|services| StatusResponse {
                services,
                all_online: None,
            })
            .ok_or_else(status_error)
    }

    async fn tts_voices(&self) -> Result<VoicesResponse, ApiError> {
        self.record("tts_voices");
        let voices = self.voices.lock().unwrap().clone();
        voices
            .map(|voices| VoicesResponse { voices })
            .ok_or_else(status_error)
    }

    async fn run_pipeline(
        &self,
        request: &RunPipelineRequest,
    ) -> Result<PipelineRunReport, ApiError> {
        self.record("run_pipeline");
        self.run_requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let ok = self.run_outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if ok {
            Ok(PipelineRunReport {
                overall_status: Some("success".to_string()),
                ..Default::default()
            })
        } else {
            Err(status_error())
        }
    }

    async fn list_outputs(&self) -> Result<ListOutputsResponse, ApiError> {
        self.record("list_outputs");
        let items = self.outputs.lock().unwrap().clone();
        items
            .map(|items| ListOutputsResponse { items })
            .ok_or_else(status_error)
    }

    async fn fetch_file(&self, folder: &str, file: &str) -> Result<Vec<u8>, ApiError> {
        self.record("fetch_file");
        let key = format!("{folder}/{file}");
        self.files
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            })
    }

    async fn legacy_generate(
        &self,
        _request: &GenerateRequest,
    ) -> Result<GenerateResponse, ApiError> {
        self.record("legacy_generate");
        let delay = *self.legacy_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let response = self.legacy.lock().unwrap().clone();
        response.ok_or_else(status_error)
    }
}

/// Everything received so far, without waiting.
pub fn drain_events(rx: &mut broadcast::Receiver<PanelEvent>) -> Vec<PanelEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
