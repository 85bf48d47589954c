//! Request and response bodies of the pipeline service.
//!
//! Response types are lenient: list fields missing from a body read as
//! empty, and unknown fields are ignored.

use std::collections::BTreeMap;

use brainrot_core::config::{non_empty, ServiceUrls};
use brainrot_core::outputs::OutputItem;
use brainrot_core::selections::RunSelections;
use brainrot_core::service::ServiceStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the `pipeline-status` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
    #[serde(default, rename = "allOnline")]
    pub all_online: Option<bool>,
}

/// Body of the `tts-voices` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<String>,
}

/// Body of a `run-pipeline` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineRequest {
    pub generate_story: bool,
    #[serde(rename = "generateTTS")]
    pub generate_tts: bool,
    pub generate_image: bool,
    pub publish: bool,
    pub story_prompt: Option<String>,
    pub piper_url: Option<String>,
    pub coqui_url: Option<String>,
    pub ollama_url: Option<String>,
    pub sd_url: Option<String>,
    pub voice: Option<String>,
    pub speed: f64,
}

impl RunPipelineRequest {
    /// Build a request from the current selections and service URLs.
    ///
    /// Queued runs never publish and always let the service pick the story
    /// prompt.
    pub fn from_selections(selections: &RunSelections, urls: &ServiceUrls) -> Self {
        Self {
            generate_story: selections.generate_story,
            generate_tts: selections.generate_tts,
            generate_image: selections.generate_image,
            publish: false,
            story_prompt: None,
            piper_url: non_empty(&urls.piper_url),
            coqui_url: None,
            ollama_url: non_empty(&urls.ollama_url),
            sd_url: non_empty(&urls.sd_url),
            voice: non_empty(&selections.voice),
            speed: selections.speed,
        }
    }
}

/// Outcome of one pipeline step as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub status: String,
    pub note: Option<String>,
    pub error: Option<String>,
}

impl StepReport {
    fn from_value(value: &Value) -> Self {
        Self {
            status: scalar_text(&value["status"]).unwrap_or_default(),
            note: scalar_text(&value["note"]),
            error: scalar_text(&value["error"]),
        }
    }
}

/// Lenient view over a `run-pipeline` success body.
///
/// Any JSON body counts as success; the fields below are picked out for
/// logging only and are empty when absent or of an unexpected type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineRunReport {
    pub pipeline_id: Option<String>,
    pub overall_status: Option<String>,
    pub steps: BTreeMap<String, StepReport>,
    /// The body exactly as received.
    pub body: Value,
}

impl PipelineRunReport {
    pub fn from_body(body: Value) -> Self {
        let steps = body["steps"]
            .as_object()
            .map(|steps| {
                steps
                    .iter()
                    .map(|(name, step)| (name.clone(), StepReport::from_value(step)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            pipeline_id: scalar_text(&body["pipelineId"]),
            overall_status: scalar_text(&body["overallStatus"]),
            steps,
            body,
        }
    }
}

/// Text of a string, number or boolean value.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Body of the `list-outputs` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOutputsResponse {
    #[serde(default)]
    pub items: Vec<OutputItem>,
}

/// Body of a legacy `/generate` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub count: u32,
    pub publish: bool,
}

/// Body of a legacy `/generate` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub outdir: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
