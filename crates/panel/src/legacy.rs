//! One-shot batch generation through the legacy `/generate` endpoint.
//!
//! Independent of the job queue: it posts a single request, waits for
//! the whole batch, and writes the outcome to its own text log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use brainrot_client::messages::{GenerateRequest, GenerateResponse};
use brainrot_client::PipelineBackend;
use brainrot_core::job::validate_enqueue_count;
use tokio::sync::Mutex;

use crate::error::PanelError;
use crate::events::{PanelBus, PanelEvent};

const LOG_STARTED: &str = "Starting generation...\n";

pub struct LegacyGenerator {
    backend: Arc<dyn PipelineBackend>,
    bus: Arc<PanelBus>,
    busy: AtomicBool,
    log: Mutex<String>,
}

/// Clears the busy flag when the run ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LegacyGenerator {
    pub fn new(backend: Arc<dyn PipelineBackend>, bus: Arc<PanelBus>) -> Self {
        Self {
            backend,
            bus,
            busy: AtomicBool::new(false),
            log: Mutex::new(String::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Current log text.
    pub async fn log(&self) -> String {
        self.log.lock().await.clone()
    }

    /// Run one batch of `count` shorts and return the final log text.
    ///
    /// Only one run may be in flight; a second call fails with
    /// [`PanelError::LegacyBusy`] without touching the log.
    pub async fn run(&self, count: u32, publish: bool) -> Result<String, PanelError> {
        validate_enqueue_count(count)?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PanelError::LegacyBusy);
        }
        let _guard = BusyGuard(&self.busy);

        self.reset_log().await;
        tracing::info!(count, publish, "Legacy generation started");

        let request = GenerateRequest { count, publish };
        let text = match self.backend.legacy_generate(&request).await {
            Ok(response) => {
                if response.success {
                    tracing::info!(
                        outdir = response.outdir.as_deref().unwrap_or("-"),
                        "Legacy generation finished"
                    );
                } else {
                    tracing::warn!("Legacy generation reported failure");
                }
                outcome_text(&response)
            }
            Err(e) => {
                tracing::error!(error = %e, "Legacy generation request failed");
                format!("Exception: {e}")
            }
        };

        Ok(self.append_log(&text).await)
    }

    async fn reset_log(&self) {
        let mut log = self.log.lock().await;
        *log = LOG_STARTED.to_string();
        self.bus.publish(PanelEvent::LegacyLog { text: log.clone() });
    }

    async fn append_log(&self, text: &str) -> String {
        let mut log = self.log.lock().await;
        log.push_str(text);
        self.bus.publish(PanelEvent::LegacyLog { text: log.clone() });
        log.clone()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Log text for a parsed legacy response.
fn outcome_text(response: &GenerateResponse) -> String {
    if response.success {
        let mut text = format!("{}\n", response.stdout.as_deref().unwrap_or_default());
        if let Some(stderr) = non_empty(&response.stderr) {
            text.push_str("\nErrors:\n");
            text.push_str(stderr);
        }
        text.push_str("\nOutput saved to: ");
        text.push_str(response.outdir.as_deref().unwrap_or_default());
        text
    } else {
        let reason = non_empty(&response.stderr)
            .or_else(|| non_empty(&response.error))
            .unwrap_or("unknown");
        format!("Error:\n{reason}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(success: bool) -> GenerateResponse {
        GenerateResponse {
            success,
            ..Default::default()
        }
    }

    #[test]
    fn success_with_stderr() {
        let text = outcome_text(&GenerateResponse {
            stdout: Some("made 2 shorts".to_string()),
            stderr: Some("warning: slow".to_string()),
            outdir: Some("outputs/web_1".to_string()),
            ..response(true)
        });
        assert_eq!(
            text,
            "made 2 shorts\n\nErrors:\nwarning: slow\nOutput saved to: outputs/web_1"
        );
    }

    #[test]
    fn success_without_stderr() {
        let text = outcome_text(&GenerateResponse {
            stdout: Some("ok".to_string()),
            stderr: Some(String::new()),
            outdir: Some("outputs/web_2".to_string()),
            ..response(true)
        });
        assert_eq!(text, "ok\n\nOutput saved to: outputs/web_2");
    }

    #[test]
    fn failure_prefers_stderr_then_error() {
        let with_stderr = GenerateResponse {
            stderr: Some("Traceback".to_string()),
            error: Some("ignored".to_string()),
            ..response(false)
        };
        assert_eq!(outcome_text(&with_stderr), "Error:\nTraceback");

        let with_error = GenerateResponse {
            stderr: Some(String::new()),
            error: Some("spawn failed".to_string()),
            ..response(false)
        };
        assert_eq!(outcome_text(&with_error), "Error:\nspawn failed");

        assert_eq!(outcome_text(&response(false)), "Error:\nunknown");
    }
}
