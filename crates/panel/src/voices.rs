//! One-shot voice list loader.

use std::sync::Arc;

use brainrot_client::PipelineBackend;
use brainrot_core::voices::{voice_options, VoiceOption};

use crate::events::{PanelBus, PanelEvent};
use crate::form::SharedForm;

pub struct VoiceLoader {
    backend: Arc<dyn PipelineBackend>,
    bus: Arc<PanelBus>,
    form: SharedForm,
}

impl VoiceLoader {
    pub fn new(backend: Arc<dyn PipelineBackend>, bus: Arc<PanelBus>, form: SharedForm) -> Self {
        Self { backend, bus, form }
    }

    /// Fetch the voice list and repopulate the selection.
    ///
    /// An empty list yields the single fallback voice. On failure nothing
    /// is populated and an empty list is returned. The first option is
    /// selected unless the current selection is one of the options.
    pub async fn load(&self) -> Vec<VoiceOption> {
        let voices = match self.backend.tts_voices().await {
            Ok(response) => response.voices,
            Err(e) => {
                tracing::warn!(error = %e, "Loading voices failed");
                return Vec::new();
            }
        };

        let options = voice_options(voices);
        tracing::info!(count = options.len(), "Voices loaded");

        {
            let mut form = self.form.write().await;
            let current = &form.selections.voice;
            if !options.iter().any(|o| &o.id == current) {
                if let Some(first) = options.first() {
                    form.selections.voice = first.id.clone();
                }
            }
        }

        self.bus.publish(PanelEvent::VoicesLoaded {
            options: options.clone(),
        });
        options
    }
}
