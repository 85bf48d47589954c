//! Panel controller.
//!
//! Owns every panel component, performs the startup sequence, and turns
//! console [`Command`]s into component calls. Results reach the user
//! only through the [`PanelBus`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use brainrot_client::PipelineBackend;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::console::{Command, HELP};
use crate::error::PanelError;
use crate::events::{PanelBus, PanelEvent};
use crate::form::{FormState, SharedForm};
use crate::legacy::LegacyGenerator;
use crate::poller::StatusPoller;
use crate::queue::JobQueue;
use crate::render::{render_form, render_queue};
use crate::results::{ArtifactKind, ResultViewer};
use crate::store::ConfigStore;
use crate::voices::VoiceLoader;

/// Whether the input loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Panel {
    bus: Arc<PanelBus>,
    form: SharedForm,
    store: ConfigStore,
    poller: Arc<StatusPoller>,
    voices: VoiceLoader,
    viewer: Arc<ResultViewer>,
    queue: JobQueue,
    legacy: Arc<LegacyGenerator>,
    cancel: CancellationToken,
}

impl Panel {
    pub fn new(
        backend: Arc<dyn PipelineBackend>,
        store: ConfigStore,
        status_interval: Duration,
    ) -> Self {
        let bus = Arc::new(PanelBus::default());
        let form = FormState::default().shared();
        let viewer = Arc::new(ResultViewer::new(Arc::clone(&backend), Arc::clone(&bus)));

        Self {
            poller: Arc::new(StatusPoller::new(
                Arc::clone(&backend),
                Arc::clone(&bus),
                status_interval,
            )),
            voices: VoiceLoader::new(Arc::clone(&backend), Arc::clone(&bus), Arc::clone(&form)),
            queue: JobQueue::new(
                Arc::clone(&backend),
                Arc::clone(&form),
                Arc::clone(&viewer),
                Arc::clone(&bus),
            ),
            legacy: Arc::new(LegacyGenerator::new(backend, Arc::clone(&bus))),
            viewer,
            store,
            form,
            bus,
            cancel: CancellationToken::new(),
        }
    }

    pub fn bus(&self) -> &Arc<PanelBus> {
        &self.bus
    }

    pub fn form(&self) -> &SharedForm {
        &self.form
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn poller(&self) -> &Arc<StatusPoller> {
        &self.poller
    }

    pub fn viewer(&self) -> &Arc<ResultViewer> {
        &self.viewer
    }

    pub fn legacy(&self) -> &Arc<LegacyGenerator> {
        &self.legacy
    }

    /// Token cancelled by [`Panel::shutdown`].
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Startup sequence: restore saved URLs into the form, poll once,
    /// load voices, show the latest result, then keep polling in the
    /// background.
    pub async fn start(&self) -> JoinHandle<()> {
        let urls = self.store.load();
        tracing::info!(path = %self.store.path().display(), "Service URLs restored");
        self.form.write().await.urls = urls;

        self.poller.poll().await;
        self.voices.load().await;
        self.viewer.refresh().await;

        let poller = Arc::clone(&self.poller);
        let cancel = self.cancel.clone();
        tokio::spawn(async move { poller.run(cancel).await })
    }

    /// Persist the URLs currently in the form, then refresh service
    /// status. A failed status refresh does not undo the save.
    pub async fn save_config(&self) -> Result<(), PanelError> {
        let urls = self.form.read().await.urls.clone();
        self.store.save(&urls)?;
        self.bus.publish(PanelEvent::ConfigSaved);
        self.poller.poll().await;
        Ok(())
    }

    /// Write one artifact of the latest result to `dest`.
    pub async fn fetch_artifact(
        &self,
        kind: ArtifactKind,
        dest: &Path,
    ) -> Result<String, PanelError> {
        let (file, bytes) = self.viewer.fetch(kind).await?;
        tokio::fs::write(dest, &bytes).await?;
        tracing::info!(
            file = %file,
            dest = %dest.display(),
            size = bytes.len(),
            "Artifact saved"
        );
        Ok(file)
    }

    /// Execute one console command.
    pub async fn handle(&self, command: Command) -> Flow {
        match command {
            Command::Generate(count) => {
                let count = match count {
                    Some(n) => n,
                    None => self.form.read().await.count,
                };
                if let Err(e) = self.queue.enqueue(count).await {
                    self.bus.notice(e.to_string());
                }
            }
            Command::SelectCount(count) => {
                self.form.write().await.count = count;
                self.bus.notice(format!("Count set to {count}"));
            }
            Command::ShowJobs => {
                let snapshot = self.queue.snapshot().await;
                self.bus
                    .notice(render_queue(&snapshot.pending, snapshot.active.as_ref()));
            }
            Command::RefreshStatus => {
                if !self.poller.poll().await {
                    self.bus.notice("Status refresh failed, showing previous state");
                }
            }
            Command::ReloadVoices => {
                if self.voices.load().await.is_empty() {
                    self.bus.notice("Voices could not be loaded");
                }
            }
            Command::SelectVoice(voice) => {
                self.bus.notice(format!("Voice set to {voice}"));
                self.form.write().await.selections.voice = voice;
            }
            Command::SetSpeed(speed) => {
                self.form.write().await.selections.speed = speed;
                self.bus.notice(format!("Speed set to {speed}"));
            }
            Command::SetStep(step, enabled) => {
                self.form.write().await.selections.set_step(step, enabled);
                let state = if enabled { "on" } else { "off" };
                self.bus.notice(format!("Step {step} {state}"));
            }
            Command::ShowConfig => {
                let form = self.form.read().await;
                self.bus.notice(render_form(&form.urls, &form.selections));
            }
            Command::SetUrl(field, url) => {
                self.form.write().await.urls.set(field, url);
                self.bus
                    .notice("URL updated (use `config save` to keep it)");
            }
            Command::SaveConfig => {
                if let Err(e) = self.save_config().await {
                    tracing::error!(error = %e, "Saving service URLs failed");
                    self.bus.notice(format!("Saving settings failed: {e}"));
                }
            }
            Command::RefreshResults => {
                if self.viewer.refresh().await.is_none() {
                    self.bus.notice("Results could not be loaded");
                }
            }
            Command::Fetch { kind, dest } => match self.fetch_artifact(kind, &dest).await {
                Ok(file) => self
                    .bus
                    .notice(format!("Saved {file} to {}", dest.display())),
                Err(e) => self.bus.notice(format!("Fetch failed: {e}")),
            },
            Command::Legacy { count, publish } => {
                let legacy = Arc::clone(&self.legacy);
                let bus = Arc::clone(&self.bus);
                tokio::spawn(async move {
                    if let Err(e) = legacy.run(count, publish).await {
                        bus.notice(e.to_string());
                    }
                });
            }
            Command::Help => self.bus.notice(HELP),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Stop background work.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
