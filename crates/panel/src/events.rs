//! Panel state-change events and the broadcast bus that carries them.
//!
//! Panel components never draw anything themselves. They publish a
//! [`PanelEvent`] after every state change and the rendering layer
//! subscribes to the [`PanelBus`].

use brainrot_core::job::{Job, JobStatus};
use brainrot_core::outputs::ResultView;
use brainrot_core::service::ServiceBoard;
use brainrot_core::types::JobId;
use brainrot_core::voices::VoiceOption;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PanelEvent
// ---------------------------------------------------------------------------

/// A state change the rendering layer may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The job list changed: jobs still waiting (in order) and the job
    /// currently running, if any.
    QueueChanged {
        pending: Vec<Job>,
        active: Option<Job>,
    },

    /// One job changed status.
    JobStatusChanged { id: JobId, status: JobStatus },

    /// A status poll updated the service badges.
    ServicesUpdated { board: ServiceBoard },

    /// The voice selection was (re)populated.
    VoicesLoaded { options: Vec<VoiceOption> },

    /// The latest-result area changed.
    ResultUpdated { view: ResultView },

    /// Service URLs were written to the local store.
    ConfigSaved,

    /// Full text of the legacy generation log.
    LegacyLog { text: String },

    /// Free-form message for the user.
    Notice { message: String },
}

// ---------------------------------------------------------------------------
// PanelBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`PanelEvent`]s.
pub struct PanelBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl PanelBus {
    /// Bus buffering up to `capacity` undelivered events per receiver.
    /// A receiver that falls further behind sees `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send `event` to every receiver subscribed right now.
    pub fn publish(&self, event: PanelEvent) {
        // A send error only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.publish(PanelEvent::Notice {
            message: message.into(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }
}

impl Default for PanelBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
