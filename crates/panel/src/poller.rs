//! Background service status poller.
//!
//! Fetches the pipeline status endpoint on a fixed interval and mirrors
//! the reported availability onto the [`ServiceBoard`]. A failed poll is
//! logged and leaves the previous badges in place until the next one
//! succeeds.

use std::sync::Arc;
use std::time::Duration;

use brainrot_client::PipelineBackend;
use brainrot_core::service::ServiceBoard;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::events::{PanelBus, PanelEvent};

pub struct StatusPoller {
    backend: Arc<dyn PipelineBackend>,
    bus: Arc<PanelBus>,
    board: RwLock<ServiceBoard>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn PipelineBackend>, bus: Arc<PanelBus>, interval: Duration) -> Self {
        Self {
            backend,
            bus,
            board: RwLock::new(ServiceBoard::default()),
            interval,
        }
    }

    /// Current badges.
    pub async fn board(&self) -> ServiceBoard {
        self.board.read().await.clone()
    }

    /// One status request. Returns `false` if the poll failed.
    pub async fn poll(&self) -> bool {
        let status = match self.backend.pipeline_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Status poll failed");
                return false;
            }
        };

        let board = {
            let mut board = self.board.write().await;
            let updated = board.apply(&status.services);
            tracing::debug!(
                reported = status.services.len(),
                updated = updated.len(),
                "Service status refreshed",
            );
            board.clone()
        };

        self.bus.publish(PanelEvent::ServicesUpdated { board });
        true
    }

    /// Poll every `interval` until the cancellation token is triggered.
    ///
    /// The first poll happens one interval from now; the startup poll is
    /// the caller's.
    pub async fn run(&self, cancel: CancellationToken) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Status poller started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Status poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.poll().await;
                }
            }
        }
    }
}
