//! Latest-result viewer.
//!
//! After each finished job the viewer asks the service for its output
//! folders and shows the newest one. The folder is kept so its artifacts
//! can be downloaded later.

use std::sync::Arc;

use brainrot_client::PipelineBackend;
use brainrot_core::outputs::{result_view, select_artifacts, OutputItem, ResultView};
use tokio::sync::RwLock;

use crate::error::PanelError;
use crate::events::{PanelBus, PanelEvent};

/// Which artifact of the latest result to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Video,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

pub struct ResultViewer {
    backend: Arc<dyn PipelineBackend>,
    bus: Arc<PanelBus>,
    latest: RwLock<Option<OutputItem>>,
}

impl ResultViewer {
    pub fn new(backend: Arc<dyn PipelineBackend>, bus: Arc<PanelBus>) -> Self {
        Self {
            backend,
            bus,
            latest: RwLock::new(None),
        }
    }

    /// Re-read the output listing and publish the newest result.
    ///
    /// Returns `None` when the listing could not be fetched; the previous
    /// view stays on screen in that case.
    pub async fn refresh(&self) -> Option<ResultView> {
        let listing = match self.backend.list_outputs().await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(error = %e, "Listing outputs failed");
                return None;
            }
        };

        let view = result_view(self.backend.base_url(), &listing.items);
        *self.latest.write().await = listing.items.into_iter().next();

        self.bus.publish(PanelEvent::ResultUpdated { view: view.clone() });
        Some(view)
    }

    /// Download one artifact of the latest result.
    ///
    /// Returns the file name alongside its bytes.
    pub async fn fetch(&self, kind: ArtifactKind) -> Result<(String, Vec<u8>), PanelError> {
        let latest = self
            .latest
            .read()
            .await
            .clone()
            .ok_or(PanelError::NoArtifact(kind.as_str()))?;

        let picked = select_artifacts(&latest.files);
        let file = match kind {
            ArtifactKind::Image => picked.image,
            ArtifactKind::Video => picked.video,
        }
        .ok_or(PanelError::NoArtifact(kind.as_str()))?;

        let bytes = self.backend.fetch_file(&latest.path, &file).await?;
        Ok((file, bytes))
    }
}
