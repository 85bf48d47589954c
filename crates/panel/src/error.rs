use brainrot_client::ApiError;
use brainrot_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("A legacy generation is already running")]
    LegacyBusy,

    #[error("No {0} available in the latest result")]
    NoArtifact(&'static str),
}
