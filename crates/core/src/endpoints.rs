//! Well-known paths of the pipeline service.
//!
//! These are owned by the remote service; the panel only ever appends
//! them to the configured base URL.

/// Per-service availability (`GET`).
pub const PIPELINE_STATUS: &str = "/functions/v1/pipeline-status";

/// Available TTS voices (`GET`).
pub const TTS_VOICES: &str = "/functions/v1/tts-voices";

/// Run the story -> speech -> image -> video pipeline once (`POST`).
pub const RUN_PIPELINE: &str = "/functions/v1/run-pipeline";

/// Recent output folders, newest first (`GET`).
pub const LIST_OUTPUTS: &str = "/functions/v1/list-outputs";

/// Raw bytes of one output file, selected by the `path` query param (`GET`).
pub const GET_FILE: &str = "/functions/v1/get-file";

/// One-shot batch generation outside the job queue (`POST`).
pub const LEGACY_GENERATE: &str = "/generate";
