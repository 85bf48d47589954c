//! Typed HTTP client for the yt-brainrot pipeline service.
//!
//! Provides the request/response bodies of every endpoint, the
//! [`PipelineBackend`](backend::PipelineBackend) seam the panel is written
//! against, and its `reqwest` implementation.

pub mod api;
pub mod backend;
pub mod messages;

pub use api::{ApiError, PipelineApi};
pub use backend::PipelineBackend;
