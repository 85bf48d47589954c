//! Pure types and rules for the yt-brainrot control panel.
//!
//! Nothing in this crate performs I/O. The HTTP client and the panel
//! runtime build on these types so the queue, status and artifact rules
//! can be tested without a network.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod job;
pub mod outputs;
pub mod selections;
pub mod service;
pub mod types;
pub mod voices;
