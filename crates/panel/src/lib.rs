//! `brainrot-panel` library crate.
//!
//! Terminal control panel for the yt-brainrot pipeline service. The
//! binary entrypoint lives in `main.rs`; the modules are exported for
//! integration testing.

pub mod console;
pub mod error;
pub mod events;
pub mod form;
pub mod legacy;
pub mod panel;
pub mod poller;
pub mod queue;
pub mod render;
pub mod results;
pub mod settings;
pub mod store;
pub mod voices;

pub use panel::{Flow, Panel};
