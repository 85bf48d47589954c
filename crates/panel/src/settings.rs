use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the pipeline service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Default interval between status polls.
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 15;

/// Panel runtime settings loaded from environment variables.
///
/// All fields have defaults suitable for a pipeline service running on
/// the same machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    /// Base URL of the pipeline service (default: `http://127.0.0.1:5000`).
    pub api_url: String,
    /// Interval between status polls (default: 15 s).
    pub status_interval: Duration,
    /// File backing the local key-value store.
    pub store_path: PathBuf,
    /// Per-request timeout; `None` means remote calls may wait forever.
    pub request_timeout: Option<Duration>,
}

impl PanelSettings {
    /// Load settings from the process environment.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `PIPELINE_API_URL`     | `http://127.0.0.1:5000`                   |
    /// | `STATUS_INTERVAL_SECS` | `15`                                      |
    /// | `PANEL_STORE_PATH`     | `<config dir>/yt-brainrot/panel.json`     |
    /// | `REQUEST_TIMEOUT_SECS` | unset (no timeout)                        |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Values that do not parse are replaced by their default and logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("PIPELINE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let status_interval_secs = match lookup("STATUS_INTERVAL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "STATUS_INTERVAL_SECS must be a positive integer, using default"
                    );
                    DEFAULT_STATUS_INTERVAL_SECS
                }
            },
            None => DEFAULT_STATUS_INTERVAL_SECS,
        };

        let store_path = lookup("PANEL_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS").and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "REQUEST_TIMEOUT_SECS must be a positive integer, ignoring"
                    );
                    None
                }
            }
        });

        Self {
            api_url,
            status_interval: Duration::from_secs(status_interval_secs),
            store_path,
            request_timeout,
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("yt-brainrot").join("panel.json"))
        .unwrap_or_else(|| PathBuf::from("panel.json"))
}
