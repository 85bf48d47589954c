//! External service availability as reported by the pipeline status
//! endpoint, and the fixed board of services the panel displays.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Availability class used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Online,
    Offline,
    Unknown,
}

impl ServiceState {
    /// Classify a reported status string. Anything other than `online` or
    /// `offline` is `Unknown`.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "online" => Self::Online,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

/// One entry of the status endpoint's `services` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Services the panel has a badge for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Ollama,
    Piper,
    StableDiffusion,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [Self::Ollama, Self::Piper, Self::StableDiffusion];

    /// Map a reported service name onto a badge (case-insensitive).
    ///
    /// The status endpoint names Stable Diffusion after its A1111 web UI.
    pub fn from_reported_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "piper" => Some(Self::Piper),
            "a1111" => Some(Self::StableDiffusion),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ollama => "Ollama",
            Self::Piper => "Piper",
            Self::StableDiffusion => "Stable Diffusion",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a badge shows: the raw reported text and its display class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub state: ServiceState,
}

impl Default for Badge {
    fn default() -> Self {
        Self {
            text: ServiceState::Unknown.as_str().to_string(),
            state: ServiceState::Unknown,
        }
    }
}

/// The fixed set of service badges.
///
/// Every poll overwrites the badges it mentions; badges it does not
/// mention keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBoard {
    ollama: Badge,
    piper: Badge,
    stable_diffusion: Badge,
}

impl ServiceBoard {
    pub fn badge(&self, kind: ServiceKind) -> &Badge {
        match kind {
            ServiceKind::Ollama => &self.ollama,
            ServiceKind::Piper => &self.piper,
            ServiceKind::StableDiffusion => &self.stable_diffusion,
        }
    }

    fn badge_mut(&mut self, kind: ServiceKind) -> &mut Badge {
        match kind {
            ServiceKind::Ollama => &mut self.ollama,
            ServiceKind::Piper => &mut self.piper,
            ServiceKind::StableDiffusion => &mut self.stable_diffusion,
        }
    }

    /// Apply one poll result. Unrecognized service names are skipped.
    ///
    /// Returns the badges that were updated, in report order.
    pub fn apply(&mut self, services: &[ServiceStatus]) -> Vec<ServiceKind> {
        let mut updated = Vec::new();
        for service in services {
            let Some(kind) = ServiceKind::from_reported_name(&service.name) else {
                continue;
            };
            *self.badge_mut(kind) = Badge {
                text: service.status.clone(),
                state: ServiceState::classify(&service.status),
            };
            updated.push(kind);
        }
        updated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
