//! Voice selection options.

/// Voice used when the TTS backend reports no voices at all.
pub const FALLBACK_VOICE: &str = "pl_PL-gosia-medium";

/// One entry of the voice selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    /// Identifier sent with run requests.
    pub id: String,
    /// Display text.
    pub label: String,
}

/// Turn the reported voice list into selection options.
///
/// An empty list yields exactly one fallback option so the selection is
/// never empty.
pub fn voice_options(voices: Vec<String>) -> Vec<VoiceOption> {
    if voices.is_empty() {
        return vec![VoiceOption {
            id: FALLBACK_VOICE.to_string(),
            label: format!("{FALLBACK_VOICE} (fallback)"),
        }];
    }

    voices
        .into_iter()
        .map(|id| VoiceOption {
            label: id.clone(),
            id,
        })
        .collect()
}
