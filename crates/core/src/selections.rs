//! Form state that each pipeline run request is built from.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Speech speed used when none (or an unusable one) is given.
pub const DEFAULT_SPEED: f64 = 1.0;

/// A toggleable pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Story,
    Tts,
    Image,
}

impl Step {
    pub const ALL: [Step; 3] = [Self::Story, Self::Tts, Self::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Tts => "tts",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "story" => Ok(Self::Story),
            "tts" => Ok(Self::Tts),
            "image" => Ok(Self::Image),
            other => Err(CoreError::Validation(format!(
                "Unknown step \"{other}\" (expected story, tts or image)"
            ))),
        }
    }
}

/// Selections other than service URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSelections {
    pub generate_story: bool,
    pub generate_tts: bool,
    pub generate_image: bool,
    /// Selected voice id, empty when nothing is selected.
    pub voice: String,
    pub speed: f64,
}

impl Default for RunSelections {
    fn default() -> Self {
        Self {
            generate_story: true,
            generate_tts: true,
            generate_image: true,
            voice: String::new(),
            speed: DEFAULT_SPEED,
        }
    }
}

impl RunSelections {
    pub fn set_step(&mut self, step: Step, enabled: bool) {
        match step {
            Step::Story => self.generate_story = enabled,
            Step::Tts => self.generate_tts = enabled,
            Step::Image => self.generate_image = enabled,
        }
    }

    pub fn step(&self, step: Step) -> bool {
        match step {
            Step::Story => self.generate_story,
            Step::Tts => self.generate_tts,
            Step::Image => self.generate_image,
        }
    }
}

/// Parse a speed entered by the user.
///
/// The whole trimmed input must be a number, so `1.5x` is rejected.
/// Unparseable, zero or non-finite input yields [`DEFAULT_SPEED`].
pub fn parse_speed(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => DEFAULT_SPEED,
    }
}
