//! Line-oriented command parsing for the terminal panel.

use std::path::PathBuf;

use brainrot_core::config::UrlField;
use brainrot_core::error::CoreError;
use brainrot_core::job::MAX_ENQUEUE_COUNT;
use brainrot_core::selections::{parse_speed, Step};

use crate::results::ArtifactKind;

pub const HELP: &str = "\
Commands:
  generate [n]                 queue n jobs (default: selected count)
  count <n>                    select how many jobs `generate` queues
  jobs                         show the job queue
  status                       refresh service status
  voices                       reload the voice list
  voice <id>                   select a voice
  speed <value>                set speech speed (invalid -> 1.0)
  step <story|tts|image> <on|off>
  config show                  show service URLs and run selections
  config <ollama|piper|sd> [url]  edit a service URL (no url clears it)
  config save                  save service URLs and refresh status
  results                      show the latest result
  fetch <image|video> <file>   download an artifact of the latest result
  legacy <count> [publish]     run a one-shot batch via /generate
  help                         show this help
  quit                         exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate(Option<u32>),
    SelectCount(u32),
    ShowJobs,
    RefreshStatus,
    ReloadVoices,
    SelectVoice(String),
    SetSpeed(f64),
    SetStep(Step, bool),
    ShowConfig,
    SetUrl(UrlField, String),
    SaveConfig,
    RefreshResults,
    Fetch { kind: ArtifactKind, dest: PathBuf },
    Legacy { count: u32, publish: bool },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

fn positive(raw: &str) -> Result<u32, ParseError> {
    match raw.parse::<u32>() {
        Ok(n) if n > MAX_ENQUEUE_COUNT => Err(ParseError(format!(
            "\"{raw}\" is more than {MAX_ENQUEUE_COUNT} jobs"
        ))),
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError(format!("\"{raw}\" is not a positive integer"))),
    }
}

fn toggle(raw: &str) -> Result<bool, ParseError> {
    match raw.to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(ParseError(format!("\"{raw}\" is not on/off"))),
    }
}

fn url_field(raw: &str) -> Result<UrlField, ParseError> {
    raw.parse().map_err(|e: CoreError| ParseError(e.to_string()))
}

fn usage(text: &str) -> ParseError {
    ParseError(format!("usage: {text}"))
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (head.to_lowercase().as_str(), args) {
        ("generate" | "gen", []) => Command::Generate(None),
        ("generate" | "gen", [n]) => Command::Generate(Some(positive(n)?)),
        ("generate" | "gen", _) => return Err(usage("generate [n]")),
        ("count", [n]) => Command::SelectCount(positive(n)?),
        ("count", _) => return Err(usage("count <n>")),
        ("jobs" | "queue", []) => Command::ShowJobs,
        ("status", []) => Command::RefreshStatus,
        ("voices", []) => Command::ReloadVoices,
        ("voice", [id]) => Command::SelectVoice(id.to_string()),
        ("voice", _) => return Err(usage("voice <id>")),
        ("speed", [raw]) => Command::SetSpeed(parse_speed(raw)),
        ("speed", _) => return Err(usage("speed <value>")),
        ("step", [step, state]) => Command::SetStep(
            step.parse::<Step>().map_err(|e| ParseError(e.to_string()))?,
            toggle(state)?,
        ),
        ("step", _) => return Err(usage("step <story|tts|image> <on|off>")),
        ("config", ["show"]) | ("config", []) => Command::ShowConfig,
        ("config", ["save"]) => Command::SaveConfig,
        ("config", [field]) => Command::SetUrl(url_field(field)?, String::new()),
        ("config", [field, url]) => Command::SetUrl(url_field(field)?, url.to_string()),
        ("config", _) => return Err(usage("config <show|save|ollama|piper|sd> [url]")),
        ("results", []) => Command::RefreshResults,
        ("fetch", [kind, dest]) => {
            let kind = match kind.to_lowercase().as_str() {
                "image" => ArtifactKind::Image,
                "video" => ArtifactKind::Video,
                _ => return Err(usage("fetch <image|video> <file>")),
            };
            Command::Fetch {
                kind,
                dest: PathBuf::from(dest),
            }
        }
        ("fetch", _) => return Err(usage("fetch <image|video> <file>")),
        ("legacy", [count]) => Command::Legacy {
            count: positive(count)?,
            publish: false,
        },
        ("legacy", [count, flag]) if flag.eq_ignore_ascii_case("publish") => Command::Legacy {
            count: positive(count)?,
            publish: true,
        },
        ("legacy", _) => return Err(usage("legacy <count> [publish]")),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        (other, _) => return Err(ParseError(format!("unknown command \"{other}\""))),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn generate_with_and_without_count() {
        assert_eq!(cmd("generate"), Command::Generate(None));
        assert_eq!(cmd("gen 5"), Command::Generate(Some(5)));
        assert!(parse("generate 0").is_err());
        assert!(parse("generate many").is_err());
    }

    #[test]
    fn count_selection() {
        assert_eq!(cmd("count 10"), Command::SelectCount(10));
        assert!(parse("count").is_err());
    }

    #[test]
    fn huge_counts_are_rejected_before_queueing() {
        assert!(parse("count 4000000000").is_err());
        assert!(parse("generate 1001").is_err());
        assert!(parse("legacy 5000").is_err());
        assert_eq!(cmd("generate 1000"), Command::Generate(Some(1000)));
    }

    #[test]
    fn config_commands() {
        assert_eq!(cmd("config"), Command::ShowConfig);
        assert_eq!(cmd("config show"), Command::ShowConfig);
        assert_eq!(cmd("config save"), Command::SaveConfig);
        assert_eq!(
            cmd("config ollama http://localhost:11434"),
            Command::SetUrl(UrlField::Ollama, "http://localhost:11434".to_string())
        );
        assert_eq!(
            cmd("config sd"),
            Command::SetUrl(UrlField::StableDiffusion, String::new())
        );
        assert!(parse("config coqui http://x").is_err());
    }

    #[test]
    fn selections() {
        assert_eq!(cmd("voice piper:en_US"), Command::SelectVoice("piper:en_US".to_string()));
        assert_eq!(cmd("speed 1.5"), Command::SetSpeed(1.5));
        assert_eq!(cmd("speed abc"), Command::SetSpeed(1.0));
        assert_eq!(cmd("step tts off"), Command::SetStep(Step::Tts, false));
        assert_eq!(cmd("step IMAGE on"), Command::SetStep(Step::Image, true));
        assert!(parse("step video on").is_err());
        assert!(parse("step tts maybe").is_err());
    }

    #[test]
    fn legacy_run() {
        assert_eq!(
            cmd("legacy 3"),
            Command::Legacy {
                count: 3,
                publish: false
            }
        );
        assert_eq!(
            cmd("legacy 2 publish"),
            Command::Legacy {
                count: 2,
                publish: true
            }
        );
        assert!(parse("legacy 2 now").is_err());
    }

    #[test]
    fn fetch_artifact() {
        assert_eq!(
            cmd("fetch video short.mp4"),
            Command::Fetch {
                kind: ArtifactKind::Video,
                dest: PathBuf::from("short.mp4")
            }
        );
        assert!(parse("fetch audio a.wav").is_err());
    }

    #[test]
    fn misc_commands() {
        assert_eq!(cmd("jobs"), Command::ShowJobs);
        assert_eq!(cmd("status"), Command::RefreshStatus);
        assert_eq!(cmd("voices"), Command::ReloadVoices);
        assert_eq!(cmd("results"), Command::RefreshResults);
        assert_eq!(cmd("help"), Command::Help);
        assert_eq!(cmd("QUIT"), Command::Quit);
        assert!(parse("dance").is_err());
    }
}
