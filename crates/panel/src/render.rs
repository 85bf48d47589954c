//! Terminal rendering layer.
//!
//! Turns [`PanelEvent`]s into text. Formatting is pure so it can be
//! tested without a terminal; [`run`] drives it from a bus subscription.

use std::io::Write;

use brainrot_core::config::{ServiceUrls, UrlField};
use brainrot_core::job::Job;
use brainrot_core::outputs::ResultView;
use brainrot_core::selections::{RunSelections, Step};
use brainrot_core::service::{ServiceBoard, ServiceKind, ServiceState};
use brainrot_core::voices::VoiceOption;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::events::PanelEvent;

pub fn render_queue(pending: &[Job], active: Option<&Job>) -> String {
    if pending.is_empty() && active.is_none() {
        return "Queue: empty".to_string();
    }

    let mut out = String::from("Queue:");
    if let Some(job) = active {
        out.push_str(&format!("\n  > {} {}", job.id, job.status));
    }
    for (idx, job) in pending.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", idx + 1, job.status));
    }
    out
}

pub fn render_services(board: &ServiceBoard) -> String {
    let badges: Vec<String> = ServiceKind::ALL
        .iter()
        .map(|&kind| {
            let badge = board.badge(kind);
            let unrecognised = badge.text != ServiceState::Unknown.as_str();
            if badge.state == ServiceState::Unknown && unrecognised {
                format!("{kind}: {} (unknown)", badge.text)
            } else {
                format!("{kind}: {}", badge.text)
            }
        })
        .collect();
    format!("Services: {}", badges.join(" | "))
}

pub fn render_voices(options: &[VoiceOption]) -> String {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    format!("Voices: {}", labels.join(", "))
}

pub fn render_result(view: &ResultView) -> String {
    match view {
        ResultView::NoResults => "No results".to_string(),
        ResultView::Latest {
            folder,
            image_url,
            video_url,
        } => {
            let mut lines = Vec::new();
            if let Some(url) = image_url {
                lines.push(format!("Image: {url}"));
            }
            if let Some(url) = video_url {
                lines.push(format!("Download video: {url}"));
            }
            lines.push(format!("Folder: {folder}"));
            lines.join("\n")
        }
    }
}

/// Service URLs and run selections as currently edited.
pub fn render_form(urls: &ServiceUrls, selections: &RunSelections) -> String {
    let show = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };

    let mut lines: Vec<String> = UrlField::ALL
        .iter()
        .map(|&field| format!("{}: {}", field.label(), show(urls.get(field))))
        .collect();

    let steps: Vec<String> = Step::ALL
        .iter()
        .map(|&step| {
            let state = if selections.step(step) { "on" } else { "off" };
            format!("{step} {state}")
        })
        .collect();
    lines.push(format!("Steps: {}", steps.join(", ")));
    lines.push(format!(
        "Voice: {} | Speed: {}",
        show(&selections.voice),
        selections.speed
    ));
    lines.join("\n")
}

/// Text for one event.
pub fn render_event(event: &PanelEvent) -> String {
    match event {
        PanelEvent::QueueChanged { pending, active } => render_queue(pending, active.as_ref()),
        PanelEvent::JobStatusChanged { id, status } => format!("Job {id}: {status}"),
        PanelEvent::ServicesUpdated { board } => render_services(board),
        PanelEvent::VoicesLoaded { options } => render_voices(options),
        PanelEvent::ResultUpdated { view } => format!("Last result:\n{}", render_result(view)),
        PanelEvent::ConfigSaved => "Current settings saved to the local store.".to_string(),
        PanelEvent::LegacyLog { text } => format!("Legacy log:\n{text}"),
        PanelEvent::Notice { message } => message.clone(),
    }
}

/// Write every received event to `out` until cancelled or the bus closes.
pub async fn run<W: Write + Send>(
    mut rx: broadcast::Receiver<PanelEvent>,
    mut out: W,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer lagged behind, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        };

        if let Err(e) = writeln!(out, "{}", render_event(&event)).and_then(|_| out.flush()) {
            tracing::error!(error = %e, "Failed to write panel output");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainrot_core::job::JobStatus;
    use brainrot_core::service::ServiceStatus;

    fn job(id: &str, status: JobStatus) -> Job {
        Job {
            id: id.to_string(),
            status,
        }
    }

    #[test]
    fn queue_lists_pending_in_order() {
        let pending = [job("1-1", JobStatus::Queued), job("1-2", JobStatus::Queued)];
        let active = job("1-0", JobStatus::Running);
        assert_eq!(
            render_queue(&pending, Some(&active)),
            "Queue:\n  > 1-0 running\n  1. queued\n  2. queued"
        );
        assert_eq!(render_queue(&[], None), "Queue: empty");
    }

    #[test]
    fn services_show_raw_text() {
        let mut board = ServiceBoard::default();
        board.apply(&[
            ServiceStatus {
                name: "Ollama".to_string(),
                status: "online".to_string(),
                url: None,
            },
            ServiceStatus {
                name: "piper".to_string(),
                status: "starting".to_string(),
                url: None,
            },
        ]);
        assert_eq!(
            render_services(&board),
            "Services: Ollama: online | Piper: starting (unknown) | Stable Diffusion: unknown"
        );
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let (_tx, rx) = broadcast::channel::<PanelEvent>(8);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut buffer: Vec<u8> = Vec::new();
        run(rx, &mut buffer, cancel).await;
        assert!(buffer.is_empty());
    }

    #[test]
    fn result_lines() {
        assert_eq!(render_result(&ResultView::NoResults), "No results");
        let view = ResultView::Latest {
            folder: "outputs/functions/1".to_string(),
            image_url: Some("http://h/img".to_string()),
            video_url: None,
        };
        assert_eq!(render_result(&view), "Image: http://h/img\nFolder: outputs/functions/1");
    }

    #[test]
    fn form_shows_dash_for_empty() {
        let urls = ServiceUrls {
            sd_url: "http://sd".to_string(),
            ..Default::default()
        };
        let mut selections = RunSelections::default();
        selections.set_step(Step::Image, false);
        selections.speed = 1.5;

        assert_eq!(
            render_form(&urls, &selections),
            "Ollama URL: -\nPiper URL: -\nStable Diffusion URL: http://sd\n\
             Steps: story on, tts on, image off\nVoice: - | Speed: 1.5"
        );
    }

    #[tokio::test]
    async fn run_writes_events_until_the_bus_closes() {
        let (tx, rx) = broadcast::channel(8);
        let cancel = CancellationToken::new();

        tx.send(PanelEvent::JobStatusChanged {
            id: "7-0".to_string(),
            status: JobStatus::Done,
        })
        .unwrap();
        drop(tx);

        // The closed channel ends the loop after the buffered event.
        let mut buffer: Vec<u8> = Vec::new();
        run(rx, &mut buffer, cancel).await;
        assert_eq!(String::from_utf8(buffer).unwrap(), "Job 7-0: done\n");
    }
}
