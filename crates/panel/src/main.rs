//! `brainrot-panel` -- terminal control panel for the yt-brainrot pipeline.
//!
//! Shows service availability, queues pipeline runs one at a time, and
//! displays the newest result. Commands are read line by line from stdin
//! (type `help`); panel output goes to stdout and logs to stderr.
//!
//! # Environment variables
//!
//! | Variable               | Default                               | Description                 |
//! |------------------------|---------------------------------------|-----------------------------|
//! | `PIPELINE_API_URL`     | `http://127.0.0.1:5000`               | Pipeline service base URL   |
//! | `STATUS_INTERVAL_SECS` | `15`                                  | Seconds between polls       |
//! | `PANEL_STORE_PATH`     | `<config dir>/yt-brainrot/panel.json` | Local settings store        |
//! | `REQUEST_TIMEOUT_SECS` | --                                    | Per-request timeout         |
//! | `LOG_FORMAT`           | --                                    | `json` for JSON log lines   |

use std::sync::Arc;

use brainrot_client::api::http_client;
use brainrot_client::PipelineApi;
use brainrot_panel::console::{self, HELP};
use brainrot_panel::render;
use brainrot_panel::settings::PanelSettings;
use brainrot_panel::store::ConfigStore;
use brainrot_panel::{Flow, Panel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brainrot_panel=info,brainrot_client=info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let settings = PanelSettings::from_env();

    tracing::info!(
        api_url = %settings.api_url,
        status_interval_secs = settings.status_interval.as_secs(),
        store_path = %settings.store_path.display(),
        "Starting brainrot-panel",
    );

    let client = http_client(settings.request_timeout).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });
    let backend = Arc::new(PipelineApi::with_client(client, settings.api_url.clone()));
    let store = ConfigStore::open(&settings.store_path);

    let panel = Panel::new(backend, store, settings.status_interval);
    let renderer = tokio::spawn(render::run(
        panel.bus().subscribe(),
        std::io::stdout(),
        panel.cancel_token(),
    ));

    let poller = panel.start().await;
    panel.bus().notice(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Reading input failed");
                    break;
                }
            },
        };

        match console::parse(&line) {
            Ok(Some(command)) => {
                if panel.handle(command).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => panel.bus().notice(format!("{e}\n\n{HELP}")),
        }
    }

    tracing::info!("Shutting down");
    panel.shutdown();
    let _ = poller.await;
    let _ = renderer.await;
}
