mod cli;
mod config;
mod headless;
mod logging;
mod submit;
mod ui;

use crate::cli::Args;
use crate::config::Config;
use crate::submit::{spawn_submit, SubmitCommand, UiEvent};
use crate::ui::{draw_ui, handle_key_event, restore_terminal, setup_terminal, AppState};
use clap::Parser;
use crossterm::event::{self, Event};
use greenlight_client::WebhookClient;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _file_guard = logging::init_tracing(&args.log_dir, args.log_to_stderr)?;

    let config = Config::load_or_default(args.config.as_deref())?;
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.webhook.url.clone());
    let client = WebhookClient::with_timeout(Duration::from_secs(config.limits.timeout_secs));

    tracing::info!(
        event = "console.started",
        endpoint = %endpoint,
        timeout_secs = config.limits.timeout_secs,
        headless = args.patient.is_some(),
    );

    if let Some(patient_id) = args.patient.as_deref() {
        return headless::run_once(&client, &endpoint, patient_id, args.priority.into(), &args.notes)
            .await;
    }

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(128);
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<SubmitCommand>(16);

    let mut terminal = setup_terminal()?;
    let mut app = AppState::new(config.roster(), endpoint);

    let tick_rate = Duration::from_millis(100);
    loop {
        while let Ok(event) = ui_rx.try_recv() {
            app.handle_event(event);
        }
        while let Ok(command) = cmd_rx.try_recv() {
            spawn_submit(client.clone(), command, ui_tx.clone());
        }
        app.tick();

        terminal.draw(|frame| draw_ui(frame, &mut app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(key, &mut app, &cmd_tx) {
                    break;
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
