use chrono::{DateTime, Local};
use greenlight_client::{SubmitError, WebhookClient};
use protocol::{Decision, PaRequest};
use tokio::sync::mpsc;

/// A submission the UI asked for, ready to go out.
#[derive(Debug, Clone)]
pub(crate) struct SubmitCommand {
    pub(crate) endpoint: String,
    pub(crate) request: PaRequest,
}

#[derive(Debug, Clone)]
pub(crate) enum SubmissionOutcome {
    Decided(Decision),
    Failed(SubmitError),
}

/// One finished submission, decisioned or not, as the UI remembers it.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionRecord {
    pub(crate) request: PaRequest,
    pub(crate) finished_at: DateTime<Local>,
    pub(crate) outcome: SubmissionOutcome,
}

impl SubmissionRecord {
    pub(crate) fn request_id(&self) -> String {
        self.request.request_id()
    }

    pub(crate) fn status_label(&self) -> &'static str {
        match &self.outcome {
            SubmissionOutcome::Decided(decision) => decision.outcome.as_str(),
            SubmissionOutcome::Failed(_) => "FAILED",
        }
    }
}

pub(crate) enum UiEvent {
    SubmissionStarted { request_id: String },
    SubmissionFinished(SubmissionRecord),
}

/// Runs one submission in the background and reports through `ui_tx`.
pub(crate) fn spawn_submit(
    client: WebhookClient,
    command: SubmitCommand,
    ui_tx: mpsc::Sender<UiEvent>,
) {
    tokio::spawn(async move {
        let SubmitCommand { endpoint, request } = command;
        let _ = ui_tx
            .send(UiEvent::SubmissionStarted {
                request_id: request.request_id(),
            })
            .await;

        let outcome = match client.submit(&endpoint, &request).await {
            Ok(decision) => SubmissionOutcome::Decided(decision),
            Err(err) => SubmissionOutcome::Failed(err),
        };
        let record = SubmissionRecord {
            request,
            finished_at: Local::now(),
            outcome,
        };
        let _ = ui_tx.send(UiEvent::SubmissionFinished(record)).await;
    });
}
