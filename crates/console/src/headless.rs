use anyhow::Context;
use greenlight_client::WebhookClient;
use protocol::{Decision, PaRequest, Priority, SessionClock};

/// Submits one request and prints the decision to stdout.
///
/// A denied decision is still a successful run; only submissions that
/// produce no decision at all exit non-zero.
pub(crate) async fn run_once(
    client: &WebhookClient,
    endpoint: &str,
    patient_id: &str,
    priority: Priority,
    notes: &str,
) -> anyhow::Result<()> {
    let mut clock = SessionClock::new();
    let request = PaRequest::new(patient_id, priority, notes, clock.next());
    let request_id = request.request_id();

    let decision = client
        .submit(endpoint, &request)
        .await
        .with_context(|| format!("submission {request_id} failed"))?;
    println!("{}", render_decision(&request_id, &decision));
    Ok(())
}

fn render_decision(request_id: &str, decision: &Decision) -> String {
    format!(
        "decision: {} (confidence {}%)\nrequest id: {}\nresponse: {}",
        decision.outcome, decision.confidence, request_id, decision.raw_response
    )
}
