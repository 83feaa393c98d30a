use std::time::Duration;

use protocol::{Decision, PaRequest, ValidationError};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Default end-to-end timeout for one submission.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a submission did not produce a decision.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// Rejected client-side; nothing went on the wire.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The webhook answered with a non-200 status.
    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The webhook could not be reached, timed out, or answered with
    /// something that is not JSON.
    #[error("{reason} (check that the webhook is running and the URL is correct)")]
    Connectivity { reason: String },
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Invalid(err.to_string())
    }
}

/// HTTP client for the decisioning webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            timeout,
        }
    }

    /// POSTs `request` to `endpoint` and reads back the webhook's decision.
    ///
    /// The request is validated first and never sent when validation fails.
    /// Only a 200 JSON body counts as a decision; every other status
    /// surfaces as [`SubmitError::Status`], everything that prevents a
    /// parseable answer as [`SubmitError::Connectivity`].
    pub async fn submit(
        &self,
        endpoint: &str,
        request: &PaRequest,
    ) -> Result<Decision, SubmitError> {
        request.validate()?;

        let request_id = request.request_id();
        tracing::info!(
            event = "submit.started",
            request_id = %request_id,
            patient_id = %request.patient_id,
            priority = %request.priority,
            endpoint = %endpoint,
        );

        match self.send(endpoint, request).await {
            Ok(decision) => {
                tracing::info!(
                    event = "submit.decided",
                    request_id = %request_id,
                    outcome = %decision.outcome,
                    confidence = decision.confidence,
                );
                Ok(decision)
            }
            Err(err) => {
                tracing::warn!(event = "submit.failed", request_id = %request_id, error = %err);
                Err(err)
            }
        }
    }

    async fn send(&self, endpoint: &str, request: &PaRequest) -> Result<Decision, SubmitError> {
        let response = self
            .http
            .post(endpoint)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| SubmitError::Connectivity {
            reason: format!("failed to read webhook response: {err}"),
        })?;

        if status != StatusCode::OK {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|err| SubmitError::Connectivity {
                reason: format!("invalid JSON in webhook response: {err}"),
            })?;
        Ok(Decision::from_value(value))
    }

    fn classify(&self, err: reqwest::Error) -> SubmitError {
        if err.is_builder() {
            return SubmitError::Invalid(format!("invalid endpoint: {err}"));
        }
        if err.is_timeout() {
            return SubmitError::Connectivity {
                reason: format!(
                    "request timed out after {}",
                    humantime::format_duration(self.timeout)
                ),
            };
        }
        SubmitError::Connectivity {
            reason: err.to_string(),
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use protocol::{Outcome, Priority};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn stamp() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 8, 25, 14, 30, 12)
            .single()
            .expect("unambiguous local time")
    }

    fn request() -> PaRequest {
        PaRequest::new("P-1002345", Priority::Urgent, "prior chemo documented", stamp())
    }

    /// Serves exactly one HTTP exchange and hands back the captured request.
    async fn oneshot_webhook(
        status: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let status = status.to_string();
        let body = body.to_string();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let captured = read_http_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            socket.shutdown().await.ok();
            captured
        });
        (format!("http://{addr}/webhook/pa-submit"), handle)
    }

    async fn read_http_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_is_complete(&buf) {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        text.len() >= header_end + 4 + content_length
    }

    fn captured_body(captured: &str) -> Value {
        let (_, body) = captured.split_once("\r\n\r\n").expect("request body");
        serde_json::from_str(body).expect("request body is JSON")
    }

    #[tokio::test]
    async fn submitted_body_matches_the_wire_contract() {
        let (endpoint, handle) = oneshot_webhook("200 OK", r#"{"status": "ok"}"#).await;

        let decision = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect("decision");
        assert_eq!(decision.outcome, Outcome::Approved);
        assert_eq!(decision.confidence, 95);

        let captured = handle.await.expect("server task");
        let first_line = captured.lines().next().expect("request line");
        assert!(first_line.starts_with("POST /webhook/pa-submit"), "{first_line}");
        assert!(captured.to_ascii_lowercase().contains("content-type: application/json"));

        let body = captured_body(&captured);
        let object = body.as_object().expect("object body");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["notes", "patient_id", "priority", "timestamp"]);
        assert_eq!(object["patient_id"], "P-1002345");
        assert_eq!(object["priority"], "Urgent");
        assert_eq!(object["notes"], "prior chemo documented");
        assert!(object["timestamp"]
            .as_str()
            .expect("timestamp string")
            .starts_with("2026-08-25T14:30:12"));
    }

    #[tokio::test]
    async fn acknowledgement_only_webhook_reads_as_approved() {
        let (endpoint, handle) = oneshot_webhook("200 OK", r#"{"message": "received"}"#).await;

        let decision = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect("decision");
        assert_eq!(decision.outcome, Outcome::Approved);
        assert_eq!(decision.confidence, 95);
        handle.await.expect("server task");
    }

    #[tokio::test]
    async fn explicit_decision_fields_are_honored() {
        let (endpoint, handle) =
            oneshot_webhook("200 OK", r#"{"outcome": "DENIED", "confidence": 61}"#).await;

        let decision = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect("decision");
        assert_eq!(decision.outcome, Outcome::Denied);
        assert_eq!(decision.confidence, 61);
        handle.await.expect("server task");
    }

    #[tokio::test]
    async fn error_status_carries_the_body() {
        let (endpoint, handle) = oneshot_webhook("500 Internal Server Error", "boom").await;

        let err = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect_err("status error");
        match err {
            SubmitError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        handle.await.expect("server task");
    }

    #[tokio::test]
    async fn accepted_status_is_not_a_decision() {
        let (endpoint, handle) = oneshot_webhook("202 Accepted", r#"{"status": "queued"}"#).await;

        let err = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect_err("status error");
        match err {
            SubmitError::Status { status, body } => {
                assert_eq!(status, 202);
                assert_eq!(body, r#"{"status": "queued"}"#);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        handle.await.expect("server task");
    }

    #[tokio::test]
    async fn non_json_success_is_a_connectivity_failure() {
        let (endpoint, handle) = oneshot_webhook("200 OK", "OK").await;

        let err = WebhookClient::new()
            .submit(&endpoint, &request())
            .await
            .expect_err("connectivity error");
        match err {
            SubmitError::Connectivity { reason } => {
                assert!(reason.contains("invalid JSON"), "{reason}");
            }
            other => panic!("expected connectivity error, got {other:?}"),
        }
        handle.await.expect("server task");
    }

    #[tokio::test]
    async fn connection_refused_is_a_connectivity_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = WebhookClient::new()
            .submit(&format!("http://{addr}/webhook/pa-submit"), &request())
            .await
            .expect_err("connectivity error");
        assert!(matches!(err, SubmitError::Connectivity { .. }), "{err:?}");
        assert!(err.to_string().contains("check that the webhook is running"));
    }

    #[tokio::test]
    async fn stalled_webhook_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = WebhookClient::with_timeout(Duration::from_millis(250))
            .submit(&format!("http://{addr}/webhook/pa-submit"), &request())
            .await
            .expect_err("timeout");
        match err {
            SubmitError::Connectivity { reason } => {
                assert!(reason.contains("timed out after 250ms"), "{reason}");
            }
            other => panic!("expected connectivity error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_patient_id_never_reaches_the_wire() {
        // Nothing is listening here; a wire attempt would come back as a
        // connectivity failure instead of a validation error.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let empty = PaRequest::new("", Priority::Standard, "", stamp());
        let err = WebhookClient::new()
            .submit(&format!("http://{addr}/webhook/pa-submit"), &empty)
            .await
            .expect_err("validation error");
        match err {
            SubmitError::Invalid(reason) => assert!(reason.contains("patient_id"), "{reason}"),
            other => panic!("expected invalid error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_endpoint_is_invalid() {
        let err = WebhookClient::new()
            .submit("not a url", &request())
            .await
            .expect_err("builder error");
        assert!(matches!(err, SubmitError::Invalid(_)), "{err:?}");
    }
}
