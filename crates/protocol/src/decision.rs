use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a decisioned prior-authorization request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Denied,
    NeedsReview,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Approved => "APPROVED",
            Outcome::Denied => "DENIED",
            Outcome::NeedsReview => "NEEDS REVIEW",
        }
    }

    /// Case-insensitive parse of the outcome strings webhooks send back.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Outcome::Approved),
            "denied" => Some(Outcome::Denied),
            "needs_review" | "needs-review" | "review" => Some(Outcome::NeedsReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the webhook decided, plus the raw body it said it with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub outcome: Outcome,
    /// Percent, 0 through 100.
    pub confidence: u8,
    pub raw_response: Value,
}

// Webhooks that acknowledge without decisioning (bodies like
// `{"status": "ok"}`) are treated as an approval at high confidence.
const FALLBACK_OUTCOME: Outcome = Outcome::Approved;
const FALLBACK_CONFIDENCE: u8 = 95;

impl Decision {
    /// Reads a decision out of a 200 JSON body.
    ///
    /// The outcome is taken from an `outcome` key, or `decision` when that
    /// is absent; confidence from a numeric `confidence` key, clamped to
    /// 0..=100. Bodies carrying neither get the acknowledgement fallback.
    pub fn from_value(raw_response: Value) -> Self {
        let outcome = raw_response
            .get("outcome")
            .or_else(|| raw_response.get("decision"))
            .and_then(Value::as_str)
            .and_then(Outcome::parse)
            .unwrap_or(FALLBACK_OUTCOME);

        let confidence = raw_response
            .get("confidence")
            .and_then(parse_confidence)
            .unwrap_or(FALLBACK_CONFIDENCE);

        Self {
            outcome,
            confidence,
            raw_response,
        }
    }
}

fn parse_confidence(value: &Value) -> Option<u8> {
    let number = value.as_f64()?;
    if !number.is_finite() {
        return None;
    }
    Some(number.clamp(0.0, 100.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn acknowledgement_body_falls_back_to_approved() {
        let decision = Decision::from_value(json!({"status": "ok"}));
        assert_eq!(decision.outcome, Outcome::Approved);
        assert_eq!(decision.confidence, 95);
        assert_eq!(decision.raw_response, json!({"status": "ok"}));
    }

    #[test]
    fn explicit_outcome_and_confidence_are_honored() {
        let decision = Decision::from_value(json!({"outcome": "DENIED", "confidence": 61}));
        assert_eq!(decision.outcome, Outcome::Denied);
        assert_eq!(decision.confidence, 61);
    }

    #[test]
    fn decision_key_is_accepted_when_outcome_is_absent() {
        let decision = Decision::from_value(json!({"decision": "approved", "confidence": 80}));
        assert_eq!(decision.outcome, Outcome::Approved);
        assert_eq!(decision.confidence, 80);
    }

    #[test]
    fn outcome_key_wins_over_decision_key() {
        let decision = Decision::from_value(json!({"outcome": "denied", "decision": "approved"}));
        assert_eq!(decision.outcome, Outcome::Denied);
    }

    #[test]
    fn review_spellings_are_recognized() {
        for raw in ["needs_review", "NEEDS-REVIEW", "Review"] {
            let decision = Decision::from_value(json!({"outcome": raw}));
            assert_eq!(decision.outcome, Outcome::NeedsReview, "raw: {raw}");
        }
    }

    #[test]
    fn unknown_outcome_string_falls_back() {
        let decision = Decision::from_value(json!({"outcome": "escalated"}));
        assert_eq!(decision.outcome, Outcome::Approved);
    }

    #[test]
    fn confidence_is_clamped_and_rounded() {
        let decision = Decision::from_value(json!({"outcome": "approved", "confidence": 180}));
        assert_eq!(decision.confidence, 100);

        let decision = Decision::from_value(json!({"outcome": "approved", "confidence": -3}));
        assert_eq!(decision.confidence, 0);

        let decision = Decision::from_value(json!({"outcome": "approved", "confidence": 72.6}));
        assert_eq!(decision.confidence, 73);
    }

    #[test]
    fn non_numeric_confidence_falls_back() {
        let decision = Decision::from_value(json!({"outcome": "denied", "confidence": "high"}));
        assert_eq!(decision.outcome, Outcome::Denied);
        assert_eq!(decision.confidence, 95);
    }

    #[test]
    fn non_object_bodies_get_the_fallback() {
        for body in [json!([1, 2, 3]), json!("accepted"), json!(null)] {
            let decision = Decision::from_value(body.clone());
            assert_eq!(decision.outcome, Outcome::Approved);
            assert_eq!(decision.confidence, 95);
            assert_eq!(decision.raw_response, body);
        }
    }
}
