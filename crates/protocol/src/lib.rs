use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod decision;
pub mod roster;

pub use clock::SessionClock;
pub use decision::{Decision, Outcome};
pub use roster::{default_roster, Patient};

/// Urgency of a prior-authorization request.
///
/// Serialized with the exact strings the decisioning webhook expects:
/// `"Standard"`, `"Urgent"`, `"Emergency"`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[default]
    Standard,
    Urgent,
    Emergency,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Standard => "Standard",
            Priority::Urgent => "Urgent",
            Priority::Emergency => "Emergency",
        }
    }

    /// Next priority in the Standard -> Urgent -> Emergency loop.
    pub fn cycle(self) -> Self {
        match self {
            Priority::Standard => Priority::Urgent,
            Priority::Urgent => Priority::Emergency,
            Priority::Emergency => Priority::Standard,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound prior-authorization submission.
///
/// The wire body is exactly `{patient_id, priority, notes, timestamp}`;
/// `submitted_at` travels under the `timestamp` key as ISO-8601.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaRequest {
    pub patient_id: String,
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Local>,
}

impl PaRequest {
    pub fn new(
        patient_id: impl Into<String>,
        priority: Priority,
        notes: impl Into<String>,
        submitted_at: DateTime<Local>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            priority,
            notes: notes.into(),
            submitted_at,
        }
    }

    /// Display identifier, `YYYYMMDDHHMMSS_<patient_id>` in local time.
    pub fn request_id(&self) -> String {
        format!(
            "{}_{}",
            self.submitted_at.format("%Y%m%d%H%M%S"),
            self.patient_id
        )
    }

    /// Client-side validation; nothing may go on the wire when this fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id.trim().is_empty() {
            return Err(ValidationError::EmptyPatientId);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("patient_id cannot be empty")]
    EmptyPatientId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn pa_request_roundtrip() {
        let request = PaRequest::new(
            "P-1002345",
            Priority::Urgent,
            "prior chemo documented",
            stamp(2026, 8, 25, 14, 30, 12),
        );

        let json = serde_json::to_string(&request).expect("serialize");
        let decoded: PaRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(request, decoded);
    }

    #[test]
    fn wire_body_has_exact_fields() {
        let request = PaRequest::new("1001", Priority::Standard, "", stamp(2026, 8, 25, 9, 0, 0));
        let value = serde_json::to_value(&request).expect("serialize");
        let body = value.as_object().expect("object body");

        let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["notes", "patient_id", "priority", "timestamp"]);
        assert_eq!(body["priority"], "Standard");
        assert_eq!(body["notes"], "");
        assert!(body["timestamp"]
            .as_str()
            .expect("timestamp string")
            .starts_with("2026-08-25T09:00:00"));
    }

    #[test]
    fn request_id_is_timestamp_digits_and_patient() {
        let request = PaRequest::new(
            "1001",
            Priority::Urgent,
            "",
            stamp(2026, 8, 25, 14, 30, 12),
        );
        assert_eq!(request.request_id(), "20260825143012_1001");

        let pattern = regex::Regex::new(r"^\d{14}_1001$").expect("pattern");
        assert!(pattern.is_match(&request.request_id()));
    }

    #[test]
    fn validate_rejects_empty_patient() {
        let request = PaRequest::new("", Priority::Standard, "", stamp(2026, 1, 1, 0, 0, 0));
        assert_eq!(request.validate(), Err(ValidationError::EmptyPatientId));

        let request = PaRequest::new("   ", Priority::Standard, "", stamp(2026, 1, 1, 0, 0, 0));
        assert_eq!(request.validate(), Err(ValidationError::EmptyPatientId));
    }

    #[test]
    fn validate_accepts_roster_patient() {
        let request = PaRequest::new("P-1003456", Priority::Emergency, "", Local::now());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn priority_cycles_through_all_levels() {
        assert_eq!(Priority::default(), Priority::Standard);
        assert_eq!(Priority::Standard.cycle(), Priority::Urgent);
        assert_eq!(Priority::Urgent.cycle(), Priority::Emergency);
        assert_eq!(Priority::Emergency.cycle(), Priority::Standard);
    }
}
