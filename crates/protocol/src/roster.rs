use serde::{Deserialize, Serialize};

/// A patient record as presented in the submission picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub name: String,
}

impl Patient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Picker label, `<id> - <name>`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }
}

/// The built-in demo roster, used when no roster is configured.
pub fn default_roster() -> Vec<Patient> {
    vec![
        Patient::new("P-1002345", "John D. Doe"),
        Patient::new("P-1003456", "Jane A. Smith"),
        Patient::new("P-1004567", "Emily R. White"),
        Patient::new("1001", "John Smith (Demo)"),
    ]
}
