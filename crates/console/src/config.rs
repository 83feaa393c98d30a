use anyhow::Context;
use protocol::{default_roster, Patient};
use serde::Deserialize;
use std::path::Path;

pub(crate) const DEFAULT_ENDPOINT: &str = "http://localhost:5678/webhook/pa-submit";

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) webhook: WebhookConfig,
    #[serde(default)]
    pub(crate) limits: LimitsConfig,
    /// Replaces the built-in demo roster when non-empty.
    #[serde(default)]
    pub(crate) patients: Vec<PatientConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WebhookConfig {
    #[serde(default = "default_endpoint")]
    pub(crate) url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LimitsConfig {
    #[serde(default = "default_timeout_secs")]
    pub(crate) timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PatientConfig {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl Config {
    pub(crate) fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.webhook.url.trim().is_empty() {
            anyhow::bail!("webhook.url cannot be empty");
        }
        if self.limits.timeout_secs == 0 {
            anyhow::bail!("limits.timeout_secs must be at least 1");
        }
        for patient in &self.patients {
            if patient.id.trim().is_empty() {
                anyhow::bail!("patients entries must have a non-empty id");
            }
        }
        Ok(())
    }

    pub(crate) fn roster(&self) -> Vec<Patient> {
        if self.patients.is_empty() {
            default_roster()
        } else {
            self.patients
                .iter()
                .map(|patient| Patient::new(patient.id.clone(), patient.name.clone()))
                .collect()
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
