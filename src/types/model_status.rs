//! Model and API key status report
//!
//! Read once at startup from the status probe endpoint. Carries no session
//! semantics.

use serde::{Deserialize, Serialize};

/// API key validation state reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatus {
    /// OpenAI key state (`active`, `error`, `missing`, ...)
    pub openai: String,
    /// Gemini key state
    pub gemini: String,
    /// OpenAI validation error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_error: Option<String>,
    /// Gemini validation error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_error: Option<String>,
}

/// One configured model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Model state string
    pub status: String,
    /// Provider backing the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ModelInfo {
    /// Classify the status string
    #[must_use]
    pub fn health(&self) -> ModelHealth {
        ModelHealth::from_status(&self.status)
    }
}

/// Models assigned to each agent role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoster {
    /// Manager model
    pub manager: ModelInfo,
    /// Agent A model
    pub agent_a: ModelInfo,
    /// Agent B model
    pub agent_b: ModelInfo,
}

/// Full status probe payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatusReport {
    /// Key validation state
    pub keys: KeyStatus,
    /// Per-role models
    pub models: ModelRoster,
}

impl ModelStatusReport {
    /// Whether either key reported a validation error
    #[must_use]
    pub fn has_key_errors(&self) -> bool {
        self.keys.openai_error.is_some() || self.keys.gemini_error.is_some()
    }
}

/// Coarse health derived from a model status string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelHealth {
    /// Model reachable
    Active,
    /// Validation failed
    Error,
    /// Missing or unrecognized
    Unknown,
}

impl ModelHealth {
    /// Map the backend's status string
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status {
            "active" => Self::Active,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// What the status bar shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelStatusDisplay {
    /// Probe pending or failed
    #[default]
    Checking,
    /// Probe succeeded
    Loaded(ModelStatusReport),
}
