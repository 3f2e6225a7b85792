//! Identifier types
//!
//! Agent channel names and submission identifiers, wrapped so they cannot be
//! confused with arbitrary strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Agent identifiers
// ============================================================================

/// One of the three reasoning roles the backend reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentId {
    /// Coordinating agent; also receives error markers
    #[serde(rename = "Manager")]
    Manager,
    /// Expert drafter
    #[serde(rename = "Agent A")]
    AgentA,
    /// QA reviewer
    #[serde(rename = "Agent B")]
    AgentB,
}

impl AgentId {
    /// All agents in display order
    pub const ALL: [Self; 3] = [Self::Manager, Self::AgentA, Self::AgentB];

    /// Name used on the wire
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::AgentA => "Agent A",
            Self::AgentB => "Agent B",
        }
    }

    /// Resolve a wire name; unknown names yield `None`
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|agent| agent.wire_name() == name)
    }

    /// Human-readable role label
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Self::Manager => "Manager Agent",
            Self::AgentA => "Agent A (Expert Drafter)",
            Self::AgentB => "Agent B (QA Expert)",
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// Submission identifiers
// ============================================================================

/// Identifies one submission for log correlation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Generate a fresh random submission ID
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
