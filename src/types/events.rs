//! Wire and notification types
//!
//! [`StreamEvent`] is what the server writes, one JSON object per line.
//! [`OptimizeRequest`] is what the client posts. [`SessionUpdate`] is what
//! the controller broadcasts to renderers after applying an event.

use serde::{Deserialize, Serialize};

use super::identifiers::{AgentId, SubmissionId};

// ============================================================================
// Request
// ============================================================================

/// Body of the optimize request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// The user's request text
    pub prompt: String,
    /// Previous result to refine, serialized as `null` when absent
    pub starting_prompt: Option<String>,
}

// ============================================================================
// Stream events
// ============================================================================

/// One event decoded from a single line of the response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Reasoning output from one agent
    Log {
        /// Agent wire name; kept raw so unknown agents can be ignored
        agent: String,
        /// Log line
        message: String,
    },
    /// The current optimized prompt, replacing any earlier one
    Result {
        /// Optimized prompt text
        content: String,
    },
    /// Backend-reported failure
    Error {
        /// Error message
        message: String,
    },
}

impl StreamEvent {
    /// Build a log event for a known agent
    pub fn log(agent: AgentId, message: impl Into<String>) -> Self {
        Self::Log {
            agent: agent.wire_name().to_string(),
            message: message.into(),
        }
    }

    /// Build a result event
    pub fn result(content: impl Into<String>) -> Self {
        Self::Result {
            content: content.into(),
        }
    }

    /// Build an error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// ============================================================================
// Session updates
// ============================================================================

/// Change notification emitted by the session controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A submission began; logs and result were cleared
    Started {
        /// Identifier of the new submission
        submission_id: SubmissionId,
        /// The request that was issued
        request: OptimizeRequest,
    },
    /// A line was appended to an agent log
    Log {
        /// Agent whose log grew
        agent: AgentId,
        /// Appended line
        message: String,
    },
    /// The result was replaced
    Result {
        /// New result text
        content: String,
    },
    /// The session entered the failed state
    Failed {
        /// Failure message
        message: String,
    },
    /// The stream ended without an error event
    Completed,
    /// The session was reset to its initial state
    Reset,
}
