//! Optimization session state
//!
//! A [`Session`] is the whole observable state of one client: the prompt
//! being edited, the latest result, per-agent logs and a status. All
//! mutations go through a handful of transitions:
//!
//! ```text
//!            submit                  stream end (no error event)
//!   Ready ───────────► Optimizing ──────────────────────────────► Complete
//!     ▲                    │  error event / transport failure        │
//!     │                    ▼                                         │
//!     └──── reset ──── Failed(message) ◄─────────────────────────────┘
//!                                          (submit again from either)
//! ```
//!
//! Event application is pure with respect to I/O, so the state machine is
//! tested without any network or rendering.

mod logs;

use chrono::{DateTime, Utc};

use crate::types::events::{OptimizeRequest, SessionUpdate, StreamEvent};
use crate::types::identifiers::{AgentId, SubmissionId};

pub use logs::AgentLogs;

/// Prefix of the marker appended to the Manager log for error events
pub const ERROR_MARKER_PREFIX: &str = "ERROR: ";

/// Lifecycle status of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing submitted yet, or reset
    #[default]
    Ready,
    /// A stream is being consumed
    Optimizing,
    /// The last stream ended without an error event
    Complete,
    /// Transport failure or backend error event
    Failed(String),
}

impl SessionStatus {
    /// Whether the status is `Failed`
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::Optimizing => f.write_str("Optimizing..."),
            Self::Complete => f.write_str("Optimization Complete"),
            Self::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// State of one optimization client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    input: String,
    result: String,
    logs: AgentLogs,
    status: SessionStatus,
    /// Set from submit until the stream ends; gates submit, reset and edits
    in_flight: bool,
    submission_id: Option<SubmissionId>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    dropped_lines: usize,
}

impl Session {
    /// Create a session in the `Ready` state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current prompt text
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Latest optimized prompt, empty if none
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Per-agent logs
    #[must_use]
    pub const fn logs(&self) -> &AgentLogs {
        &self.logs
    }

    /// Lifecycle status
    #[must_use]
    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Whether a stream is still being consumed
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Identifier of the current or most recent submission
    #[must_use]
    pub const fn submission_id(&self) -> Option<&SubmissionId> {
        self.submission_id.as_ref()
    }

    /// When the current or most recent submission started
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the most recent stream ended
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall-clock duration of the most recent finished submission
    #[must_use]
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }

    /// Malformed lines skipped during the current submission
    #[must_use]
    pub const fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }

    /// Replace the prompt text; rejected while a stream is in flight
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.in_flight {
            return false;
        }
        self.input = text.into();
        true
    }

    /// Start a submission
    ///
    /// Returns the request to issue, or `None` when the prompt is blank or a
    /// stream is already in flight. On success logs and result are cleared
    /// before anything from the new stream can be applied, and the previous
    /// result (if any) becomes the request's `starting_prompt`.
    pub fn submit(&mut self, prompt: &str) -> Option<OptimizeRequest> {
        if self.in_flight || prompt.trim().is_empty() {
            return None;
        }

        let starting_prompt = (!self.result.is_empty()).then(|| std::mem::take(&mut self.result));
        let request = OptimizeRequest {
            prompt: prompt.to_string(),
            starting_prompt,
        };

        self.input = prompt.to_string();
        self.result.clear();
        self.logs.clear();
        self.status = SessionStatus::Optimizing;
        self.in_flight = true;
        self.submission_id = Some(SubmissionId::generate());
        self.started_at = Some(Utc::now());
        self.finished_at = None;
        self.dropped_lines = 0;

        Some(request)
    }

    /// Apply one stream event
    ///
    /// Returns the resulting updates in the order they took effect. Events
    /// arriving after the stream finished are ignored.
    pub fn apply(&mut self, event: StreamEvent) -> Vec<SessionUpdate> {
        if !self.in_flight {
            log::debug!("Ignoring event outside of an active stream: {event:?}");
            return Vec::new();
        }

        match event {
            StreamEvent::Log { agent, message } => match AgentId::from_wire(&agent) {
                Some(agent) => {
                    self.logs.push(agent, message.clone());
                    vec![SessionUpdate::Log { agent, message }]
                }
                None => {
                    log::debug!("Ignoring log line from unknown agent '{agent}'");
                    Vec::new()
                }
            },
            StreamEvent::Result { content } => {
                self.result.clone_from(&content);
                vec![SessionUpdate::Result { content }]
            }
            StreamEvent::Error { message } => {
                let marker = format!("{ERROR_MARKER_PREFIX}{message}");
                self.logs.push(AgentId::Manager, marker.clone());
                self.status = SessionStatus::Failed(message.clone());
                vec![
                    SessionUpdate::Log {
                        agent: AgentId::Manager,
                        message: marker,
                    },
                    SessionUpdate::Failed { message },
                ]
            }
        }
    }

    /// By-value form of [`Session::apply`]
    #[must_use]
    pub fn with_event(mut self, event: StreamEvent) -> Self {
        self.apply(event);
        self
    }

    /// Count a malformed line that was skipped
    pub fn record_dropped_line(&mut self) {
        if self.in_flight {
            self.dropped_lines += 1;
        }
    }

    /// The stream ended normally
    ///
    /// Moves to `Complete` unless an error event already failed the session.
    pub fn finish(&mut self) -> Option<SessionUpdate> {
        if !self.in_flight {
            return None;
        }
        self.in_flight = false;
        self.finished_at = Some(Utc::now());

        if self.status.is_failed() {
            return None;
        }
        self.status = SessionStatus::Complete;
        Some(SessionUpdate::Completed)
    }

    /// The transport failed; consumption of the stream stops here
    pub fn fail(&mut self, message: impl Into<String>) -> Option<SessionUpdate> {
        if !self.in_flight {
            return None;
        }
        let message = message.into();
        self.in_flight = false;
        self.finished_at = Some(Utc::now());
        self.status = SessionStatus::Failed(message.clone());
        Some(SessionUpdate::Failed { message })
    }

    /// Return to `Ready`, clearing input, result and logs
    ///
    /// Rejected while a stream is in flight.
    pub fn reset(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        *self = Self::default();
        true
    }
}
