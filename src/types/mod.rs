//! Type definitions for the prompt optimizer client
//!
//! - [`identifiers`] - Agent and submission identifiers
//! - [`events`] - Request body, stream events and session updates
//! - [`model_status`] - Status probe payload
//! - [`options`] - Client configuration

pub mod events;
pub mod identifiers;
pub mod model_status;
pub mod options;

// Re-export commonly used types
pub use events::{OptimizeRequest, SessionUpdate, StreamEvent};
pub use identifiers::{AgentId, SubmissionId};
pub use model_status::{
    KeyStatus, ModelHealth, ModelInfo, ModelRoster, ModelStatusDisplay, ModelStatusReport,
};
pub use options::{ClientOptions, ClientOptionsBuilder};
