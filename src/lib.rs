//! # Prompt Optimizer Client
//!
//! A streaming client for a multi-agent prompt optimization service. A
//! submitted prompt is refined by three cooperating agents (a Manager,
//! Agent A and Agent B); the service reports their reasoning and the final
//! optimized prompt as newline-delimited JSON over a single HTTP response
//! body. This crate consumes that body incrementally and keeps per-agent logs
//! and the result up to date as each line arrives.
//!
//! ## Quick Start
//!
//! ```no_run
//! use prompt_optimizer::{ClientOptions, OptimizerClient, SessionStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OptimizerClient::from_options(&ClientOptions::default())?;
//!
//!     if let Some(SessionStatus::Complete) = client.submit("write a haiku").await {
//!         log::info!("Optimized: {}", client.snapshot().result());
//!     }
//!
//!     // Refine the previous result with a follow-up request
//!     client.submit("make it about autumn").await;
//!     Ok(())
//! }
//! ```
//!
//! ## Wire Format
//!
//! Each non-empty line of the response body is one JSON object:
//!
//! ```text
//! {"type":"log","agent":"Manager","message":"planning"}
//! {"type":"log","agent":"Agent A","message":"draft 1"}
//! {"type":"result","content":"Haiku: ..."}
//! {"type":"error","message":"rate limited"}
//! ```
//!
//! Lines that are not valid events are skipped; one corrupt line never ends
//! a session. Log lines from agents the client does not know are ignored.
//!
//! ## Architecture
//!
//! - [`transport`]: the [`Transport`] trait, [`HttpTransport`] and the
//!   [`FrameDecoder`] that splits body chunks into lines
//! - [`message`]: line to [`StreamEvent`] parsing
//! - [`session`]: the [`Session`] state machine and event application
//! - [`client`]: [`OptimizerClient`], which ties the above together
//! - [`render`]: text projections used by the terminal client
//! - [`types`]: identifiers, events, status report and options
//! - [`error`]: error types
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, OptimizerError>`](Result).
//! Transport failures during a submission are not returned as errors: they
//! move the session to [`SessionStatus::Failed`], which is what a caller
//! displays anyway.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod message;
pub mod render;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types for external API
pub use client::{CANCELLED_MESSAGE, OptimizerClient, UpdateFeed};
pub use error::{OptimizerError, Result};
pub use message::parse_event;
pub use session::{AgentLogs, ERROR_MARKER_PREFIX, Session, SessionStatus};
pub use transport::{ByteStream, FrameDecoder, HttpTransport, Transport};

pub use types::events::{OptimizeRequest, SessionUpdate, StreamEvent};
pub use types::identifiers::{AgentId, SubmissionId};
pub use types::model_status::{ModelHealth, ModelStatusDisplay, ModelStatusReport};
pub use types::options::{ClientOptions, ClientOptionsBuilder};

/// Version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
