//! `OptimizerClient`: the session controller
//!
//! The client owns one [`Session`] and drives it from submission to the end
//! of the response stream:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      OptimizerClient                        │
//! │                                                             │
//! │  submit ──► Session::submit (guard, clear, request)         │
//! │                │                                            │
//! │                ▼                                            │
//! │  Transport::open_stream ──► chunk ──► FrameDecoder::feed    │
//! │                                          │                  │
//! │                                          ▼                  │
//! │                 parse_event ──► Session::apply ──► updates  │
//! │                                                    │        │
//! │                                   broadcast ◄──────┘        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! **Key Design Points:**
//! - The client suspends only while awaiting the request and the next chunk
//! - Each chunk is decoded and applied under one short lock, never held
//!   across an `.await`
//! - Only one stream is ever in flight; a second `submit` is rejected, not
//!   queued
//! - Dropping a `submit` future mid-stream fails the session with
//!   [`CANCELLED_MESSAGE`] so the next submission is accepted
//!
//! # Example
//!
//! ```no_run
//! use prompt_optimizer::{ClientOptions, OptimizerClient, SessionUpdate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OptimizerClient::from_options(&ClientOptions::from_env())?;
//! let mut updates = client.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Some(update) = updates.next().await {
//!         if let SessionUpdate::Log { agent, message } = update {
//!             log::info!("[{agent}] {message}");
//!         }
//!     }
//! });
//!
//! let status = client.submit("write a haiku").await;
//! log::info!("Finished: {status:?}");
//! log::info!("Result: {}", client.snapshot().result());
//! # Ok(())
//! # }
//! ```

mod client_impl;
mod feed;
mod tasks;

pub use feed::UpdateFeed;
pub use tasks::CANCELLED_MESSAGE;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::session::Session;
use crate::transport::{HttpTransport, Transport};
use crate::types::events::SessionUpdate;
use crate::types::model_status::ModelStatusDisplay;

/// Session controller for the optimization service
///
/// Cloning is cheap and yields a handle to the same session.
pub struct OptimizerClient<T: Transport = HttpTransport> {
    /// Transport layer
    transport: Arc<T>,
    /// The one session this client drives
    session: Arc<Mutex<Session>>,
    /// Status bar state, filled by `load_model_status`
    model_status: Arc<Mutex<ModelStatusDisplay>>,
    /// Real-time update notifications
    updates: broadcast::Sender<SessionUpdate>,
    /// Line length limit handed to each stream's decoder
    max_line_bytes: usize,
}

impl<T: Transport> Clone for OptimizerClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
            model_status: Arc::clone(&self.model_status),
            updates: self.updates.clone(),
            max_line_bytes: self.max_line_bytes,
        }
    }
}
