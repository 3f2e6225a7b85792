//! `OptimizerClient` implementation
//!
//! This module contains the constructors and public API methods.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::session::{Session, SessionStatus};
use crate::transport::{HttpTransport, Transport};
use crate::types::events::SessionUpdate;
use crate::types::model_status::ModelStatusDisplay;
use crate::types::options::ClientOptions;

use super::UpdateFeed;
use super::tasks::CancelGuard;

impl super::OptimizerClient<HttpTransport> {
    /// Create a client talking HTTP to the configured server
    ///
    /// # Errors
    /// Returns error if the options are invalid or the HTTP client cannot be
    /// built
    pub fn from_options(options: &ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(options)?;
        Ok(Self::with_transport(transport, options))
    }
}

impl<T: Transport> super::OptimizerClient<T> {
    /// Create a client over any transport
    #[must_use]
    pub fn with_transport(transport: T, options: &ClientOptions) -> Self {
        let (updates, _) = broadcast::channel(options.update_capacity.max(1));
        Self {
            transport: Arc::new(transport),
            session: Arc::new(Mutex::new(Session::new())),
            model_status: Arc::new(Mutex::new(ModelStatusDisplay::Checking)),
            updates,
            max_line_bytes: options.max_line_bytes,
        }
    }

    /// Copy of the current session state
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    /// Current session status
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.lock().status().clone()
    }

    /// Subscribe to session updates
    ///
    /// Updates published before the call are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> UpdateFeed {
        UpdateFeed::new(self.updates.subscribe())
    }

    /// Replace the prompt text; returns `false` while optimizing
    pub fn set_input(&self, text: impl Into<String>) -> bool {
        self.session.lock().set_input(text)
    }

    /// Submit a prompt and consume the response stream to its end
    ///
    /// Returns `None` without issuing a request if the prompt is blank or
    /// another submission is still streaming. Otherwise returns the status
    /// the session finished in. Transport failures are not returned as
    /// errors; they surface as `SessionStatus::Failed`.
    pub async fn submit(&self, prompt: &str) -> Option<SessionStatus> {
        let (request, submission_id) = {
            let mut session = self.session.lock();
            let Some(request) = session.submit(prompt) else {
                log::debug!(
                    "Submit rejected (in flight: {}, blank prompt: {})",
                    session.is_in_flight(),
                    prompt.trim().is_empty()
                );
                return None;
            };
            (request, session.submission_id().cloned())
        };

        let submission_id = submission_id?;
        log::info!(
            "Submission {submission_id} started (refining: {})",
            request.starting_prompt.is_some()
        );
        self.publish(SessionUpdate::Started {
            submission_id: submission_id.clone(),
            request: request.clone(),
        });

        let guard = CancelGuard::new(self, submission_id.clone());
        self.drive_stream(&request).await;
        drop(guard);

        let status = self.status();
        log::info!("Submission {submission_id} finished: {status}");
        Some(status)
    }

    /// Submit the current input again, refining the previous result
    pub async fn refine(&self) -> Option<SessionStatus> {
        let input = self.session.lock().input().to_string();
        self.submit(&input).await
    }

    /// Clear input, result and logs; returns `false` while optimizing
    pub fn reset(&self) -> bool {
        let reset = self.session.lock().reset();
        if reset {
            self.publish(SessionUpdate::Reset);
        } else {
            log::debug!("Reset rejected while optimizing");
        }
        reset
    }

    /// Current status bar state
    #[must_use]
    pub fn model_status(&self) -> ModelStatusDisplay {
        self.model_status.lock().clone()
    }

    /// Probe the status endpoint once
    ///
    /// A failure is logged and leaves the display in `Checking`.
    pub async fn load_model_status(&self) -> ModelStatusDisplay {
        match self.transport.fetch_status().await {
            Ok(report) => {
                if report.has_key_errors() {
                    log::warn!(
                        "Key validation errors: openai={:?} gemini={:?}",
                        report.keys.openai_error,
                        report.keys.gemini_error
                    );
                }
                *self.model_status.lock() = ModelStatusDisplay::Loaded(report);
            }
            Err(e) => log::error!("Failed to check keys: {e}"),
        }
        self.model_status()
    }

    pub(super) fn publish(&self, update: SessionUpdate) {
        // No receivers is fine; rendering is optional
        let _ = self.updates.send(update);
    }
}
