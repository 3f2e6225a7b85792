//! Stream consumption for `OptimizerClient`
//!
//! One loop per submission: await a chunk, decode, parse and apply every
//! line it completes, publish the updates, then await again.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::message::parse_event;
use crate::session::Session;
use crate::transport::{FrameDecoder, Transport};
use crate::types::events::{OptimizeRequest, SessionUpdate};
use crate::types::identifiers::SubmissionId;

/// Status message for a submission whose future was dropped mid-stream
pub const CANCELLED_MESSAGE: &str = "Submission cancelled";

impl<T: Transport> super::OptimizerClient<T> {
    /// Issue the request and consume the body until it ends or fails
    pub(super) async fn drive_stream(&self, request: &OptimizeRequest) {
        let mut stream = match self.transport.open_stream(request).await {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("Optimization failed: {e}");
                self.fail(e.to_string());
                return;
            }
        };

        let mut decoder = FrameDecoder::with_max_line_bytes(self.max_line_bytes);
        let mut overflowed = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!("Optimization stream failed: {e}");
                    self.fail(e.to_string());
                    return;
                }
            };

            let lines = decoder.feed(&bytes);
            let newly_overflowed = decoder.overflowed_lines() - overflowed;
            overflowed = decoder.overflowed_lines();
            self.apply_lines(lines, newly_overflowed);
        }

        let trailing = decoder.finish().into_iter().collect();
        self.apply_lines(trailing, 0);

        let update = self.session.lock().finish();
        if let Some(update) = update {
            self.publish(update);
        }
    }

    /// Parse and apply a batch of lines under a single lock
    fn apply_lines(&self, lines: Vec<String>, overflowed: usize) {
        let mut updates: Vec<SessionUpdate> = Vec::new();
        {
            let mut session = self.session.lock();
            for _ in 0..overflowed {
                session.record_dropped_line();
            }
            for line in lines {
                if line.trim().is_empty() {
                    continue;
                }
                match parse_event(&line) {
                    Ok(event) => updates.extend(session.apply(event)),
                    Err(e) => {
                        log::warn!("Dropping malformed stream line: {e}");
                        session.record_dropped_line();
                    }
                }
            }
        }

        for update in updates {
            self.publish(update);
        }
    }

    fn fail(&self, message: String) {
        let update = self.session.lock().fail(message);
        if let Some(update) = update {
            self.publish(update);
        }
    }
}

/// Fails the session if a submission is dropped before its stream ends
pub(super) struct CancelGuard {
    session: Arc<Mutex<Session>>,
    updates: broadcast::Sender<SessionUpdate>,
    submission_id: SubmissionId,
}

impl CancelGuard {
    pub(super) fn new<T: Transport>(
        client: &super::OptimizerClient<T>,
        submission_id: SubmissionId,
    ) -> Self {
        Self {
            session: Arc::clone(&client.session),
            updates: client.updates.clone(),
            submission_id,
        }
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        let update = {
            let mut session = self.session.lock();
            if session.submission_id() != Some(&self.submission_id) {
                return;
            }
            session.fail(CANCELLED_MESSAGE)
        };
        if let Some(update) = update {
            log::warn!("Submission {} dropped before its stream ended", self.submission_id);
            let _ = self.updates.send(update);
        }
    }
}
