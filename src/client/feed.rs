//! Lag-tolerant view of the update channel

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::types::events::SessionUpdate;

/// Receiver side of [`OptimizerClient::subscribe`](super::OptimizerClient::subscribe)
///
/// A subscriber that falls behind the channel capacity loses the oldest
/// updates but keeps receiving; the skipped count is kept in [`missed`](Self::missed).
#[derive(Debug)]
pub struct UpdateFeed {
    receiver: broadcast::Receiver<SessionUpdate>,
    missed: u64,
}

impl UpdateFeed {
    pub(super) const fn new(receiver: broadcast::Receiver<SessionUpdate>) -> Self {
        Self {
            receiver,
            missed: 0,
        }
    }

    /// Wait for the next update
    ///
    /// Returns `None` once every client handle has been dropped.
    pub async fn next(&mut self) -> Option<SessionUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(RecvError::Lagged(skipped)) => self.record_lag(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take every update already published, without waiting
    pub fn drain(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(update) => updates.push(update),
                Err(TryRecvError::Lagged(skipped)) => self.record_lag(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return updates,
            }
        }
    }

    /// Updates skipped because this feed fell behind
    #[must_use]
    pub const fn missed(&self) -> u64 {
        self.missed
    }

    fn record_lag(&mut self, skipped: u64) {
        log::warn!("Update feed fell behind; skipped {skipped} update(s)");
        self.missed += skipped;
    }
}
