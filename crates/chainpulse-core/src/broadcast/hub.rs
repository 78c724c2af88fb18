//! The subscriber fan-out hub.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::trace;

/// Logical dashboard topics. Fixed at compile time, never per-client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Recent per-block throughput list.
    #[serde(rename = "block_tpslist")]
    BlockTpsList,
}

impl Channel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockTpsList => "block_tpslist",
        }
    }
}

/// Frame envelope: the channel tag plus the payload, serialized once at
/// publish time and shared by every subscriber.
#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    channel: Channel,
    data: &'a T,
}

/// Errors from publishing on the hub.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The payload could not be serialized.
    #[error("broadcast payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fan-out hub for dashboard subscribers.
///
/// Cheap to clone; clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    tx: broadcast::Sender<Arc<str>>,
}

impl BroadcastHub {
    /// Creates a hub retaining up to `capacity` undelivered frames per
    /// subscriber before lagging ones start dropping.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Opens a new subscription receiving every frame published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }

    /// Number of currently live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publishes `data` on `channel`, returning how many live subscribers
    /// the frame was handed to. Zero subscribers is success — delivery is
    /// best-effort and unacknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Encode`] if the payload cannot be serialized.
    pub fn publish<T: Serialize>(
        &self,
        channel: Channel,
        data: &T,
    ) -> Result<usize, PublishError> {
        let frame = serde_json::to_string(&Envelope { channel, data })?;
        match self.tx.send(Arc::from(frame.as_str())) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                trace!(channel = channel.as_str(), "published with no live subscribers");
                Ok(0)
            }
        }
    }
}
