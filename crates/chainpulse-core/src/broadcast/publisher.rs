//! The throughput-update producer.

use super::hub::{BroadcastHub, Channel, PublishError};
use crate::types::{BlockMetric, WireMetric};
use tracing::trace;

/// Publishes throughput snapshots to the fixed dashboard topic.
#[derive(Debug, Clone)]
pub struct TpsPublisher {
    hub: BroadcastHub,
}

impl TpsPublisher {
    #[must_use]
    pub fn new(hub: BroadcastHub) -> Self {
        Self { hub }
    }

    /// Projects each metric to wire form, preserving input order, and
    /// publishes the list on [`Channel::BlockTpsList`].
    ///
    /// An empty input is valid and still sends an empty update, so
    /// subscribers can tell "no recent blocks" from "no update sent". No
    /// retries happen here; retry policy belongs to the refresh schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the payload cannot be serialized.
    pub fn publish(&self, metrics: &[BlockMetric]) -> Result<(), PublishError> {
        let wire: Vec<WireMetric> = metrics.iter().map(WireMetric::from).collect();
        let receivers = self.hub.publish(Channel::BlockTpsList, &wire)?;
        trace!(blocks = wire.len(), receivers, "throughput update published");
        Ok(())
    }
}
