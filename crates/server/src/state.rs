//! Shared handler state.

use chainpulse_core::{broadcast::BroadcastHub, cache::MetricsCache, store::BlockSource};
use std::sync::Arc;

/// Everything the HTTP and websocket handlers need, cheap to clone per
/// request.
#[derive(Clone)]
pub struct AppState {
    /// Read path: last-known throughput snapshot.
    pub cache: MetricsCache,

    /// Fan-out hub websocket sessions subscribe to.
    pub hub: BroadcastHub,

    /// Ambient store access for the windowed-throughput query.
    pub source: Arc<dyn BlockSource>,
}
