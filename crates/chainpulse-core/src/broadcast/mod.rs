//! Fan-out broadcast to live dashboard subscribers.
//!
//! The [`BroadcastHub`] carries pre-serialized envelope frames over a
//! `tokio::sync::broadcast` channel; websocket sessions subscribe and
//! forward frames verbatim. Delivery is best-effort with no
//! acknowledgments: publishing with zero live subscribers succeeds, and a
//! subscriber that lags past the channel capacity drops the missed frames.
//!
//! [`TpsPublisher`] is the throughput-specific producer: it projects block
//! metrics to wire form and publishes them on the fixed
//! [`Channel::BlockTpsList`] topic.

pub mod hub;
pub mod publisher;

pub use hub::{BroadcastHub, Channel, PublishError};
pub use publisher::TpsPublisher;
