//! # Chainpulse Core
//!
//! Core library for the chainpulse block-throughput dashboard backend.
//!
//! This crate provides the components behind the dashboard's "recent block
//! throughput" feed:
//!
//! - **[`store`]**: Primary-store access over `sqlx`/Postgres — recent block
//!   metrics, transaction-hash lookups, table introspection, and an explicit
//!   transaction wrapper for multi-statement work.
//!
//! - **[`cache`]**: Key-value snapshot cache with a fixed key and a stable
//!   JSON layout, behind a pluggable [`cache::KvStore`] boundary.
//!
//! - **[`broadcast`]**: Fan-out hub for live dashboard subscribers plus the
//!   throughput publisher that projects block metrics to wire form.
//!
//! - **[`refresh`]**: The Load → Store → Broadcast pipeline and its
//!   scheduled driver loop.
//!
//! - **[`throughput`]**: Pure windowed transaction-count aggregation.
//!
//! - **[`config`]**: Layered application configuration (defaults, TOML file,
//!   environment overrides).
//!
//! - **[`metrics`]**: Prometheus metrics collection for monitoring.
//!
//! ## Refresh Flow
//!
//! ```text
//! schedule tick
//!       │
//!       ▼
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │    Load     │ ──► │    Store     │ ──► │   Broadcast   │
//! │ BlockSource │     │ MetricsCache │     │ BroadcastHub  │
//! └─────────────┘     └──────────────┘     └───────────────┘
//!       │                    │                     │
//!   abort cycle        log, continue          log, report
//!   on failure          to broadcast
//! ```
//!
//! The broadcast stage always uses the snapshot loaded in the same cycle,
//! never a cache re-read, so subscribers and the cache can only diverge by a
//! logged store failure — not silently.
//!
//! A separate read path serves the last-known snapshot straight from the
//! cache without touching the primary store.

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod refresh;
pub mod store;
pub mod throughput;
pub mod types;
