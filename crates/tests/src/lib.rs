//! Integration tests for the chainpulse refresh pipeline.
//!
//! This crate contains:
//!
//! - `refresh_pipeline_tests`: End-to-end Load → Store → Broadcast scenarios
//!   over mock infrastructure, including degraded-stage behavior
//! - `read_path_tests`: Cache read-path semantics (miss vs. empty, stale
//!   reads after failed refreshes)
//! - `mock_infrastructure`: Reusable mock types (`MockBlockSource`,
//!   `FailingKv`) shared by the test modules
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```
//!
//! No external services are required; the primary store and key-value cache
//! are replaced by in-memory mocks behind the same trait boundaries the
//! server wires at startup.

#[cfg(test)]
mod read_path_tests;

#[cfg(test)]
mod refresh_pipeline_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;
