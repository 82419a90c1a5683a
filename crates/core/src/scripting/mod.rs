//! Admin background jobs: registry, subprocess runner, and the
//! single-flight heavy-job queue.
//!
//! Process management is pure (no DB access); run records go through
//! [`crate::store::ExecutionStore`].

pub mod executor;
pub mod queue;
pub mod registry;
pub mod status;
pub mod subprocess;
