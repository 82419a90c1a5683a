//! Domain logic for the OTT availability catalog.
//!
//! Entities, the filter builder, discovery and search services, the store
//! traits with an in-memory implementation, the admin script queue, and
//! back-office helpers. No database or HTTP dependency.

pub mod audit;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod memory;
pub mod metrics;
pub mod movie;
pub mod person;
pub mod platforms;
pub mod scripting;
pub mod search;
pub mod store;
pub mod submission;
pub mod types;
pub mod validation;
