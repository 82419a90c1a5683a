//! Row structs and their conversions into the core entities.
//!
//! Each submodule holds a `FromRow` struct matching the table and a `From`
//! impl into the corresponding `ottradar_core` type. JSON columns are parsed
//! leniently: malformed stored data degrades to an empty value.

pub mod affiliate;
pub mod audit;
pub mod link_health;
pub mod movie;
pub mod person;
pub mod script_execution;
pub mod snapshot;
pub mod submission;
pub mod watchlist;
