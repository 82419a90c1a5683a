//! HTTP surface of the catalog: public discovery and search endpoints plus
//! the admin back office.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
