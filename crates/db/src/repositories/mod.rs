//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod affiliate_repo;
pub mod audit_repo;
pub mod link_health_repo;
pub mod movie_repo;
pub mod person_repo;
pub mod script_execution_repo;
pub mod snapshot_repo;
pub mod submission_repo;
pub mod watchlist_repo;

pub use affiliate_repo::AffiliateRepo;
pub use audit_repo::AuditRepo;
pub use link_health_repo::LinkHealthRepo;
pub use movie_repo::MovieRepo;
pub use person_repo::PersonRepo;
pub use script_execution_repo::ScriptExecutionRepo;
pub use snapshot_repo::SnapshotRepo;
pub use submission_repo::SubmissionRepo;
pub use watchlist_repo::WatchlistRepo;
