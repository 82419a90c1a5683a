//! Persistence seams consumed by the domain services.
//!
//! [`CatalogStore`] and [`ExecutionStore`] are implemented by the in-memory
//! store ([`crate::memory::MemoryStore`]) and by the PostgreSQL store in the
//! database crate. Services hold them as `Arc<dyn ...>`.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::filter::{MovieQuery, Predicate};
use crate::movie::{Movie, NewMovie};
use crate::scripting::status::{ExecutionResult, NewExecution, ScriptExecution};
use crate::types::DbId;

/// The catalog of movies, queryable by typed predicate.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend(&self) -> &'static str;

    /// Matching movies, ordered and windowed as the query asks.
    async fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, CoreError>;

    /// Number of movies matching every predicate.
    async fn count(&self, predicates: &[Predicate]) -> Result<u64, CoreError>;

    /// Lookup by internal id, regardless of the active flag.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError>;

    /// Lookup by TMDB id, regardless of the active flag.
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, CoreError>;

    /// Insert a new movie. A second movie with the same TMDB id is
    /// [`CoreError::DuplicateMovie`].
    async fn insert(&self, movie: NewMovie) -> Result<Movie, CoreError>;

    /// Persist every editable field of an existing movie and bump
    /// `last_updated`. The TMDB id is never rewritten.
    async fn update(&self, movie: &Movie) -> Result<Movie, CoreError>;

    /// Toggle the active flag; returns the number of rows touched.
    async fn set_active(&self, ids: &[DbId], active: bool) -> Result<u64, CoreError>;

    /// Hard delete; returns the number of rows removed.
    async fn delete(&self, ids: &[DbId]) -> Result<u64, CoreError>;
}

/// Durable records of admin script runs.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    async fn create_execution(&self, execution: &NewExecution) -> Result<ScriptExecution, CoreError>;

    /// Transition to `running` and stamp the start time.
    async fn mark_running(&self, id: DbId) -> Result<(), CoreError>;

    /// Record the terminal state of a run.
    async fn finish(&self, id: DbId, result: &ExecutionResult) -> Result<(), CoreError>;

    async fn find_execution(&self, id: DbId) -> Result<Option<ScriptExecution>, CoreError>;

    /// Most recent first.
    async fn recent_executions(&self, limit: usize) -> Result<Vec<ScriptExecution>, CoreError>;
}
