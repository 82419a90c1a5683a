//! PostgreSQL implementations of the core store traits.

use async_trait::async_trait;
use ottradar_core::error::CoreError;
use ottradar_core::filter::{MovieQuery, Predicate};
use ottradar_core::movie::{Movie, NewMovie};
use ottradar_core::scripting::status::{ExecutionResult, NewExecution, ScriptExecution};
use ottradar_core::store::{CatalogStore, ExecutionStore};
use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{MovieRepo, ScriptExecutionRepo};

/// Postgres error code for a unique violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Unique constraint on `movies.tmdb_id`.
const MOVIE_TMDB_ID_CONSTRAINT: &str = "uq_movies_tmdb_id";

/// Catalog and execution store over a connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// The constraint named by a unique violation, if `err` is one.
fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or("unique constraint"))
        }
        _ => None,
    }
}

/// Map a database error onto the domain taxonomy. Unique violations become
/// [`CoreError::Conflict`] naming the constraint.
pub fn to_core_error(err: sqlx::Error) -> CoreError {
    if let Some(constraint) = violated_unique_constraint(&err) {
        return CoreError::Conflict(format!("Duplicate value violates {constraint}"));
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl CatalogStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::query(&self.pool, query).await.map_err(to_core_error)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, CoreError> {
        let n = MovieRepo::count(&self.pool, predicates)
            .await
            .map_err(to_core_error)?;
        Ok(n.max(0) as u64)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError> {
        let row = MovieRepo::find_by_id(&self.pool, id)
            .await
            .map_err(to_core_error)?;
        Ok(row.map(Movie::from))
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, CoreError> {
        let row = MovieRepo::find_by_tmdb_id(&self.pool, tmdb_id)
            .await
            .map_err(to_core_error)?;
        Ok(row.map(Movie::from))
    }

    async fn insert(&self, movie: NewMovie) -> Result<Movie, CoreError> {
        let tmdb_id = movie.tmdb_id;
        let row = MovieRepo::insert(&self.pool, &movie).await.map_err(|e| {
            if violated_unique_constraint(&e) == Some(MOVIE_TMDB_ID_CONSTRAINT) {
                CoreError::DuplicateMovie { tmdb_id }
            } else {
                to_core_error(e)
            }
        })?;
        Ok(row.into())
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, CoreError> {
        MovieRepo::update(&self.pool, movie)
            .await
            .map_err(to_core_error)?
            .map(Movie::from)
            .ok_or(CoreError::NotFound {
                entity: "Movie",
                id: movie.id,
            })
    }

    async fn set_active(&self, ids: &[DbId], active: bool) -> Result<u64, CoreError> {
        MovieRepo::set_active(&self.pool, ids, active)
            .await
            .map_err(to_core_error)
    }

    async fn delete(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        MovieRepo::delete(&self.pool, ids).await.map_err(to_core_error)
    }
}

#[async_trait]
impl ExecutionStore for PgStore {
    async fn create_execution(&self, execution: &NewExecution) -> Result<ScriptExecution, CoreError> {
        let row = ScriptExecutionRepo::create(&self.pool, execution)
            .await
            .map_err(to_core_error)?;
        Ok(row.into())
    }

    async fn mark_running(&self, id: DbId) -> Result<(), CoreError> {
        let found = ScriptExecutionRepo::mark_running(&self.pool, id)
            .await
            .map_err(to_core_error)?;
        if !found {
            return Err(CoreError::NotFound {
                entity: "ScriptExecution",
                id,
            });
        }
        Ok(())
    }

    async fn finish(&self, id: DbId, result: &ExecutionResult) -> Result<(), CoreError> {
        let found = ScriptExecutionRepo::finish(&self.pool, id, result)
            .await
            .map_err(to_core_error)?;
        if !found {
            return Err(CoreError::NotFound {
                entity: "ScriptExecution",
                id,
            });
        }
        Ok(())
    }

    async fn find_execution(&self, id: DbId) -> Result<Option<ScriptExecution>, CoreError> {
        let row = ScriptExecutionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(to_core_error)?;
        Ok(row.map(ScriptExecution::from))
    }

    async fn recent_executions(&self, limit: usize) -> Result<Vec<ScriptExecution>, CoreError> {
        let rows = ScriptExecutionRepo::list_recent(&self.pool, limit as i64)
            .await
            .map_err(to_core_error)?;
        Ok(rows.into_iter().map(ScriptExecution::from).collect())
    }
}
