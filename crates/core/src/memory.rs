//! In-process implementation of the store traits.
//!
//! Backs the unit and HTTP integration suites.
//! Evaluates [`MovieQuery`] with the same predicate semantics the SQL
//! renderer implements.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::filter::{sort_movies, MovieQuery, Predicate};
use crate::movie::{Movie, NewMovie};
use crate::scripting::status::{ExecutionResult, ExecutionStatus, NewExecution, ScriptExecution};
use crate::store::{CatalogStore, ExecutionStore};
use crate::types::DbId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    movies: RwLock<BTreeMap<DbId, Movie>>,
    executions: RwLock<BTreeMap<DbId, ScriptExecution>>,
    next_movie_id: AtomicI64,
    next_execution_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog. Ids are taken as given; new inserts continue after the largest.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        let max_id = movies.iter().map(|m| m.id).max().unwrap_or(0);
        Self {
            movies: RwLock::new(movies.into_iter().map(|m| (m.id, m)).collect()),
            next_movie_id: AtomicI64::new(max_id),
            ..Self::default()
        }
    }

    fn next_id(counter: &AtomicI64) -> DbId {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, query: &MovieQuery) -> Result<Vec<Movie>, CoreError> {
        let mut matched: Vec<Movie> = self
            .movies
            .read()
            .await
            .values()
            .filter(|m| query.matches(m))
            .cloned()
            .collect();

        if query.is_random() {
            matched.shuffle(&mut rand::rng());
        } else {
            sort_movies(&mut matched, &query.sort);
        }

        let window = matched.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        })
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, CoreError> {
        let count = self
            .movies
            .read()
            .await
            .values()
            .filter(|m| predicates.iter().all(|p| p.matches(m)))
            .count();
        Ok(count as u64)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError> {
        Ok(self.movies.read().await.get(&id).cloned())
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<Movie>, CoreError> {
        Ok(self
            .movies
            .read()
            .await
            .values()
            .find(|m| m.tmdb_id == tmdb_id)
            .cloned())
    }

    async fn insert(&self, movie: NewMovie) -> Result<Movie, CoreError> {
        let mut movies = self.movies.write().await;
        if movies.values().any(|m| m.tmdb_id == movie.tmdb_id) {
            return Err(CoreError::DuplicateMovie {
                tmdb_id: movie.tmdb_id,
            });
        }
        let id = Self::next_id(&self.next_movie_id);
        let stored = movie.into_movie(id, Utc::now());
        movies.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, CoreError> {
        let mut movies = self.movies.write().await;
        let slot = movies.get_mut(&movie.id).ok_or(CoreError::NotFound {
            entity: "Movie",
            id: movie.id,
        })?;
        // `tmdb_id` is fixed at insert, as in `MovieRepo::update`.
        *slot = Movie {
            tmdb_id: slot.tmdb_id,
            last_updated: Utc::now(),
            ..movie.clone()
        };
        Ok(slot.clone())
    }

    async fn set_active(&self, ids: &[DbId], active: bool) -> Result<u64, CoreError> {
        let mut movies = self.movies.write().await;
        let mut touched = 0;
        for id in ids {
            if let Some(m) = movies.get_mut(id) {
                m.is_active = active;
                m.last_updated = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn delete(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        let mut movies = self.movies.write().await;
        Ok(ids.iter().filter(|id| movies.remove(*id).is_some()).count() as u64)
    }
}

#[async_trait]
impl ExecutionStore for MemoryStore {
    async fn create_execution(&self, execution: &NewExecution) -> Result<ScriptExecution, CoreError> {
        let id = Self::next_id(&self.next_execution_id);
        let now = Utc::now();
        let record = ScriptExecution {
            id,
            script_name: execution.script_name.clone(),
            triggered_by: execution.triggered_by.clone(),
            status: execution.status,
            started_at: (execution.status == ExecutionStatus::Running).then_some(now),
            completed_at: None,
            duration_seconds: None,
            exit_code: None,
            output_log: None,
            error_message: None,
            created_at: now,
        };
        self.executions.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn mark_running(&self, id: DbId) -> Result<(), CoreError> {
        let mut executions = self.executions.write().await;
        let record = executions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "ScriptExecution",
            id,
        })?;
        record.status = ExecutionStatus::Running;
        record.started_at = Some(Utc::now());
        Ok(())
    }

    async fn finish(&self, id: DbId, result: &ExecutionResult) -> Result<(), CoreError> {
        let mut executions = self.executions.write().await;
        let record = executions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "ScriptExecution",
            id,
        })?;
        record.status = result.status;
        record.exit_code = result.exit_code;
        record.output_log = result.output_log.clone();
        record.error_message = result.error_message.clone();
        record.duration_seconds = Some(result.duration_seconds);
        record.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn find_execution(&self, id: DbId) -> Result<Option<ScriptExecution>, CoreError> {
        Ok(self.executions.read().await.get(&id).cloned())
    }

    async fn recent_executions(&self, limit: usize) -> Result<Vec<ScriptExecution>, CoreError> {
        Ok(self
            .executions
            .read()
            .await
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::filter::{Direction, SortKey};
    use crate::movie::fixtures::movie;

    #[tokio::test]
    async fn insert_assigns_ids_after_seeded_movies() {
        let store = MemoryStore::with_movies(vec![movie(7, "Seed")]);
        let inserted = store
            .insert(NewMovie {
                tmdb_id: 42,
                title: "New".into(),
                ..NewMovie::default()
            })
            .await
            .unwrap();
        assert_eq!(inserted.id, 8);
        assert!(inserted.is_active);
    }

    #[tokio::test]
    async fn duplicate_tmdb_id_is_rejected() {
        let store = MemoryStore::new();
        let new = NewMovie {
            tmdb_id: 42,
            title: "Once".into(),
            ..NewMovie::default()
        };
        store.insert(new.clone()).await.unwrap();
        assert_matches!(
            store.insert(new).await,
            Err(CoreError::DuplicateMovie { tmdb_id: 42 })
        );
    }

    #[tokio::test]
    async fn update_missing_movie_is_not_found() {
        let store = MemoryStore::new();
        assert_matches!(
            store.update(&movie(3, "Ghost")).await,
            Err(CoreError::NotFound { entity: "Movie", id: 3 })
        );
    }

    #[tokio::test]
    async fn update_never_rewrites_tmdb_id() {
        let store = MemoryStore::with_movies(vec![movie(1, "A"), movie(2, "B")]);
        let mut edited = store.find_by_id(1).await.unwrap().unwrap();
        edited.tmdb_id = 1002;
        edited.title = "A2".into();

        let saved = store.update(&edited).await.unwrap();
        assert_eq!(saved.tmdb_id, 1001);
        assert_eq!(saved.title, "A2");
    }

    #[tokio::test]
    async fn set_active_and_delete_report_touched_rows() {
        let store = MemoryStore::with_movies(vec![movie(1, "A"), movie(2, "B")]);
        assert_eq!(store.set_active(&[1, 9], false).await.unwrap(), 1);
        assert!(!store.find_by_id(1).await.unwrap().unwrap().is_active);
        assert_eq!(store.delete(&[2, 3]).await.unwrap(), 1);
        assert!(store.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_windows_after_sorting() {
        let store = MemoryStore::with_movies(
            (1..=5)
                .map(|i| {
                    let mut m = movie(i, &format!("M{i}"));
                    m.popularity = i as f64;
                    m
                })
                .collect(),
        );
        let query = MovieQuery {
            sort: vec![(SortKey::Popularity, Direction::Desc)],
            limit: Some(2),
            offset: 1,
            ..MovieQuery::default()
        };
        let ids: Vec<DbId> = store.query(&query).await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[tokio::test]
    async fn execution_lifecycle() {
        let store = MemoryStore::new();
        let created = store
            .create_execution(&NewExecution {
                script_name: "export_db".into(),
                triggered_by: "admin".into(),
                status: ExecutionStatus::Queued,
            })
            .await
            .unwrap();
        assert!(created.started_at.is_none());

        store.mark_running(created.id).await.unwrap();
        store
            .finish(
                created.id,
                &ExecutionResult {
                    status: ExecutionStatus::Success,
                    exit_code: Some(0),
                    output_log: Some("ok".into()),
                    error_message: None,
                    duration_seconds: 2,
                },
            )
            .await
            .unwrap();

        let done = store.find_execution(created.id).await.unwrap().unwrap();
        assert_eq!(done.status, ExecutionStatus::Success);
        assert!(done.started_at.is_some() && done.completed_at.is_some());
        assert_eq!(store.recent_executions(10).await.unwrap().len(), 1);
    }
}
