use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use ottradar_core::discovery::{Homepage, OttDiscovery};
use ottradar_core::scripting::queue::ScriptQueue;
use ottradar_core::scripting::registry::ScriptRegistry;
use ottradar_core::scripting::subprocess::SubprocessExecutor;
use ottradar_core::search::UnifiedSearch;
use ottradar_core::store::{CatalogStore, ExecutionStore};
use ottradar_providers::HttpMetadataSource;

use crate::config::ServerConfig;

/// How long assembled homepage sections are served before being rebuilt.
pub const HOMEPAGE_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Key of the single homepage entry.
pub const HOMEPAGE_CACHE_KEY: &str = "homepage";

/// Shared application state available to all handlers via axum's `State` extractor.
///
/// The catalog and execution stores are trait objects so the same router
/// serves PostgreSQL in production and the in-memory store in tests. The
/// pool backs the back-office tables that have no store trait.
#[derive(Clone)]
pub struct AppState {
    pub pool: ottradar_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub catalog: Arc<dyn CatalogStore>,
    pub discovery: OttDiscovery,
    pub search: UnifiedSearch,
    pub metadata: Arc<HttpMetadataSource>,
    pub scripts: ScriptQueue<SubprocessExecutor>,
    /// Cleared by the admin cache endpoint.
    pub homepage_cache: Cache<&'static str, Homepage>,
}

impl AppState {
    pub fn new(
        pool: ottradar_db::DbPool,
        config: ServerConfig,
        catalog: Arc<dyn CatalogStore>,
        executions: Arc<dyn ExecutionStore>,
        metadata: HttpMetadataSource,
    ) -> Self {
        let scripts = ScriptQueue::new(
            ScriptRegistry::standard(&config.python_bin),
            SubprocessExecutor,
            executions,
        )
        .with_timeout(Duration::from_secs(config.script_timeout_secs))
        .with_working_directory(config.scripts_workdir.clone());

        Self {
            pool,
            config: Arc::new(config),
            discovery: OttDiscovery::new(Arc::clone(&catalog)),
            search: UnifiedSearch::new(Arc::clone(&catalog)),
            catalog,
            metadata: Arc::new(metadata),
            scripts,
            homepage_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(HOMEPAGE_CACHE_TTL)
                .build(),
        }
    }
}
