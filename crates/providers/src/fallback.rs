//! Search fallback: when the local catalog has no match, import matching
//! popular titles from TMDB so the search can be re-run.

use ottradar_core::error::CoreError;
use ottradar_core::store::CatalogStore;

use crate::source::MetadataSource;

/// Titles requested from TMDB per fallback.
pub const FALLBACK_FETCH_LIMIT: usize = 10;

/// Discover pages walked per fallback.
pub const FALLBACK_PAGES: u32 = 1;

pub const FALLBACK_LANGUAGE: &str = "te";
pub const FALLBACK_MIN_POPULARITY: f64 = 5.0;
pub const FALLBACK_MIN_RATING: f64 = 5.0;

/// `source` recorded on movies imported this way.
pub const FALLBACK_SOURCE: &str = "search_fallback";

/// Import discovered titles for `year` whose title contains `query`
/// (case-insensitive) and that clear the popularity and rating floors.
///
/// Titles already in the catalog are skipped. Returns the number inserted.
/// A provider failure imports nothing; store failures propagate, so a
/// concurrent insert of the same title surfaces as [`CoreError::DuplicateMovie`].
pub async fn import_search_matches<S: MetadataSource>(
    source: &S,
    store: &dyn CatalogStore,
    query: &str,
    year: i32,
) -> Result<usize, CoreError> {
    let candidates = match source
        .fetch_new_movies(year, FALLBACK_LANGUAGE, FALLBACK_FETCH_LIMIT, FALLBACK_PAGES)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(provider = "TMDB", query, error = %e, "Search fallback lookup failed");
            return Ok(0);
        }
    };

    let needle = query.to_lowercase();
    let mut inserted = 0;

    for candidate in candidates {
        if candidate.popularity < FALLBACK_MIN_POPULARITY
            || candidate.rating < FALLBACK_MIN_RATING
            || !candidate.title.to_lowercase().contains(&needle)
        {
            continue;
        }
        if store.find_by_tmdb_id(candidate.tmdb_id).await?.is_some() {
            continue;
        }

        let movie = store.insert(candidate.into_new_movie(FALLBACK_SOURCE)).await?;
        tracing::info!(tmdb_id = movie.tmdb_id, title = %movie.title, "Imported movie from search fallback");
        inserted += 1;
    }

    Ok(inserted)
}
