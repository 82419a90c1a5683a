//! Admin import of a single title by TMDB id.

use ottradar_core::error::CoreError;
use ottradar_core::movie::{Movie, NewMovie};
use ottradar_core::store::CatalogStore;
use serde::Serialize;

use crate::enrichment::EnrichedMetadata;
use crate::error::ProviderError;
use crate::source::MetadataSource;
use crate::tmdb::TmdbMovie;

/// `source` recorded on movies imported this way.
pub const ADMIN_IMPORT_SOURCE: &str = "admin_import";

/// Language assumed when TMDB reports none.
const DEFAULT_LANGUAGE: &str = "te";

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub movie: Movie,
    /// `false` when the title was already catalogued.
    pub created: bool,
}

/// Look `tmdb_id` up locally, else fetch it from TMDB and insert it
/// inactive so it stays hidden until an admin reviews it.
///
/// A title TMDB does not know, or knows without an overview, is a
/// [`CoreError::NoMatch`]. A missing TMDB key is
/// [`CoreError::ProviderUnavailable`].
pub async fn import_by_tmdb_id<S: MetadataSource>(
    source: &S,
    store: &dyn CatalogStore,
    tmdb_id: i64,
) -> Result<ImportOutcome, CoreError> {
    if let Some(movie) = store.find_by_tmdb_id(tmdb_id).await? {
        return Ok(ImportOutcome {
            movie,
            created: false,
        });
    }

    let not_on_tmdb = || CoreError::NoMatch {
        entity: "TMDB movie",
        key: tmdb_id.to_string(),
    };

    let details = source.movie_details(tmdb_id).await.map_err(|e| match e {
        ProviderError::Api { status: 404, .. } => not_on_tmdb(),
        other => other.into(),
    })?;

    let new = imported_movie(tmdb_id, &details, source.region()).ok_or_else(not_on_tmdb)?;
    let movie = store.insert(new).await?;
    tracing::info!(tmdb_id, title = %movie.title, "Imported movie by TMDB id");

    Ok(ImportOutcome {
        movie,
        created: true,
    })
}

/// Insert DTO for an admin import, or `None` when TMDB has no overview.
fn imported_movie(tmdb_id: i64, details: &TmdbMovie, region: &str) -> Option<NewMovie> {
    let primary = EnrichedMetadata::from_primary(details, region);
    let overview = primary.overview?;

    let title = match details.title.trim() {
        "" => format!("Movie {tmdb_id}"),
        title => title.to_string(),
    };

    Some(NewMovie {
        tmdb_id,
        title,
        overview: Some(overview),
        poster: primary.poster,
        release_date: details
            .release_date
            .clone()
            .filter(|d| !d.trim().is_empty()),
        rating: primary.rating.unwrap_or(0.0),
        popularity: details.popularity,
        language: details
            .original_language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        ott_platforms: primary.ott_platforms.unwrap_or_default(),
        youtube_trailer_id: primary.youtube_trailer_id,
        runtime: primary.runtime.unwrap_or(0),
        genres: primary.genres.unwrap_or_default(),
        has_telugu_audio: primary.has_telugu_audio.unwrap_or(false),
        source: ADMIN_IMPORT_SOURCE.to_string(),
        is_active: false,
        ..NewMovie::default()
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use ottradar_core::memory::MemoryStore;
    use ottradar_core::movie::fixtures::movie;
    use serde_json::json;

    use super::*;
    use crate::enrichment::tests::FixtureSource;

    fn details(overview: &str) -> TmdbMovie {
        serde_json::from_value(json!({
            "id": 811367,
            "title": "Devara: Part 1",
            "overview": overview,
            "poster_path": "/devara.jpg",
            "release_date": "2024-09-27",
            "runtime": 177,
            "genres": [{"id": 28, "name": "Action"}],
            "vote_average": 6.6,
            "popularity": 41.0,
            "original_language": "te",
            "watch/providers": {"results": {"IN": {"flatrate": [
                {"provider_id": 8, "provider_name": "Netflix"}
            ]}}}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn new_title_is_inserted_hidden() {
        let store = MemoryStore::new();
        let source = FixtureSource {
            details: Some(details("Devara faces the sea.")),
            ..FixtureSource::default()
        };

        let outcome = import_by_tmdb_id(&source, &store, 811367).await.unwrap();
        assert!(outcome.created);
        assert!(!outcome.movie.is_active);
        assert_eq!(outcome.movie.source, ADMIN_IMPORT_SOURCE);
        assert_eq!(outcome.movie.release_date.as_deref(), Some("2024-09-27"));
        assert!(outcome.movie.ott_platforms.contains_key("netflix"));
        assert!(outcome.movie.has_telugu_audio);

        let stored = store.find_by_tmdb_id(811367).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn catalogued_title_is_returned_without_a_lookup() {
        let existing = movie(3, "Hi Nanna");
        let tmdb_id = existing.tmdb_id;
        let store = MemoryStore::with_movies(vec![existing]);
        let source = FixtureSource::default();

        let outcome = import_by_tmdb_id(&source, &store, tmdb_id).await.unwrap();
        assert!(!outcome.created);
        assert_eq!(outcome.movie.title, "Hi Nanna");
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_overview_is_not_imported() {
        let store = MemoryStore::new();
        let source = FixtureSource {
            details: Some(details("  ")),
            ..FixtureSource::default()
        };

        assert_matches!(
            import_by_tmdb_id(&source, &store, 811367).await,
            Err(CoreError::NoMatch { entity: "TMDB movie", .. })
        );
        assert!(store.find_by_tmdb_id(811367).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn provider_error_is_reported() {
        let store = MemoryStore::new();
        assert_matches!(
            import_by_tmdb_id(&FixtureSource::default(), &store, 811367).await,
            Err(CoreError::ProviderFailed { provider: "TMDB", .. })
        );
    }
}
