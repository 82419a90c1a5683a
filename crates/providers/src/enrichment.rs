//! Metadata enrichment: merge the three providers into one attribute set.
//!
//! Precedence:
//!
//! 1. TMDB supplies platforms, poster, overview, runtime, genres, trailer,
//!    rating and the Telugu-audio flag; release dates supply the OTT date.
//! 2. OMDb (needs an IMDb id and a key) overrides the rating, replaces the
//!    overview only when TMDB's is missing or shorter than
//!    [`MIN_OVERVIEW_LEN`] characters, and adds the certification.
//! 3. Streaming Availability (same gates) replaces the platform map, but
//!    only when it returns at least one service.
//!
//! Every provider call is best effort. Failures are logged and skipped, so
//! the merge always yields a (possibly empty) [`EnrichedMetadata`]. Nothing
//! is persisted here.

use chrono::Utc;
use ottradar_core::error::CoreError;
use ottradar_core::movie::Movie;
use ottradar_core::platforms::PlatformMap;
use ottradar_core::store::CatalogStore;
use ottradar_core::types::DbId;
use serde::Serialize;

use crate::omdb::OmdbTitle;
use crate::source::MetadataSource;
use crate::tmdb::TmdbMovie;

/// Overviews shorter than this are replaced by OMDb's plot.
pub const MIN_OVERVIEW_LEN: usize = 10;

/// Original language that implies a Telugu audio track.
const TELUGU: &str = "te";

/// Attributes gathered for one movie. `None` means no provider had a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ott_platforms: Option<PlatformMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_trailer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_telugu_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ott_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
    /// Cross-reference id used for the OMDb and streaming lookups. Not applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl EnrichedMetadata {
    pub(crate) fn from_primary(movie: &TmdbMovie, region: &str) -> Self {
        let platforms = movie.flatrate_platforms(region);
        let genres = movie.genre_names();
        Self {
            ott_platforms: (!platforms.is_empty()).then_some(platforms),
            poster: movie.poster_url(),
            overview: movie
                .overview
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
            runtime: movie.runtime.filter(|r| *r > 0),
            genres: (!genres.is_empty()).then_some(genres),
            youtube_trailer_id: movie.youtube_trailer_id().map(str::to_string),
            rating: (movie.vote_average > 0.0).then_some(movie.vote_average),
            has_telugu_audio: (movie.original_language.as_deref() == Some(TELUGU)).then_some(true),
            ott_release_date: None,
            certification: None,
            imdb_id: movie.imdb_id().map(str::to_string),
        }
    }

    fn merge_secondary(&mut self, title: &OmdbTitle) {
        if let Some(rating) = title.rating() {
            self.rating = Some(rating);
        }
        if let Some(plot) = title.plot() {
            let too_short = self
                .overview
                .as_deref()
                .is_none_or(|o| o.chars().count() < MIN_OVERVIEW_LEN);
            if too_short {
                self.overview = Some(plot.to_string());
            }
        }
        if let Some(certification) = title.certification() {
            self.certification = Some(certification.to_string());
        }
    }

    /// Whether no provider contributed an applicable attribute.
    pub fn is_empty(&self) -> bool {
        self.ott_platforms.is_none()
            && self.poster.is_none()
            && self.overview.is_none()
            && self.runtime.is_none()
            && self.genres.is_none()
            && self.youtube_trailer_id.is_none()
            && self.rating.is_none()
            && self.has_telugu_audio.is_none()
            && self.ott_release_date.is_none()
            && self.certification.is_none()
    }

    /// Write every present attribute onto `movie`; returns the names of the
    /// fields that were set.
    pub fn apply_to(&self, movie: &mut Movie) -> Vec<&'static str> {
        let mut applied = Vec::new();

        if let Some(platforms) = &self.ott_platforms {
            movie.ott_platforms = platforms.clone();
            applied.push("ott_platforms");
        }
        if let Some(poster) = &self.poster {
            movie.poster = Some(poster.clone());
            applied.push("poster");
        }
        if let Some(overview) = &self.overview {
            movie.overview = Some(overview.clone());
            applied.push("overview");
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
            applied.push("runtime");
        }
        if let Some(genres) = &self.genres {
            movie.genres = genres.clone();
            applied.push("genres");
        }
        if let Some(trailer) = &self.youtube_trailer_id {
            movie.youtube_trailer_id = Some(trailer.clone());
            applied.push("youtube_trailer_id");
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
            applied.push("rating");
        }
        if let Some(flag) = self.has_telugu_audio {
            movie.has_telugu_audio = flag;
            applied.push("has_telugu_audio");
        }
        if let Some(date) = &self.ott_release_date {
            movie.ott_release_date = Some(date.clone());
            applied.push("ott_release_date");
        }
        if let Some(certification) = &self.certification {
            movie.certification = certification.clone();
            applied.push("certification");
        }

        applied
    }
}

/// Query the providers for `tmdb_id` and merge the answers.
///
/// Never fails: a TMDB failure yields an empty result and skips the other
/// providers; later failures keep what was gathered so far.
pub async fn enrich_movie_metadata<S: MetadataSource>(source: &S, tmdb_id: i64) -> EnrichedMetadata {
    let details = match source.movie_details(tmdb_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(provider = "TMDB", tmdb_id, error = %e, "Primary metadata lookup failed");
            return EnrichedMetadata::default();
        }
    };

    let region = source.region();
    let mut merged = EnrichedMetadata::from_primary(&details, region);

    match source.release_dates(tmdb_id).await {
        Ok(dates) => merged.ott_release_date = dates.ott_release_date(region),
        Err(e) => {
            tracing::warn!(provider = "TMDB", tmdb_id, error = %e, "Release date lookup failed");
        }
    }

    let Some(imdb_id) = details.imdb_id() else {
        tracing::debug!(tmdb_id, "No IMDb id; skipping secondary providers");
        return merged;
    };

    if source.has_secondary() {
        match source.secondary_title(imdb_id).await {
            Ok(Some(title)) => merged.merge_secondary(&title),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(provider = "OMDb", tmdb_id, imdb_id, error = %e, "Secondary metadata lookup failed");
            }
        }
    }

    if source.has_tertiary() {
        match source.streaming_availability(imdb_id).await {
            Ok(platforms) if !platforms.is_empty() => merged.ott_platforms = Some(platforms),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    provider = "StreamingAvailability",
                    tmdb_id,
                    imdb_id,
                    error = %e,
                    "Streaming availability lookup failed",
                );
            }
        }
    }

    tracing::info!(tmdb_id, empty = merged.is_empty(), "Metadata enrichment finished");
    merged
}

/// Re-query the providers for each movie and replace its platform map when
/// they report at least one service. Unknown ids and empty answers are
/// skipped. Returns the number of movies updated.
pub async fn refresh_platforms<S: MetadataSource>(
    source: &S,
    store: &dyn CatalogStore,
    ids: &[DbId],
) -> Result<u64, CoreError> {
    let mut refreshed = 0;
    for &id in ids {
        let Some(mut movie) = store.find_by_id(id).await? else {
            continue;
        };
        let Some(platforms) = enrich_movie_metadata(source, movie.tmdb_id).await.ott_platforms else {
            continue;
        };
        movie.ott_platforms = platforms;
        movie.last_checked = Some(Utc::now());
        store.update(&movie).await?;
        refreshed += 1;
    }
    tracing::info!(requested = ids.len(), refreshed, "Platform refresh finished");
    Ok(refreshed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
