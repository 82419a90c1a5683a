//! Public catalog endpoints: search, listings, detail pages and the
//! suggestion form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, NaiveDateTime};
use ottradar_core::discovery::{Category, Season};
use ottradar_core::error::CoreError;
use ottradar_core::filter::{Direction, MovieFilter, SortKey};
use ottradar_core::movie::{
    completeness_score, latest_availability, ott_links, primary_platforms, quality_score,
    release_status, Movie, OttLink, ReleaseStatus,
};
use ottradar_core::person::Person;
use ottradar_core::search::{slug_to_title, DEFAULT_SEARCH_PER_PAGE, MIN_SEARCH_QUERY_LEN};
use ottradar_core::submission::{NewSubmission, UserSubmission};
use ottradar_core::types::today;
use ottradar_db::repositories::{PersonRepo, SubmissionRepo};
use ottradar_providers::enrichment::MIN_OVERVIEW_LEN;
use ottradar_providers::fallback::import_search_matches;
use ottradar_providers::enrich_movie_metadata;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::{DataResponse, SearchResponse};
use crate::state::{AppState, HOMEPAGE_CACHE_KEY};

/// Similar titles shown under a detail page.
const SIMILAR_LIMIT: usize = 6;

/// Platforms featured in the detail header.
const PRIMARY_PLATFORM_LIMIT: usize = 3;

/// Filmography size on a person page.
const PERSON_MOVIE_LIMIT: usize = 50;

/// TMDB image size for person profiles.
const PROFILE_IMAGE_SIZE: &str = "w185";

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/search?q=&page=&per_page=
///
/// Local title search. Queries under two characters return an empty page.
/// When nothing matches, this year's TMDB titles matching the query are
/// imported and the search runs once more.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.q.as_deref().unwrap_or("").trim();
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_SEARCH_PER_PAGE);

    if q.chars().count() < MIN_SEARCH_QUERY_LEN {
        return Ok(Json(SearchResponse {
            results: Vec::new(),
            total: 0,
            page: page.max(1),
            per_page,
            has_more: false,
        }));
    }

    let mut results = state.search.search_paginated(q, page, per_page).await?;

    if results.total == 0 {
        let imported = import_search_matches(
            state.metadata.as_ref(),
            state.catalog.as_ref(),
            q,
            today().year(),
        )
        .await?;
        if imported > 0 {
            results = state.search.search_paginated(q, page, per_page).await?;
        }
    }

    Ok(Json(SearchResponse {
        results: results.items,
        total: results.total,
        page: results.page,
        per_page: results.per_page,
        has_more: results.has_more,
    }))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/movies/{category}?page=&per_page=
///
/// `trending`, `upcoming`, `new-on-ott`, `free` or `hidden-gems`.
pub async fn list_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let category = Category::from_slug(&slug)
        .ok_or_else(|| CoreError::NoMatch {
            entity: "Category",
            key: slug.clone(),
        })?;
    let (page, per_page) = params.resolve(state.config.movies_per_page);

    let movies = state.discovery.category(category, page, per_page).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/home
///
/// Served from the homepage cache for up to
/// [`HOMEPAGE_CACHE_TTL`](crate::state::HOMEPAGE_CACHE_TTL).
pub async fn homepage(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    if let Some(home) = state.homepage_cache.get(&HOMEPAGE_CACHE_KEY).await {
        return Ok(Json(DataResponse { data: home }));
    }
    let home = state.discovery.homepage().await?;
    state
        .homepage_cache
        .insert(HOMEPAGE_CACHE_KEY, home.clone())
        .await;
    Ok(Json(DataResponse { data: home }))
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    /// Comma-separated language codes.
    pub language: Option<String>,
    /// Comma-separated genres.
    pub genre: Option<String>,
    /// Comma-separated platform names.
    pub platform: Option<String>,
    pub min_rating: Option<f64>,
    pub year: Option<i32>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub dubbed: Option<bool>,
    pub cast: Option<String>,
    /// `popularity` (default), `rating`, `latest`, `oldest` or `random`.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn split_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Translate filter-page parameters into a [`MovieFilter`].
pub fn build_filter(params: &FilterParams) -> AppResult<MovieFilter> {
    let mut filter = MovieFilter::new()
        .by_language(split_list(&params.language))
        .by_genre(split_list(&params.genre))
        .by_platform(split_list(&params.platform));

    if let Some(min) = params.min_rating {
        filter = filter.by_rating(min);
    }
    if let Some(year) = params.year {
        filter = filter.by_year(year);
    }
    if params.year_from.is_some() || params.year_to.is_some() {
        filter = filter.by_year_range(params.year_from, params.year_to);
    }
    if let Some(dubbed) = params.dubbed {
        filter = filter.by_dubbed(dubbed);
    }
    if let Some(cast) = params.cast.as_deref() {
        filter = filter.by_cast(cast);
    }

    filter = match params.sort.as_deref().unwrap_or("popularity") {
        "popularity" => filter.sort_by_popularity(),
        "rating" => filter.sort_by_rating(),
        "latest" => filter.order_by_release_date(true),
        "oldest" => filter.order_by_release_date(false),
        "title" => filter.sort_by(SortKey::Title, Direction::Asc),
        "random" => filter.order_randomly(),
        other => return Err(AppError::InvalidQuery(format!("Unknown sort '{other}'"))),
    };
    Ok(filter)
}

/// GET /api/filter?language=&genre=&platform=&min_rating=&year=&sort=&page=
pub async fn filter_movies(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> AppResult<impl IntoResponse> {
    let filter = build_filter(&params)?;
    let page = filter
        .paginate(
            state.catalog.as_ref(),
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(state.config.movies_per_page),
        )
        .await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Movie detail
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub links: Vec<OttLink>,
    pub primary_platforms: Vec<String>,
    pub release_status: ReleaseStatus,
    pub available_since: Option<NaiveDateTime>,
    pub quality_score: u8,
    pub completeness_score: u8,
    pub similar: Vec<Movie>,
}

/// Whether a detail view should top up the record from the providers.
pub fn needs_enrichment(movie: &Movie) -> bool {
    !movie.has_platforms() || movie.overview_text().trim().chars().count() < MIN_OVERVIEW_LEN
}

/// GET /api/movie/{identifier}
///
/// `identifier` is a TMDB id or a title slug. Records without platforms or
/// with a stub overview are enriched in real time; a failed save still
/// serves the enriched values.
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut movie = state
        .search
        .resolve_identifier(&identifier)
        .await?
        .ok_or_else(|| CoreError::NoMatch {
            entity: "Movie",
            key: identifier.clone(),
        })?;

    if needs_enrichment(&movie) {
        let enriched = enrich_movie_metadata(state.metadata.as_ref(), movie.tmdb_id).await;
        let applied = enriched.apply_to(&mut movie);
        if !applied.is_empty() {
            match state.catalog.update(&movie).await {
                Ok(saved) => movie = saved,
                Err(e) => {
                    tracing::warn!(tmdb_id = movie.tmdb_id, error = %e, "Failed to save enriched movie");
                }
            }
            tracing::info!(tmdb_id = movie.tmdb_id, fields = ?applied, "Enriched movie on view");
        }
    }

    let today = today();
    let similar = state.discovery.popular_except(movie.id, SIMILAR_LIMIT).await?;

    Ok(Json(DataResponse {
        data: MovieDetail {
            links: ott_links(&movie.ott_platforms),
            primary_platforms: primary_platforms(&movie.ott_platforms, PRIMARY_PLATFORM_LIMIT)
                .into_iter()
                .map(|(name, _)| name.to_string())
                .collect(),
            release_status: release_status(&movie, today),
            available_since: latest_availability(&movie),
            quality_score: quality_score(&movie),
            completeness_score: completeness_score(&movie),
            similar,
            movie,
        },
    }))
}

// ---------------------------------------------------------------------------
// Series and people
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SeriesDetail {
    pub series_name: String,
    pub seasons: Vec<Season>,
}

/// GET /api/series
pub async fn list_series(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let series = state.discovery.series_list().await?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /api/series/{name}
///
/// `name` may be the series name or its slug.
pub async fn series_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut series_name = name.trim().to_string();
    let mut seasons = state.discovery.series_episodes(&series_name).await?;
    if seasons.is_empty() && series_name.contains('-') {
        series_name = slug_to_title(&series_name);
        seasons = state.discovery.series_episodes(&series_name).await?;
    }
    if seasons.is_empty() {
        return Err(CoreError::NoMatch {
            entity: "Series",
            key: name,
        }
        .into());
    }

    Ok(Json(DataResponse {
        data: SeriesDetail {
            series_name,
            seasons,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct PersonProfile {
    pub name: String,
    pub profile_url: String,
    pub bio: Option<String>,
    pub known_for_department: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
}

impl From<&Person> for PersonProfile {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            profile_url: person.profile_url(PROFILE_IMAGE_SIZE),
            bio: person.bio().map(str::to_string),
            known_for_department: person.known_for_department.clone(),
            birthday: person.birthday.clone(),
            place_of_birth: person.place_of_birth.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonPage {
    pub person: Option<PersonProfile>,
    pub movies: Vec<Movie>,
}

/// GET /api/person/{name}
///
/// Profile from the person table (when known) plus every active title
/// crediting the name.
pub async fn person_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let name = slug_to_title(name.trim());
    let person: Option<Person> = PersonRepo::find_by_name(&state.pool, &name)
        .await?
        .map(Person::from);
    let movies = state
        .discovery
        .movies_with_cast(&name, PERSON_MOVIE_LIMIT)
        .await?;

    if person.is_none() && movies.is_empty() {
        return Err(CoreError::NoMatch {
            entity: "Person",
            key: name,
        }
        .into());
    }

    Ok(Json(DataResponse {
        data: PersonPage {
            person: person.as_ref().map(PersonProfile::from),
            movies,
        },
    }))
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// POST /api/suggest
///
/// Movie request or feature suggestion from the public form.
pub async fn suggest(
    State(state): State<AppState>,
    Json(input): Json<NewSubmission>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized()?;
    let row = SubmissionRepo::create(&state.pool, &input).await?;
    tracing::info!(submission_id = row.id, title = %row.movie_title, "Suggestion received");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserSubmission::from(row),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use ottradar_core::movie::fixtures::{movie, with_platform};

    use super::*;

    #[test]
    fn enrichment_needed_without_platforms_or_overview() {
        let mut m = with_platform(movie(1, "Pushpa"), "netflix");
        m.overview = Some("A red sandalwood smuggler rises.".into());
        assert!(!needs_enrichment(&m));

        m.overview = Some("Soon".into());
        assert!(needs_enrichment(&m));

        let mut bare = movie(2, "Devara");
        bare.overview = Some("A coastal saga of fear and courage.".into());
        assert!(needs_enrichment(&bare));
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let params = FilterParams {
            sort: Some("loudest".into()),
            ..Default::default()
        };
        assert!(matches!(build_filter(&params), Err(AppError::InvalidQuery(_))));
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(&Some(" netflix, ,aha ".into())),
            vec!["netflix".to_string(), "aha".to_string()]
        );
        assert!(split_list(&None).is_empty());
    }
}
