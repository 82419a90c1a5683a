//! Typed catalog predicates and the fluent [`MovieFilter`] builder.
//!
//! A [`MovieQuery`] is a conjunction of [`Predicate`]s plus ordering and
//! windowing. The same query is evaluated in memory ([`MovieQuery::matches`],
//! [`sort_movies`]) and rendered to SQL by the database crate, so both
//! catalog backends agree on semantics.
//!
//! Text predicates are case-insensitive substring matches. Date predicates
//! compare `YYYY-MM-DD` strings lexicographically; a missing or empty date
//! never satisfies a date predicate. Platform predicates inspect the parsed
//! platform map keys, never serialized JSON.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::CoreError;
use crate::movie::{MediaType, Movie};
use crate::platforms::{is_free_platform, normalize_platform_key};
use crate::store::CatalogStore;
use crate::types::DateString;

/// Default page size for catalog listings.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A single constraint over a [`Movie`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `is_active = true`.
    Active,
    LanguageContains(String),
    GenreContains(String),
    TitleContains(String),
    /// Case-insensitive whole-title equality.
    TitleEquals(String),
    CastContains(String),
    /// Some platform key contains the name (both normalized).
    PlatformContains(String),
    /// Some platform key equals the name (both normalized).
    PlatformIs(String),
    /// Some platform key names a free platform.
    FreePlatform,
    /// The platform map is non-empty.
    HasPlatforms,
    /// A non-blank poster URL is set.
    HasPoster,
    MinRating(f64),
    /// Popularity strictly greater than the value.
    PopularityAbove(f64),
    /// Popularity strictly less than the value.
    PopularityBelow(f64),
    /// Theatrical release on or after the date.
    ReleaseFrom(DateString),
    /// Theatrical release on or before the date.
    ReleaseTo(DateString),
    /// Theatrical release strictly after the date.
    ReleaseAfter(DateString),
    /// Theatrical release date starts with the year.
    ReleaseYear(i32),
    /// OTT release on or after the date.
    OttReleaseFrom(DateString),
    /// OTT release within `[from, to]`.
    OttReleaseBetween { from: DateString, to: DateString },
    Dubbed(bool),
    MediaType(MediaType),
    /// Case-insensitive series name equality.
    SeriesName(String),
    TmdbId(i64),
    /// Matches when any inner predicate matches.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate this predicate against a movie.
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            Self::Active => movie.is_active,
            Self::LanguageContains(needle) => contains_ci(&movie.language, needle),
            Self::GenreContains(needle) => contains_ci(&movie.genres, needle),
            Self::TitleContains(needle) => contains_ci(&movie.title, needle),
            Self::TitleEquals(title) => movie.title.to_lowercase() == title.to_lowercase(),
            Self::CastContains(needle) => contains_ci(&movie.cast, needle),
            Self::PlatformContains(name) => {
                let name = normalize_platform_key(name);
                movie
                    .ott_platforms
                    .keys()
                    .any(|key| normalize_platform_key(key).contains(&name))
            }
            Self::PlatformIs(name) => {
                let name = normalize_platform_key(name);
                movie
                    .ott_platforms
                    .keys()
                    .any(|key| normalize_platform_key(key) == name)
            }
            Self::FreePlatform => movie.ott_platforms.keys().any(|k| is_free_platform(k)),
            Self::HasPlatforms => movie.has_platforms(),
            Self::HasPoster => movie.poster.as_deref().is_some_and(|p| !p.trim().is_empty()),
            Self::MinRating(min) => movie.rating >= *min,
            Self::PopularityAbove(v) => movie.popularity > *v,
            Self::PopularityBelow(v) => movie.popularity < *v,
            Self::ReleaseFrom(d) => date_of(&movie.release_date).is_some_and(|r| r >= d.as_str()),
            Self::ReleaseTo(d) => date_of(&movie.release_date).is_some_and(|r| r <= d.as_str()),
            Self::ReleaseAfter(d) => date_of(&movie.release_date).is_some_and(|r| r > d.as_str()),
            Self::ReleaseYear(year) => {
                date_of(&movie.release_date).is_some_and(|r| r.starts_with(&year.to_string()))
            }
            Self::OttReleaseFrom(d) => {
                date_of(&movie.ott_release_date).is_some_and(|r| r >= d.as_str())
            }
            Self::OttReleaseBetween { from, to } => date_of(&movie.ott_release_date)
                .is_some_and(|r| r >= from.as_str() && r <= to.as_str()),
            Self::Dubbed(flag) => movie.is_dubbed == *flag,
            Self::MediaType(media_type) => movie.media_type == *media_type,
            Self::SeriesName(name) => movie
                .series_name
                .as_deref()
                .is_some_and(|s| s.to_lowercase() == name.to_lowercase()),
            Self::TmdbId(id) => movie.tmdb_id == *id,
            Self::Any(inner) => inner.iter().any(|p| p.matches(movie)),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A stored date, treating empty strings as absent.
fn date_of(value: &Option<DateString>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|d| !d.is_empty())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Popularity,
    Rating,
    ReleaseDate,
    OttReleaseDate,
    SeasonNumber,
    EpisodeNumber,
    Title,
    /// Fresh random order on every evaluation; other keys are ignored.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Order `movies` by the given keys, then by id. Missing values sort last in
/// either direction. [`SortKey::Random`] is skipped here; the store shuffles.
pub fn sort_movies(movies: &mut [Movie], sort: &[(SortKey, Direction)]) {
    movies.sort_by(|a, b| {
        sort.iter()
            .map(|(key, dir)| compare_by(a, b, *key, *dir))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    });
}

fn compare_by(a: &Movie, b: &Movie, key: SortKey, dir: Direction) -> Ordering {
    let directed = |o: Ordering| match dir {
        Direction::Asc => o,
        Direction::Desc => o.reverse(),
    };
    match key {
        SortKey::Popularity => directed(a.popularity.total_cmp(&b.popularity)),
        SortKey::Rating => directed(a.rating.total_cmp(&b.rating)),
        SortKey::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortKey::ReleaseDate => {
            nulls_last(date_of(&a.release_date), date_of(&b.release_date), directed)
        }
        SortKey::OttReleaseDate => nulls_last(
            date_of(&a.ott_release_date),
            date_of(&b.ott_release_date),
            directed,
        ),
        SortKey::SeasonNumber => nulls_last(a.season_number, b.season_number, directed),
        SortKey::EpisodeNumber => nulls_last(a.episode_number, b.episode_number, directed),
        SortKey::Random => Ordering::Equal,
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, directed: impl Fn(Ordering) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A conjunction of predicates with ordering and an optional window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    pub predicates: Vec<Predicate>,
    pub sort: Vec<(SortKey, Direction)>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl MovieQuery {
    /// Whether every predicate holds for `movie`.
    pub fn matches(&self, movie: &Movie) -> bool {
        self.predicates.iter().all(|p| p.matches(movie))
    }

    pub fn is_random(&self) -> bool {
        self.sort.iter().any(|(key, _)| *key == SortKey::Random)
    }
}

// ---------------------------------------------------------------------------
// Scalar-or-collection arguments
// ---------------------------------------------------------------------------

/// A filter argument given either as one value or as a list of alternatives.
#[derive(Debug, Clone)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Non-blank trimmed terms.
    fn into_terms(self) -> Vec<String> {
        let raw = match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        };
        raw.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl From<&str> for OneOrMany {
    fn from(v: &str) -> Self {
        Self::One(v.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(v: String) -> Self {
        Self::One(v)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for OneOrMany {
    fn from(v: &[&str]) -> Self {
        Self::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let pages = total.div_ceil(u64::from(per_page)) as u32;
        Self {
            items,
            total,
            page,
            per_page,
            pages,
            has_more: u64::from(page) * u64::from(per_page) < total,
        }
    }

    /// Paginate an already materialized list.
    pub fn from_vec(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let (page, per_page) = clamp_page(page, per_page);
        let total = all.len() as u64;
        let start = page_offset(page, per_page);
        let items = all
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Self::new(items, total, page, per_page)
    }

    pub fn empty(page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), 0, page, per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
            has_more: self.has_more,
        }
    }
}

/// Clamp a requested page to at least 1 and a page size to `1..=MAX_PER_PAGE`.
pub fn clamp_page(page: u32, per_page: u32) -> (u32, u32) {
    (page.max(1), per_page.clamp(1, MAX_PER_PAGE))
}

fn page_offset(page: u32, per_page: u32) -> usize {
    (page.saturating_sub(1) as usize) * per_page as usize
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder over the active part of the catalog.
///
/// Calls are AND-combined. Methods taking a [`OneOrMany`] OR-combine the
/// entries of a list; blank entries are ignored and an all-blank argument
/// adds no constraint.
///
/// ```ignore
/// let page = MovieFilter::new()
///     .by_language("te")
///     .by_platform(vec!["netflix", "aha"])
///     .by_rating(7.0)
///     .sort_by_popularity()
///     .paginate(store, 2, 20)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct MovieFilter {
    query: MovieQuery,
}

impl Default for MovieFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieFilter {
    /// Start from all active movies.
    pub fn new() -> Self {
        Self {
            query: MovieQuery {
                predicates: vec![Predicate::Active],
                ..MovieQuery::default()
            },
        }
    }

    /// Add an arbitrary predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.query.predicates.push(predicate);
        self
    }

    fn any_of(self, value: OneOrMany, make: fn(String) -> Predicate) -> Self {
        let mut terms: Vec<Predicate> = value.into_terms().into_iter().map(make).collect();
        match terms.len() {
            0 => self,
            1 => self.filter(terms.remove(0)),
            _ => self.filter(Predicate::Any(terms)),
        }
    }

    pub fn by_language(self, language: impl Into<OneOrMany>) -> Self {
        self.any_of(language.into(), Predicate::LanguageContains)
    }

    pub fn by_genre(self, genre: impl Into<OneOrMany>) -> Self {
        self.any_of(genre.into(), Predicate::GenreContains)
    }

    /// Platform names are matched against map keys, ignoring case and punctuation.
    pub fn by_platform(self, platform: impl Into<OneOrMany>) -> Self {
        self.any_of(platform.into(), Predicate::PlatformContains)
    }

    /// Keep movies rated at least `min`.
    pub fn by_rating(self, min: f64) -> Self {
        self.filter(Predicate::MinRating(min))
    }

    /// Inclusive year bounds on the theatrical release date; each bound is optional.
    pub fn by_year_range(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        if let Some(from) = from {
            self = self.filter(Predicate::ReleaseFrom(format!("{from:04}-01-01")));
        }
        if let Some(to) = to {
            self = self.filter(Predicate::ReleaseTo(format!("{to:04}-12-31")));
        }
        self
    }

    pub fn by_year(self, year: i32) -> Self {
        self.filter(Predicate::ReleaseYear(year))
    }

    pub fn by_dubbed(self, dubbed: bool) -> Self {
        self.filter(Predicate::Dubbed(dubbed))
    }

    pub fn by_cast(self, name: impl Into<OneOrMany>) -> Self {
        self.any_of(name.into(), Predicate::CastContains)
    }

    /// Keep movies available on at least one platform.
    pub fn with_ott(self) -> Self {
        self.filter(Predicate::HasPlatforms)
    }

    pub fn sort_by(mut self, key: SortKey, direction: Direction) -> Self {
        self.query.sort.push((key, direction));
        self
    }

    pub fn sort_by_rating(self) -> Self {
        self.sort_by(SortKey::Rating, Direction::Desc)
    }

    pub fn sort_by_popularity(self) -> Self {
        self.sort_by(SortKey::Popularity, Direction::Desc)
    }

    pub fn order_by_release_date(self, desc: bool) -> Self {
        let dir = if desc { Direction::Desc } else { Direction::Asc };
        self.sort_by(SortKey::ReleaseDate, dir)
    }

    pub fn order_randomly(self) -> Self {
        self.sort_by(SortKey::Random, Direction::Asc)
    }

    /// Cap the number of rows returned by [`all`](Self::all).
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn query(&self) -> &MovieQuery {
        &self.query
    }

    pub fn into_query(self) -> MovieQuery {
        self.query
    }

    // ---- terminals ----

    /// Every match (capped by [`limit`](Self::limit) when set).
    pub async fn all(&self, store: &dyn CatalogStore) -> Result<Vec<Movie>, CoreError> {
        store.query(&self.query).await
    }

    pub async fn first(&self, store: &dyn CatalogStore) -> Result<Option<Movie>, CoreError> {
        let mut query = self.query.clone();
        query.limit = Some(1);
        Ok(store.query(&query).await?.into_iter().next())
    }

    pub async fn count(&self, store: &dyn CatalogStore) -> Result<u64, CoreError> {
        store.count(&self.query.predicates).await
    }

    /// One page of matches. Any [`limit`](Self::limit) is replaced by the page
    /// window; pages past the end are empty.
    pub async fn paginate(
        &self,
        store: &dyn CatalogStore,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Movie>, CoreError> {
        let (page, per_page) = clamp_page(page, per_page);
        let total = store.count(&self.query.predicates).await?;

        let offset = page_offset(page, per_page);
        if offset as u64 >= total {
            return Ok(Page::new(Vec::new(), total, page, per_page));
        }

        let mut query = self.query.clone();
        query.limit = Some(per_page as usize);
        query.offset = offset;
        let items = store.query(&query).await?;
        Ok(Page::new(items, total, page, per_page))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::movie::fixtures::{movie, with_platform};

    fn catalog() -> MemoryStore {
        let mut a = with_platform(movie(1, "Salaar"), "netflix");
        a.language = "te".into();
        a.genres = "Action, Thriller".into();
        a.rating = 7.5;
        a.popularity = 80.0;
        a.release_date = Some("2023-12-22".into());

        let mut b = with_platform(movie(2, "Hi Nanna"), "Amazon Prime");
        b.language = "te".into();
        b.genres = "Drama, Romance".into();
        b.rating = 8.1;
        b.popularity = 40.0;
        b.release_date = Some("2023-12-07".into());
        b.is_dubbed = true;

        let mut c = movie(3, "Jawan");
        c.language = "hi".into();
        c.genres = "Action".into();
        c.rating = 6.9;
        c.popularity = 120.0;
        c.release_date = Some("2023-09-07".into());

        let mut d = with_platform(movie(4, "Hidden Old"), "aha");
        d.language = "te".into();
        d.rating = 9.0;
        d.release_date = Some("2021-01-01".into());
        d.is_active = false;

        MemoryStore::with_movies(vec![a, b, c, d])
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    // -- predicates ----------------------------------------------------------

    #[tokio::test]
    async fn new_filter_only_returns_active() {
        let store = catalog();
        let all = MovieFilter::new().all(&store).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|m| m.is_active));
    }

    #[tokio::test]
    async fn scalar_language_filter() {
        let store = catalog();
        let got = MovieFilter::new().by_language("TE").all(&store).await.unwrap();
        assert_eq!(titles(&got), vec!["Salaar", "Hi Nanna"]);
    }

    #[tokio::test]
    async fn collection_is_or_combined() {
        let store = catalog();
        let got = MovieFilter::new()
            .by_genre(vec!["romance", "thriller"])
            .all(&store)
            .await
            .unwrap();
        assert_eq!(titles(&got), vec!["Salaar", "Hi Nanna"]);
    }

    #[tokio::test]
    async fn chained_calls_are_and_combined() {
        let store = catalog();
        let got = MovieFilter::new()
            .by_genre("action")
            .by_language("te")
            .all(&store)
            .await
            .unwrap();
        assert_eq!(titles(&got), vec!["Salaar"]);
    }

    #[tokio::test]
    async fn blank_arguments_add_no_constraint() {
        let store = catalog();
        let count = MovieFilter::new()
            .by_language("  ")
            .by_genre(Vec::<String>::new())
            .by_platform(vec!["", " "])
            .count(&store)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn platform_filter_matches_normalized_keys() {
        let store = catalog();
        let got = MovieFilter::new().by_platform("prime").all(&store).await.unwrap();
        assert_eq!(titles(&got), vec!["Hi Nanna"]);

        let none = MovieFilter::new().by_platform("url").count(&store).await.unwrap();
        assert_eq!(none, 0, "values inside entries must not match");
    }

    #[tokio::test]
    async fn rating_is_inclusive_minimum() {
        let store = catalog();
        let got = MovieFilter::new().by_rating(7.5).all(&store).await.unwrap();
        assert_eq!(titles(&got), vec!["Salaar", "Hi Nanna"]);
    }

    #[tokio::test]
    async fn year_range_is_inclusive_and_optional() {
        let store = catalog();
        let both = MovieFilter::new()
            .by_year_range(Some(2023), Some(2023))
            .count(&store)
            .await
            .unwrap();
        assert_eq!(both, 3);

        let to_only = MovieFilter::new()
            .by_year_range(None, Some(2022))
            .count(&store)
            .await
            .unwrap();
        assert_eq!(to_only, 0);

        let from_only = MovieFilter::new()
            .by_year_range(Some(2023), None)
            .filter(Predicate::ReleaseFrom("2023-12-01".into()))
            .count(&store)
            .await
            .unwrap();
        assert_eq!(from_only, 2);
    }

    #[tokio::test]
    async fn dubbed_and_with_ott() {
        let store = catalog();
        let dubbed = MovieFilter::new().by_dubbed(true).all(&store).await.unwrap();
        assert_eq!(titles(&dubbed), vec!["Hi Nanna"]);
        let with_ott = MovieFilter::new().with_ott().count(&store).await.unwrap();
        assert_eq!(with_ott, 2);
    }

    #[tokio::test]
    async fn removing_a_predicate_never_shrinks_results() {
        let store = catalog();
        let narrow = MovieFilter::new()
            .by_language("te")
            .by_rating(8.0)
            .count(&store)
            .await
            .unwrap();
        let wider = MovieFilter::new().by_language("te").count(&store).await.unwrap();
        let widest = MovieFilter::new().count(&store).await.unwrap();
        assert!(narrow <= wider && wider <= widest);
    }

    // -- ordering and terminals ----------------------------------------------

    #[tokio::test]
    async fn sorts_and_first() {
        let store = catalog();
        let by_pop = MovieFilter::new().sort_by_popularity().all(&store).await.unwrap();
        assert_eq!(titles(&by_pop), vec!["Jawan", "Salaar", "Hi Nanna"]);

        let best = MovieFilter::new().sort_by_rating().first(&store).await.unwrap();
        assert_eq!(best.unwrap().title, "Hi Nanna");

        let oldest = MovieFilter::new()
            .order_by_release_date(false)
            .limit(1)
            .all(&store)
            .await
            .unwrap();
        assert_eq!(titles(&oldest), vec!["Jawan"]);
    }

    #[tokio::test]
    async fn first_on_empty_result_is_none() {
        let store = catalog();
        let none = MovieFilter::new().by_language("ta").first(&store).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn paginate_reports_total_and_has_more() {
        let store = catalog();
        let page = MovieFilter::new()
            .sort_by_popularity()
            .paginate(&store, 1, 2)
            .await
            .unwrap();
        assert_eq!(titles(&page.items), vec!["Jawan", "Salaar"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert!(page.has_more);

        let last = MovieFilter::new()
            .sort_by_popularity()
            .paginate(&store, 2, 2)
            .await
            .unwrap();
        assert_eq!(titles(&last.items), vec!["Hi Nanna"]);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn out_of_range_page_is_empty_not_error() {
        let store = catalog();
        let page = MovieFilter::new().paginate(&store, 9, 20).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn page_zero_is_clamped_to_first_page() {
        let store = catalog();
        let page = MovieFilter::new().paginate(&store, 0, 2).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
    }

    // -- pure helpers --------------------------------------------------------

    #[test]
    fn missing_dates_never_match_date_predicates() {
        let mut m = movie(1, "No Date");
        m.release_date = Some(String::new());
        assert!(!Predicate::ReleaseFrom("2000-01-01".into()).matches(&m));
        assert!(!Predicate::ReleaseTo("2999-01-01".into()).matches(&m));
        assert!(!Predicate::OttReleaseFrom("2000-01-01".into()).matches(&m));
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let mut a = movie(1, "A");
        a.release_date = Some("2024-01-01".into());
        let b = movie(2, "B");
        let mut c = movie(3, "C");
        c.release_date = Some("2023-01-01".into());

        let mut asc = vec![b.clone(), a.clone(), c.clone()];
        sort_movies(&mut asc, &[(SortKey::ReleaseDate, Direction::Asc)]);
        assert_eq!(titles(&asc), vec!["C", "A", "B"]);

        let mut desc = vec![b, c, a];
        sort_movies(&mut desc, &[(SortKey::ReleaseDate, Direction::Desc)]);
        assert_eq!(titles(&desc), vec!["A", "C", "B"]);
    }

    #[test]
    fn page_from_vec_windows() {
        let page = Page::from_vec((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert!(!page.has_more);
        assert!(Page::from_vec(vec![1, 2], 5, 10).items.is_empty());
    }
}
