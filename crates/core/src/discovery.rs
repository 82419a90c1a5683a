//! Named discovery queries over the catalog.
//!
//! Every policy is a read-only query with a fixed heuristic. Empty results
//! are an empty list, never an error; only store failures propagate.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;
use crate::filter::{Direction, MovieFilter, Page, Predicate, SortKey};
use crate::movie::{MediaType, Movie};
use crate::platforms::KNOWN_PLATFORMS;
use crate::store::CatalogStore;
use crate::types::{date_string, today, DbId};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_DISCOVERY_LIMIT: usize = 50;

pub const DEFAULT_NEW_ON_OTT_DAYS: u32 = 60;

pub const DEFAULT_TRENDING_DAYS: u32 = 365;

pub const TRENDING_MIN_RATING: f64 = 6.0;

pub const HIDDEN_GEM_MIN_RATING: f64 = 7.0;

/// Hidden gems sit strictly inside this popularity band.
pub const HIDDEN_GEM_POPULARITY: (f64, f64) = (5.0, 100.0);

/// Rating floor for the paginated "top rated" category.
pub const TOP_RATED_MIN_RATING: f64 = 6.5;

/// Result ceiling used when a category is paginated in memory.
const CATEGORY_POOL: usize = 500;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Platform coverage across the active catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub total_movies: u64,
    pub with_ott: u64,
    pub coverage_percent: f64,
    /// Known platform → number of active movies on it. Zero counts are omitted.
    pub platforms: BTreeMap<String, u64>,
}

/// Sections rendered on the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct Homepage {
    pub featured: Vec<Movie>,
    pub continue_watching: Vec<Movie>,
    pub popular_on_radar: Vec<Movie>,
    pub new_on_ott: Vec<Movie>,
    pub hidden_gems: Vec<Movie>,
    pub free_picks: Vec<Movie>,
    pub stats: PlatformStats,
}

/// One season of a series, episodes in order.
#[derive(Debug, Clone, Serialize)]
pub struct Season {
    pub season_number: i32,
    pub episodes: Vec<Movie>,
}

/// A series as listed on the series index.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub series_name: String,
    pub total_episodes: u64,
    pub poster: Option<String>,
    pub rating: f64,
    #[serde(skip)]
    popularity: f64,
}

/// Paginated listing slugs served by the category endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trending,
    Upcoming,
    NewOnOtt,
    Free,
    HiddenGems,
}

impl Category {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "trending" => Some(Self::Trending),
            "upcoming" => Some(Self::Upcoming),
            "new-on-ott" => Some(Self::NewOnOtt),
            "free" => Some(Self::Free),
            "hidden-gems" => Some(Self::HiddenGems),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Discovery queries bound to a catalog.
#[derive(Clone)]
pub struct OttDiscovery {
    store: Arc<dyn CatalogStore>,
    as_of: Option<NaiveDate>,
}

impl OttDiscovery {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store, as_of: None }
    }

    /// Pin "today" to a fixed date.
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(today)
    }

    fn days_ago(&self, days: u32) -> String {
        date_string(self.today() - Duration::days(i64::from(days)))
    }

    fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Movies whose OTT release falls within the last `days` days (inclusive)
    /// and that list at least one platform, newest first.
    pub async fn new_on_ott(&self, days: u32, limit: usize) -> Result<Vec<Movie>, CoreError> {
        MovieFilter::new()
            .filter(Predicate::OttReleaseBetween {
                from: self.days_ago(days),
                to: date_string(self.today()),
            })
            .with_ott()
            .sort_by(SortKey::OttReleaseDate, Direction::Desc)
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Movies available on at least one free platform, most popular first.
    pub async fn free_movies(&self, limit: usize) -> Result<Vec<Movie>, CoreError> {
        MovieFilter::new()
            .filter(Predicate::FreePlatform)
            .sort_by_popularity()
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Well-rated movies with modest popularity, in a fresh random order per call.
    pub async fn hidden_gems(&self, limit: usize, min_rating: f64) -> Result<Vec<Movie>, CoreError> {
        let (low, high) = HIDDEN_GEM_POPULARITY;
        MovieFilter::new()
            .by_rating(min_rating)
            .filter(Predicate::PopularityAbove(low))
            .filter(Predicate::PopularityBelow(high))
            .order_randomly()
            .limit(limit)
            .all(self.store())
            .await
    }

    /// Rated at least [`TRENDING_MIN_RATING`] with an OTT or theatrical release
    /// on or after the start of the window, most popular first.
    pub async fn trending_now(&self, limit: usize, days: u32) -> Result<Vec<Movie>, CoreError> {
        let cutoff = self.days_ago(days);
        MovieFilter::new()
            .by_rating(TRENDING_MIN_RATING)
            .filter(Predicate::Any(vec![
                Predicate::OttReleaseFrom(cutoff.clone()),
                Predicate::ReleaseFrom(cutoff),
            ]))
            .sort_by_popularity()
            .limit(limit)
            .all(self.store())
            .await
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats, CoreError> {
        let total_movies = MovieFilter::new().count(self.store()).await?;
        let with_ott = MovieFilter::new().with_ott().count(self.store()).await?;

        let mut platforms = BTreeMap::new();
        for platform in KNOWN_PLATFORMS {
            let count = MovieFilter::new()
                .by_platform(*platform)
                .count(self.store())
                .await?;
            if count > 0 {
                platforms.insert((*platform).to_string(), count);
            }
        }

        let coverage_percent = if total_movies > 0 {
            with_ott as f64 / total_movies as f64 * 100.0
        } else {
            0.0
        };

        Ok(PlatformStats {
            total_movies,
            with_ott,
            coverage_percent,
            platforms,
        })
    }

    pub async fn homepage(&self) -> Result<Homepage, CoreError> {
        let (featured, continue_watching, popular_on_radar, new_on_ott, hidden_gems, free_picks, stats) =
            futures::try_join!(
                self.trending_now(8, DEFAULT_TRENDING_DAYS),
                self.trending_now(6, DEFAULT_TRENDING_DAYS),
                self.trending_now(12, DEFAULT_TRENDING_DAYS),
                self.new_on_ott(30, 12),
                self.hidden_gems(12, HIDDEN_GEM_MIN_RATING),
                self.free_movies(8),
                self.platform_stats(),
            )?;

        Ok(Homepage {
            featured,
            continue_watching,
            popular_on_radar,
            new_on_ott,
            hidden_gems,
            free_picks,
            stats,
        })
    }

    /// Theatrical releases strictly after today, soonest first.
    pub async fn upcoming(&self, page: u32, per_page: u32) -> Result<Page<Movie>, CoreError> {
        MovieFilter::new()
            .filter(Predicate::ReleaseAfter(date_string(self.today())))
            .order_by_release_date(false)
            .paginate(self.store(), page, per_page)
            .await
    }

    /// Rated at least [`TOP_RATED_MIN_RATING`], most popular first.
    pub async fn top_rated_page(&self, page: u32, per_page: u32) -> Result<Page<Movie>, CoreError> {
        MovieFilter::new()
            .by_rating(TOP_RATED_MIN_RATING)
            .sort_by_popularity()
            .paginate(self.store(), page, per_page)
            .await
    }

    /// One page of a listing category.
    ///
    /// `trending` and `upcoming` paginate in the store; the others paginate a
    /// bounded pool in memory.
    pub async fn category(
        &self,
        category: Category,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Movie>, CoreError> {
        match category {
            Category::Trending => self.top_rated_page(page, per_page).await,
            Category::Upcoming => self.upcoming(page, per_page).await,
            Category::NewOnOtt => {
                let today = self.today();
                let released: Vec<Movie> = self
                    .new_on_ott(30, CATEGORY_POOL)
                    .await?
                    .into_iter()
                    .filter(|m| crate::movie::is_released(m, today))
                    .collect();
                Ok(Page::from_vec(released, page, per_page))
            }
            Category::Free => Ok(Page::from_vec(
                self.free_movies(CATEGORY_POOL).await?,
                page,
                per_page,
            )),
            Category::HiddenGems => Ok(Page::from_vec(
                self.hidden_gems(CATEGORY_POOL, HIDDEN_GEM_MIN_RATING).await?,
                page,
                per_page,
            )),
        }
    }

    /// Active episodes of a series grouped by season (missing season = 1).
    pub async fn series_episodes(&self, series_name: &str) -> Result<Vec<Season>, CoreError> {
        let episodes = MovieFilter::new()
            .filter(Predicate::SeriesName(series_name.trim().to_string()))
            .sort_by(SortKey::SeasonNumber, Direction::Asc)
            .sort_by(SortKey::EpisodeNumber, Direction::Asc)
            .all(self.store())
            .await?;

        let mut seasons: BTreeMap<i32, Vec<Movie>> = BTreeMap::new();
        for episode in episodes {
            seasons
                .entry(episode.season_number.unwrap_or(1))
                .or_default()
                .push(episode);
        }

        Ok(seasons
            .into_iter()
            .map(|(season_number, episodes)| Season {
                season_number,
                episodes,
            })
            .collect())
    }

    /// Series index: TV entries grouped by series name, most popular series first.
    pub async fn series_list(&self) -> Result<Vec<SeriesSummary>, CoreError> {
        let episodes = MovieFilter::new()
            .filter(Predicate::MediaType(MediaType::Tv))
            .all(self.store())
            .await?;

        let mut by_name: BTreeMap<String, SeriesSummary> = BTreeMap::new();
        for ep in episodes {
            let Some(name) = ep.series_name.clone().filter(|n| !n.trim().is_empty()) else {
                continue;
            };
            let entry = by_name.entry(name.clone()).or_insert_with(|| SeriesSummary {
                series_name: name,
                total_episodes: 0,
                poster: None,
                rating: 0.0,
                popularity: f64::MIN,
            });
            entry.total_episodes += 1;
            entry.rating = entry.rating.max(ep.rating);
            entry.popularity = entry.popularity.max(ep.popularity);
            if entry.poster.is_none() {
                entry.poster = ep.poster;
            }
        }

        let mut list: Vec<SeriesSummary> = by_name.into_values().collect();
        list.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        Ok(list)
    }

    /// Active movies crediting `name` in the cast, most popular first.
    pub async fn movies_with_cast(&self, name: &str, limit: usize) -> Result<Vec<Movie>, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        MovieFilter::new()
            .by_cast(name)
            .sort_by_popularity()
            .limit(limit)
            .all(self.store())
            .await
    }

    /// The most popular active movies other than `exclude_id`.
    pub async fn popular_except(&self, exclude_id: DbId, limit: usize) -> Result<Vec<Movie>, CoreError> {
        let movies = MovieFilter::new()
            .sort_by_popularity()
            .limit(limit + 1)
            .all(self.store())
            .await?;
        Ok(movies
            .into_iter()
            .filter(|m| m.id != exclude_id)
            .take(limit)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
