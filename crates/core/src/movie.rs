//! The catalog entity and the pure scoring/link helpers derived from it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::platforms::{
    parse_availability_date, platform_priority, PlatformAvailability, PlatformMap,
};
use crate::types::{DateString, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Media type
// ---------------------------------------------------------------------------

/// Whether a catalog entry is a film or an episode/part of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    /// Lenient parse used when reading stored rows; unknown values are movies.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("tv") {
            Self::Tv
        } else {
            Self::Movie
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: DbId,
    pub tmdb_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub overview: Option<String>,
    /// Theatrical release, `YYYY-MM-DD`.
    pub release_date: Option<DateString>,
    /// Streaming release, `YYYY-MM-DD`.
    pub ott_release_date: Option<DateString>,
    pub rating: f64,
    pub language: String,
    pub ott_platforms: PlatformMap,
    pub trailer: Option<String>,
    pub youtube_trailer_id: Option<String>,
    pub runtime: i32,
    /// Comma-separated genre names.
    pub genres: String,
    /// Comma-separated cast names.
    pub cast: String,
    pub certification: String,
    pub popularity: f64,
    pub is_active: bool,
    pub fetch_source: String,
    pub is_dubbed: bool,
    pub has_telugu_audio: bool,
    pub status: String,
    pub source: String,
    pub media_type: MediaType,
    pub series_name: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_count: Option<i32>,
    pub last_updated: Timestamp,
    pub last_checked: Option<Timestamp>,
    pub last_verified: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Movie {
    pub fn has_platforms(&self) -> bool {
        !self.ott_platforms.is_empty()
    }

    /// Overview text, or empty when absent.
    pub fn overview_text(&self) -> &str {
        self.overview.as_deref().unwrap_or("")
    }
}

/// Insert DTO for a new catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<DateString>,
    pub ott_release_date: Option<DateString>,
    pub rating: f64,
    pub language: String,
    pub ott_platforms: PlatformMap,
    pub trailer: Option<String>,
    pub youtube_trailer_id: Option<String>,
    pub runtime: i32,
    pub genres: String,
    pub cast: String,
    pub certification: String,
    pub popularity: f64,
    pub fetch_source: String,
    pub source: String,
    pub is_dubbed: bool,
    pub has_telugu_audio: bool,
    pub media_type: MediaType,
    pub series_name: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_count: Option<i32>,
    /// Admin imports land hidden until reviewed.
    pub is_active: bool,
}

impl Default for NewMovie {
    fn default() -> Self {
        Self {
            tmdb_id: 0,
            title: String::new(),
            poster: None,
            backdrop: None,
            overview: None,
            release_date: None,
            ott_release_date: None,
            rating: 0.0,
            language: "te".to_string(),
            ott_platforms: PlatformMap::new(),
            trailer: None,
            youtube_trailer_id: None,
            runtime: 0,
            genres: String::new(),
            cast: String::new(),
            certification: String::new(),
            popularity: 0.0,
            fetch_source: "tmdb".to_string(),
            source: "initial_import".to_string(),
            is_dubbed: false,
            has_telugu_audio: false,
            media_type: MediaType::Movie,
            series_name: None,
            season_number: None,
            episode_number: None,
            episode_count: None,
            is_active: true,
        }
    }
}

impl NewMovie {
    /// Materialize the entity as stored, with the given id and timestamp.
    pub fn into_movie(self, id: DbId, now: Timestamp) -> Movie {
        Movie {
            id,
            tmdb_id: self.tmdb_id,
            title: self.title,
            poster: self.poster,
            backdrop: self.backdrop,
            overview: self.overview,
            release_date: self.release_date,
            ott_release_date: self.ott_release_date,
            rating: self.rating,
            language: self.language,
            ott_platforms: self.ott_platforms,
            trailer: self.trailer,
            youtube_trailer_id: self.youtube_trailer_id,
            runtime: self.runtime,
            genres: self.genres,
            cast: self.cast,
            certification: self.certification,
            popularity: self.popularity,
            is_active: self.is_active,
            fetch_source: self.fetch_source,
            is_dubbed: self.is_dubbed,
            has_telugu_audio: self.has_telugu_audio,
            status: String::new(),
            source: self.source,
            media_type: self.media_type,
            series_name: self.series_name,
            season_number: self.season_number,
            episode_number: self.episode_number,
            episode_count: self.episode_count,
            last_updated: now,
            last_checked: Some(now),
            last_verified: Some(now),
            created_at: now,
        }
    }
}

/// Partial update applied by admin edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<DateString>,
    pub ott_release_date: Option<DateString>,
    pub rating: Option<f64>,
    pub language: Option<String>,
    pub ott_platforms: Option<PlatformMap>,
    pub youtube_trailer_id: Option<String>,
    pub runtime: Option<i32>,
    pub genres: Option<String>,
    pub cast: Option<String>,
    pub certification: Option<String>,
    pub is_dubbed: Option<bool>,
    pub is_active: Option<bool>,
}

impl MovieUpdate {
    /// Apply every present field to `movie`.
    pub fn apply_to(self, movie: &mut Movie) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut movie.title, self.title);
        set_opt(&mut movie.poster, self.poster);
        set_opt(&mut movie.backdrop, self.backdrop);
        set_opt(&mut movie.overview, self.overview);
        set_opt(&mut movie.release_date, self.release_date);
        set_opt(&mut movie.ott_release_date, self.ott_release_date);
        set(&mut movie.rating, self.rating);
        set(&mut movie.language, self.language);
        set(&mut movie.ott_platforms, self.ott_platforms);
        set_opt(&mut movie.youtube_trailer_id, self.youtube_trailer_id);
        set(&mut movie.runtime, self.runtime);
        set(&mut movie.genres, self.genres);
        set(&mut movie.cast, self.cast);
        set(&mut movie.certification, self.certification);
        set(&mut movie.is_dubbed, self.is_dubbed);
        set(&mut movie.is_active, self.is_active);
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Weight given to a non-empty platform map in [`quality_score`].
const QUALITY_PLATFORM_WEIGHT: u32 = 5;

/// Metadata completeness on a 0-100 scale.
///
/// Five descriptive fields count one point each; a non-empty platform map
/// counts [`QUALITY_PLATFORM_WEIGHT`] points.
pub fn quality_score(movie: &Movie) -> u8 {
    let fields = [
        is_filled(movie.overview.as_deref()),
        is_filled(movie.poster.as_deref()),
        movie.runtime != 0,
        is_filled(movie.youtube_trailer_id.as_deref()),
        !movie.cast.trim().is_empty(),
    ];
    let filled = fields.iter().filter(|f| **f).count() as u32;
    let platforms = if movie.has_platforms() {
        QUALITY_PLATFORM_WEIGHT
    } else {
        0
    };
    let total = fields.len() as u32 + QUALITY_PLATFORM_WEIGHT;

    ((f64::from(filled + platforms) / f64::from(total)) * 100.0).round() as u8
}

/// Readiness for the streaming pages: 40 for an OTT date, 40 for platforms, 20 for a trailer.
pub fn completeness_score(movie: &Movie) -> u8 {
    let mut score = 0;
    if is_filled(movie.ott_release_date.as_deref()) {
        score += 40;
    }
    if movie.has_platforms() {
        score += 40;
    }
    if is_filled(movie.youtube_trailer_id.as_deref()) {
        score += 20;
    }
    score
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Platform links
// ---------------------------------------------------------------------------

/// The `limit` highest-priority platforms (see [`platform_priority`]).
pub fn primary_platforms(platforms: &PlatformMap, limit: usize) -> Vec<(&str, &PlatformAvailability)> {
    let mut entries: Vec<_> = platforms
        .iter()
        .map(|(name, info)| (name.as_str(), info))
        .collect();
    entries.sort_by_key(|(name, _)| platform_priority(name));
    entries.truncate(limit);
    entries
}

/// Whether an [`OttLink`] points at the title itself or at a search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Direct,
    Search,
}

/// A watchable link for one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OttLink {
    pub platform: String,
    pub url: String,
    pub link_type: LinkType,
    pub provider_name: String,
    pub logo: Option<String>,
}

/// Resolve one link per platform: direct URL, then plain URL, then the stored search URL.
///
/// Platforms with none of the three are skipped.
pub fn ott_links(platforms: &PlatformMap) -> Vec<OttLink> {
    platforms
        .iter()
        .filter_map(|(platform, info)| {
            let (url, link_type) = match (&info.direct_url, &info.url, &info.fallback_search_url) {
                (Some(url), _, _) | (None, Some(url), _) => (url, LinkType::Direct),
                (None, None, Some(url)) => (url, LinkType::Search),
                (None, None, None) => return None,
            };
            Some(OttLink {
                platform: platform.clone(),
                url: url.clone(),
                link_type,
                provider_name: info
                    .provider_name
                    .clone()
                    .unwrap_or_else(|| title_case(platform)),
                logo: info.logo.clone(),
            })
        })
        .collect()
}

/// Upper-case the first letter of each alphabetic run: `"jio cinema"` → `"Jio Cinema"`.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Release status
// ---------------------------------------------------------------------------

/// Most recent availability date across platforms, else the theatrical release.
pub fn latest_availability(movie: &Movie) -> Option<NaiveDateTime> {
    movie
        .ott_platforms
        .values()
        .flat_map(PlatformAvailability::availability_dates)
        .max()
        .or_else(|| {
            movie
                .release_date
                .as_ref()
                .and_then(|d| parse_availability_date(&serde_json::Value::String(d.clone())))
        })
}

/// Whether the theatrical release date has passed. Missing or bad dates are not released.
pub fn is_released(movie: &Movie, today: NaiveDate) -> bool {
    movie
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .is_some_and(|d| d <= today)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Upcoming,
    Available,
}

/// Status badge: no date means upcoming, an unparseable date means available.
pub fn release_status(movie: &Movie, today: NaiveDate) -> ReleaseStatus {
    let Some(raw) = movie.release_date.as_deref() else {
        return ReleaseStatus::Upcoming;
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) if d > today => ReleaseStatus::Upcoming,
        _ => ReleaseStatus::Available,
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Builders shared by tests across the workspace.
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures {
    use super::*;

    /// An active movie with the given ids and title and otherwise empty metadata.
    pub fn movie(id: DbId, title: &str) -> Movie {
        NewMovie {
            tmdb_id: 1000 + id,
            title: title.to_string(),
            ..NewMovie::default()
        }
        .into_movie(id, chrono::Utc::now())
    }

    /// Add a platform entry with a URL.
    pub fn with_platform(mut movie: Movie, platform: &str) -> Movie {
        movie.ott_platforms.insert(
            platform.to_string(),
            PlatformAvailability::with_url(format!("https://{platform}.example/{}", movie.id)),
        );
        movie
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::fixtures::{movie, with_platform};
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    // -- scores --------------------------------------------------------------

    #[test]
    fn quality_score_empty_movie_is_zero() {
        assert_eq!(quality_score(&movie(1, "Empty")), 0);
    }

    #[test]
    fn quality_score_weights_platforms() {
        let m = with_platform(movie(1, "A"), "netflix");
        assert_eq!(quality_score(&m), 50);
    }

    #[test]
    fn quality_score_full_movie_is_hundred() {
        let mut m = with_platform(movie(1, "Full"), "aha");
        m.overview = Some("A story".into());
        m.poster = Some("https://img/p.jpg".into());
        m.runtime = 140;
        m.youtube_trailer_id = Some("abc".into());
        m.cast = "Nani".into();
        assert_eq!(quality_score(&m), 100);
    }

    #[test]
    fn quality_score_ignores_blank_strings() {
        let mut m = movie(1, "Blank");
        m.overview = Some("   ".into());
        m.runtime = 90;
        assert_eq!(quality_score(&m), 10);
    }

    #[test]
    fn completeness_score_components() {
        let mut m = movie(1, "C");
        assert_eq!(completeness_score(&m), 0);
        m.ott_release_date = Some("2024-01-01".into());
        assert_eq!(completeness_score(&m), 40);
        m = with_platform(m, "prime");
        assert_eq!(completeness_score(&m), 80);
        m.youtube_trailer_id = Some("x".into());
        assert_eq!(completeness_score(&m), 100);
    }

    // -- links ---------------------------------------------------------------

    #[test]
    fn primary_platforms_sorted_by_priority() {
        let m = ["aha", "zee5", "netflix", "prime"]
            .into_iter()
            .fold(movie(1, "P"), with_platform);
        let names: Vec<&str> = primary_platforms(&m.ott_platforms, 2)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["netflix", "prime"]);
    }

    #[test]
    fn ott_links_prefers_direct_then_search() {
        let mut platforms = PlatformMap::new();
        platforms.insert(
            "netflix".into(),
            PlatformAvailability {
                direct_url: Some("https://direct".into()),
                url: Some("https://plain".into()),
                ..Default::default()
            },
        );
        platforms.insert(
            "jio cinema".into(),
            PlatformAvailability {
                fallback_search_url: Some("https://search".into()),
                ..Default::default()
            },
        );
        platforms.insert("aha".into(), PlatformAvailability::default());

        let links = ott_links(&platforms);
        assert_eq!(links.len(), 2);
        let jio = links.iter().find(|l| l.platform == "jio cinema").unwrap();
        assert_eq!(jio.link_type, LinkType::Search);
        assert_eq!(jio.provider_name, "Jio Cinema");
        let netflix = links.iter().find(|l| l.platform == "netflix").unwrap();
        assert_eq!(netflix.url, "https://direct");
        assert_eq!(netflix.link_type, LinkType::Direct);
    }

    // -- release status ------------------------------------------------------

    #[test]
    fn release_status_rules() {
        let today = date("2024-06-01");
        let mut m = movie(1, "R");
        assert_eq!(release_status(&m, today), ReleaseStatus::Upcoming);
        assert!(!is_released(&m, today));

        m.release_date = Some("2024-06-02".into());
        assert_eq!(release_status(&m, today), ReleaseStatus::Upcoming);

        m.release_date = Some("2024-06-01".into());
        assert_eq!(release_status(&m, today), ReleaseStatus::Available);
        assert!(is_released(&m, today));

        m.release_date = Some("someday".into());
        assert_eq!(release_status(&m, today), ReleaseStatus::Available);
        assert!(!is_released(&m, today));
    }

    #[test]
    fn latest_availability_prefers_platform_dates() {
        let mut m = movie(1, "L");
        m.release_date = Some("2023-01-01".into());
        assert_eq!(latest_availability(&m).unwrap().date(), date("2023-01-01"));

        m.ott_platforms.insert(
            "prime".into(),
            PlatformAvailability {
                available_from: Some(serde_json::json!("2024-02-10")),
                ..Default::default()
            },
        );
        m.ott_platforms.insert(
            "aha".into(),
            PlatformAvailability {
                available_from: Some(serde_json::json!("2024-03-05")),
                ..Default::default()
            },
        );
        assert_eq!(latest_availability(&m).unwrap().date(), date("2024-03-05"));
    }

    #[test]
    fn movie_update_only_touches_present_fields() {
        let mut m = movie(1, "Old");
        m.rating = 6.0;
        MovieUpdate {
            title: Some("New".into()),
            runtime: Some(120),
            ..Default::default()
        }
        .apply_to(&mut m);
        assert_eq!(m.title, "New");
        assert_eq!(m.runtime, 120);
        assert_eq!(m.rating, 6.0);
    }
}
