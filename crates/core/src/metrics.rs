//! Back-office health metrics computed over catalog slices.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::movie::Movie;
use crate::platforms::is_free_platform;

/// Number of platforms listed in the distribution.
pub const PLATFORM_DISTRIBUTION_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Platform distribution
// ---------------------------------------------------------------------------

/// Active movies per platform key (lowercased), largest first, top
/// [`PLATFORM_DISTRIBUTION_LIMIT`]. Ties break alphabetically.
pub fn platform_distribution(movies: &[Movie]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for movie in movies.iter().filter(|m| m.is_active) {
        for key in movie.ott_platforms.keys() {
            *counts.entry(key.to_lowercase()).or_default() += 1;
        }
    }
    let mut sorted: Vec<(String, u64)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(PLATFORM_DISTRIBUTION_LIMIT);
    sorted
}

/// Active movies with an empty platform map.
pub fn dead_link_count(movies: &[Movie]) -> u64 {
    movies
        .iter()
        .filter(|m| m.is_active && !m.has_platforms())
        .count() as u64
}

// ---------------------------------------------------------------------------
// OTT coverage
// ---------------------------------------------------------------------------

/// Where the catalog is missing platform data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OttDiagnostics {
    pub total_movies: u64,
    pub without_ott: u64,
    pub with_ott: u64,
    /// Movies without platforms per release year (first four characters of
    /// the release date).
    pub year_distribution: BTreeMap<String, u64>,
    /// Movies without platforms per language.
    pub language_distribution: BTreeMap<String, u64>,
}

/// Every movie, active or not, with an empty platform map.
pub fn movies_without_ott(movies: &[Movie]) -> Vec<&Movie> {
    movies.iter().filter(|m| !m.has_platforms()).collect()
}

pub fn ott_diagnostics(movies: &[Movie]) -> OttDiagnostics {
    let missing = movies_without_ott(movies);

    let mut year_distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut language_distribution: BTreeMap<String, u64> = BTreeMap::new();
    for movie in &missing {
        let year: String = movie
            .release_date
            .as_deref()
            .unwrap_or("")
            .trim()
            .chars()
            .take(4)
            .collect();
        if !year.is_empty() {
            *year_distribution.entry(year).or_default() += 1;
        }
        if !movie.language.trim().is_empty() {
            *language_distribution.entry(movie.language.clone()).or_default() += 1;
        }
    }

    let total_movies = movies.len() as u64;
    let without_ott = missing.len() as u64;
    OttDiagnostics {
        total_movies,
        without_ott,
        with_ott: total_movies - without_ott,
        year_distribution,
        language_distribution,
    }
}

// ---------------------------------------------------------------------------
// Data integrity
// ---------------------------------------------------------------------------

/// Coverage of one metadata field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCoverage {
    pub key: &'static str,
    pub label: &'static str,
    pub missing: u64,
    pub available: u64,
    /// Share of movies with the field, rounded to one decimal.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_movies: u64,
    pub fields: Vec<FieldCoverage>,
}

type MissingCheck = fn(&Movie) -> bool;

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// `(key, label, is_missing)` for every tracked field.
const INTEGRITY_FIELDS: &[(&str, &str, MissingCheck)] = &[
    ("overview", "Overview", |m| blank(m.overview.as_deref())),
    ("poster", "Poster", |m| blank(m.poster.as_deref())),
    ("backdrop", "Backdrop", |m| blank(m.backdrop.as_deref())),
    ("runtime", "Runtime", |m| m.runtime == 0),
    ("genres", "Genres", |m| blank(Some(m.genres.as_str()))),
    ("cast", "Cast", |m| blank(Some(m.cast.as_str()))),
    ("certification", "Certification", |m| blank(Some(m.certification.as_str()))),
    ("youtube_trailer_id", "Trailer ID", |m| blank(m.youtube_trailer_id.as_deref())),
    ("rating", "Rating", |m| m.rating == 0.0),
    ("release_date", "Release Date", |m| blank(m.release_date.as_deref())),
    ("ott_release_date", "OTT Release Date", |m| blank(m.ott_release_date.as_deref())),
    ("ott_platforms", "OTT Platforms", |m| !m.has_platforms()),
];

/// Per-field missing/available counts over `movies` (active or not).
pub fn integrity_report(movies: &[Movie]) -> IntegrityReport {
    let total = movies.len() as u64;
    let fields = INTEGRITY_FIELDS
        .iter()
        .map(|&(key, label, is_missing)| {
            let missing = movies.iter().filter(|m| is_missing(m)).count() as u64;
            let available = total.saturating_sub(missing);
            let percent = if total > 0 {
                (available as f64 / total as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            };
            FieldCoverage {
                key,
                label,
                missing,
                available,
                percent,
            }
        })
        .collect();

    IntegrityReport {
        total_movies: total,
        fields,
    }
}

// ---------------------------------------------------------------------------
// Daily snapshot
// ---------------------------------------------------------------------------

/// One day's platform rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub netflix_count: u64,
    pub prime_count: u64,
    pub hotstar_count: u64,
    /// Active movies with at least one platform.
    pub total_count: u64,
    /// Active movies on at least one free platform.
    pub free_count: u64,
    pub platforms: BTreeMap<String, u64>,
}

impl DailySnapshot {
    pub fn from_movies(date: NaiveDate, movies: &[Movie]) -> Self {
        let active: Vec<&Movie> = movies.iter().filter(|m| m.is_active).collect();
        let on = |needle: &str| {
            active
                .iter()
                .filter(|m| m.ott_platforms.keys().any(|k| k.to_lowercase().contains(needle)))
                .count() as u64
        };

        let mut platforms: BTreeMap<String, u64> = BTreeMap::new();
        for movie in &active {
            for key in movie.ott_platforms.keys() {
                *platforms.entry(key.to_lowercase()).or_default() += 1;
            }
        }

        Self {
            date,
            netflix_count: on("netflix"),
            prime_count: on("prime"),
            hotstar_count: on("hotstar"),
            total_count: active.iter().filter(|m| m.has_platforms()).count() as u64,
            free_count: active
                .iter()
                .filter(|m| m.ott_platforms.keys().any(|k| is_free_platform(k)))
                .count() as u64,
            platforms,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
