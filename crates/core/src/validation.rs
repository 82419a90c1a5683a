//! Admin input validation.
//!
//! Validators return every problem found rather than stopping at the first,
//! so an edit form can show them all at once.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::movie::{Movie, MovieUpdate};
use crate::platforms::{parse_platform_map_str, PlatformAvailability};
use crate::types::Timestamp;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("valid regex"));

/// Validate a platform-availability map given as JSON text.
///
/// Blank input is valid (no platforms). Otherwise it must be an object whose
/// every value is an object carrying a `url` field.
pub fn validate_ott_json(raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Ok(());
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|e| format!("Invalid JSON syntax: {e}"))?;

    let Value::Object(map) = value else {
        return Err(
            "OTT platforms must be a JSON object (dictionary), not a list or string".to_string(),
        );
    };

    for (platform, info) in &map {
        let Value::Object(fields) = info else {
            return Err(format!(
                "Platform '{platform}' must have an object value with 'url' field"
            ));
        };
        if !fields.contains_key("url") {
            return Err(format!("Platform '{platform}' is missing required 'url' field"));
        }
    }
    Ok(())
}

/// Movie fields as submitted by the admin edit form.
///
/// `ott_platforms` is the raw JSON text typed by the admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieInput {
    pub tmdb_id: Option<i64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub release_date: Option<String>,
    pub ott_release_date: Option<String>,
    pub rating: Option<f64>,
    pub runtime: Option<i32>,
    pub language: Option<String>,
    pub genres: Option<String>,
    pub cast: Option<String>,
    pub certification: Option<String>,
    pub youtube_trailer_id: Option<String>,
    pub ott_platforms: Option<String>,
    pub is_dubbed: Option<bool>,
    pub is_active: Option<bool>,
}

impl MovieInput {
    /// Convert validated input into a partial update.
    pub fn into_update(self) -> MovieUpdate {
        MovieUpdate {
            title: self.title.map(|t| t.trim().to_string()),
            poster: self.poster,
            backdrop: self.backdrop,
            overview: self.overview,
            release_date: self.release_date,
            ott_release_date: self.ott_release_date,
            rating: self.rating,
            language: self.language,
            ott_platforms: self.ott_platforms.as_deref().map(parse_platform_map_str),
            youtube_trailer_id: self.youtube_trailer_id,
            runtime: self.runtime,
            genres: self.genres,
            cast: self.cast,
            certification: self.certification,
            is_dubbed: self.is_dubbed,
            is_active: self.is_active,
        }
    }
}

/// Check an admin edit before it is saved. An empty list means valid.
pub fn validate_movie_input(input: &MovieInput) -> Vec<String> {
    let mut errors = Vec::new();

    if input.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        errors.push("Title is required".to_string());
    }
    if input.tmdb_id.is_none_or(|id| id == 0) {
        errors.push("TMDB ID is required".to_string());
    }

    if let Some(rating) = input.rating {
        if !(0.0..=MAX_RATING).contains(&rating) {
            errors.push("Rating must be between 0 and 10".to_string());
        }
    }
    if input.runtime.is_some_and(|r| r < 0) {
        errors.push("Runtime must be a positive number".to_string());
    }

    if let Some(raw) = input.ott_platforms.as_deref() {
        if let Err(e) = validate_ott_json(raw) {
            errors.push(format!("OTT Platforms: {e}"));
        }
    }

    if let Some(poster) = input.poster.as_deref().filter(|p| !p.is_empty()) {
        if !HTTP_URL_RE.is_match(poster) {
            errors.push("Poster URL must start with http:// or https://".to_string());
        }
    }

    errors
}

// ---------------------------------------------------------------------------
// Manual OTT entry
// ---------------------------------------------------------------------------

/// A platform link and/or OTT release date found by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OttEntry {
    pub platform: Option<String>,
    pub ott_link: Option<String>,
    pub ott_release_date: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Write `entry` onto `movie` and return the fields changed.
///
/// A link replaces any existing entry for the platform and is stamped with
/// `added_date`. The date must be `YYYY-MM-DD`; setting it is what lets the
/// title appear under "new on OTT".
pub fn apply_ott_entry(
    movie: &mut Movie,
    entry: &OttEntry,
    now: Timestamp,
) -> Result<Vec<&'static str>, CoreError> {
    let platform = non_blank(&entry.platform);
    let link = non_blank(&entry.ott_link);
    let date = non_blank(&entry.ott_release_date);

    if platform.is_some() != link.is_some() {
        return Err(CoreError::InvalidPlatformData(
            "Platform and link must be given together".to_string(),
        ));
    }
    if let Some(link) = link {
        if !HTTP_URL_RE.is_match(link) {
            return Err(CoreError::InvalidPlatformData(
                "OTT link must start with http:// or https://".to_string(),
            ));
        }
    }
    if let Some(date) = date {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(CoreError::Validation(
                "OTT release date must be YYYY-MM-DD".to_string(),
            ));
        }
    }

    let mut changed = Vec::new();
    if let (Some(platform), Some(link)) = (platform, link) {
        let mut availability = PlatformAvailability::with_url(link);
        availability
            .extra
            .insert("added_date".to_string(), Value::String(now.to_rfc3339()));
        movie.ott_platforms.insert(platform.to_string(), availability);
        changed.push("ott_platforms");
    }
    if let Some(date) = date {
        movie.ott_release_date = Some(date.to_string());
        changed.push("ott_release_date");
    }

    if changed.is_empty() {
        return Err(CoreError::Validation(
            "Give a platform link or an OTT release date".to_string(),
        ));
    }
    Ok(changed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::fixtures::{movie, with_platform};

    fn valid_input() -> MovieInput {
        MovieInput {
            tmdb_id: Some(550),
            title: Some("Fight Club".into()),
            ..Default::default()
        }
    }

    // -- apply_ott_entry -----------------------------------------------------

    fn entry(platform: &str, link: &str, date: &str) -> OttEntry {
        let set = |v: &str| (!v.is_empty()).then(|| v.to_string());
        OttEntry {
            platform: set(platform),
            ott_link: set(link),
            ott_release_date: set(date),
        }
    }

    #[test]
    fn ott_entry_adds_link_and_date() {
        let mut target = movie(1, "Kalki 2898 AD");
        let now = chrono::Utc::now();

        let changed = apply_ott_entry(
            &mut target,
            &entry("prime", "https://primevideo.com/kalki", "2024-08-22"),
            now,
        )
        .unwrap();

        assert_eq!(changed, vec!["ott_platforms", "ott_release_date"]);
        let prime = &target.ott_platforms["prime"];
        assert_eq!(prime.url.as_deref(), Some("https://primevideo.com/kalki"));
        assert_eq!(prime.extra["added_date"], now.to_rfc3339());
        assert_eq!(target.ott_release_date.as_deref(), Some("2024-08-22"));
    }

    #[test]
    fn ott_entry_date_alone_keeps_platforms() {
        let mut target = with_platform(movie(1, "Salaar"), "netflix");
        let changed = apply_ott_entry(&mut target, &entry("", "", "2024-01-20"), chrono::Utc::now())
            .unwrap();
        assert_eq!(changed, vec!["ott_release_date"]);
        assert!(target.ott_platforms.contains_key("netflix"));
    }

    #[test]
    fn ott_entry_rejects_bad_input_without_changes() {
        let mut target = movie(1, "Salaar");
        let now = chrono::Utc::now();

        assert!(matches!(
            apply_ott_entry(&mut target, &entry("aha", "aha.video/x", ""), now),
            Err(CoreError::InvalidPlatformData(_))
        ));
        assert!(matches!(
            apply_ott_entry(&mut target, &entry("aha", "", ""), now),
            Err(CoreError::InvalidPlatformData(_))
        ));
        assert!(matches!(
            apply_ott_entry(&mut target, &entry("aha", "https://aha.video/x", "22-08-2024"), now),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            apply_ott_entry(&mut target, &entry("", "", "  "), now),
            Err(CoreError::Validation(_))
        ));
        assert!(target.ott_platforms.is_empty());
        assert_eq!(target.ott_release_date, None);
    }

    // -- validate_ott_json ---------------------------------------------------

    #[test]
    fn blank_ott_json_is_valid() {
        assert!(validate_ott_json("").is_ok());
        assert!(validate_ott_json("   ").is_ok());
    }

    #[test]
    fn ott_json_must_be_an_object_of_objects_with_url() {
        assert!(validate_ott_json(r#"{"netflix": {"url": "https://n"}}"#).is_ok());

        let list = validate_ott_json(r#"["netflix"]"#).unwrap_err();
        assert!(list.contains("must be a JSON object"));

        let scalar = validate_ott_json(r#"{"netflix": "https://n"}"#).unwrap_err();
        assert_eq!(scalar, "Platform 'netflix' must have an object value with 'url' field");

        let missing = validate_ott_json(r#"{"aha": {"logo": "x"}}"#).unwrap_err();
        assert_eq!(missing, "Platform 'aha' is missing required 'url' field");
    }

    #[test]
    fn malformed_ott_json_reports_syntax() {
        let err = validate_ott_json("{not json").unwrap_err();
        assert!(err.starts_with("Invalid JSON syntax:"));
    }

    // -- validate_movie_input ------------------------------------------------

    #[test]
    fn minimal_input_is_valid() {
        assert!(validate_movie_input(&valid_input()).is_empty());
    }

    #[test]
    fn required_fields() {
        let errors = validate_movie_input(&MovieInput {
            title: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(errors, vec!["Title is required", "TMDB ID is required"]);
    }

    #[test]
    fn collects_every_problem() {
        let errors = validate_movie_input(&MovieInput {
            rating: Some(11.0),
            runtime: Some(-5),
            poster: Some("ftp://img/p.jpg".into()),
            ott_platforms: Some("[]".into()),
            ..valid_input()
        });
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("Rating"));
        assert!(errors[1].contains("Runtime"));
        assert!(errors[2].starts_with("OTT Platforms:"));
        assert!(errors[3].contains("Poster URL"));
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in [0.0, 10.0] {
            let input = MovieInput {
                rating: Some(rating),
                ..valid_input()
            };
            assert!(validate_movie_input(&input).is_empty());
        }
    }

    #[test]
    fn into_update_parses_platform_text() {
        let update = MovieInput {
            ott_platforms: Some(r#"{"aha": {"url": "https://aha.video/x"}}"#.into()),
            title: Some(" Trimmed ".into()),
            ..valid_input()
        }
        .into_update();
        assert_eq!(update.title.as_deref(), Some("Trimmed"));
        let platforms = update.ott_platforms.unwrap();
        assert_eq!(platforms["aha"].url.as_deref(), Some("https://aha.video/x"));
    }
}
