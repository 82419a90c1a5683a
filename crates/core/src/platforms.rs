//! Platform-availability map: typed parsing and platform-name helpers.
//!
//! The catalog stores availability as a JSON object keyed by platform name
//! (`{"netflix": {"url": "...", "available_from": ...}}`). Stored data has
//! historically been written by several tools, so every read goes through
//! [`parse_platform_map`], which never fails: anything that is not an object
//! of objects degrades to an empty map.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform name → availability metadata, ordered by key.
pub type PlatformMap = BTreeMap<String, PlatformAvailability>;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Normalized keys of platforms that stream at least part of their catalog
/// for free (YouTube, Hotstar, Voot, MX Player), with the spellings
/// providers use for them.
pub const FREE_PLATFORMS: &[&str] = &[
    "youtube",
    "youtubemovies",
    "hotstar",
    "disneyhotstar",
    "disneyplushotstar",
    "voot",
    "mx",
    "mxplayer",
];

/// Platforms reported individually in coverage statistics.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "netflix",
    "prime",
    "hotstar",
    "jiocinema",
    "zee5",
    "sonyliv",
    "apple",
    "airtel",
    "mxplayer",
    "voot",
    "aha",
    "youtube",
];

/// Priority rank for platforms without an explicit entry in [`platform_priority`].
pub const DEFAULT_PLATFORM_PRIORITY: u32 = 999;

/// Keys inside an availability entry that may carry the date a title became available.
const AVAILABILITY_DATE_KEYS: &[&str] = &["available_from", "available_date", "ott_release_date"];

/// Epoch values above this are treated as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

// ---------------------------------------------------------------------------
// Availability entry
// ---------------------------------------------------------------------------

/// Availability of one title on one platform.
///
/// Known fields are typed; anything else found in stored data is kept in
/// `extra` so a round trip through the catalog does not lose information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_search_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Epoch seconds, epoch milliseconds, or a date string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlatformAvailability {
    /// An entry that only carries a watch URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Build an entry from a raw JSON object, keeping mistyped fields in `extra`.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let url = take_string(&mut object, "url");
        let direct_url = take_string(&mut object, "direct_url");
        let fallback_search_url = take_string(&mut object, "fallback_search_url");
        let provider_name = take_string(&mut object, "provider_name");
        let logo = take_string(&mut object, "logo");
        let provider_id = match object.get("provider_id").and_then(Value::as_i64) {
            Some(id) => {
                object.remove("provider_id");
                Some(id)
            }
            None => None,
        };
        let available_from = match object.get("available_from") {
            Some(Value::Null) | None => None,
            Some(_) => object.remove("available_from"),
        };

        Self {
            url,
            direct_url,
            fallback_search_url,
            provider_id,
            provider_name,
            logo,
            available_from,
            extra: object,
        }
    }

    /// Every parseable availability date carried by this entry.
    pub fn availability_dates(&self) -> Vec<NaiveDateTime> {
        AVAILABILITY_DATE_KEYS
            .iter()
            .filter_map(|key| match *key {
                "available_from" => self.available_from.as_ref(),
                other => self.extra.get(other),
            })
            .filter_map(parse_availability_date)
            .collect()
    }
}

/// Remove `key` from `object` if it holds a non-empty string.
fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => match object.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a stored availability value into a typed map.
///
/// Non-object input yields an empty map; entries whose value is not an
/// object are dropped.
pub fn parse_platform_map(value: &Value) -> PlatformMap {
    let Value::Object(entries) = value else {
        return PlatformMap::new();
    };

    entries
        .iter()
        .filter_map(|(name, entry)| match entry {
            Value::Object(object) => Some((
                name.clone(),
                PlatformAvailability::from_object(object.clone()),
            )),
            _ => None,
        })
        .collect()
}

/// Parse availability from serialized JSON text. Malformed text yields an empty map.
pub fn parse_platform_map_str(raw: &str) -> PlatformMap {
    serde_json::from_str::<Value>(raw)
        .map(|value| parse_platform_map(&value))
        .unwrap_or_default()
}

/// Serialize a map for storage.
pub fn platform_map_to_value(map: &PlatformMap) -> Value {
    serde_json::to_value(map).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Parse an availability date from epoch seconds/milliseconds or a date string.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`), `%Y-%m-%dT%H:%M:%S`,
/// `%Y-%m-%d %H:%M:%S` and plain `%Y-%m-%d`.
pub fn parse_availability_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => {
            let mut secs = n.as_f64()?;
            if secs <= 0.0 {
                return None;
            }
            if secs > EPOCH_MILLIS_THRESHOLD {
                secs /= 1000.0;
            }
            DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.naive_utc())
        }
        Value::String(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ---------------------------------------------------------------------------
// Platform names
// ---------------------------------------------------------------------------

/// Canonical form of a platform name: lowercase ASCII alphanumerics only.
///
/// `"Amazon Prime Video"` and `"amazon_prime_video"` both become
/// `"amazonprimevideo"`.
pub fn normalize_platform_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether a platform key, once normalized, is exactly one of the
/// [`FREE_PLATFORMS`].
pub fn is_free_platform(key: &str) -> bool {
    FREE_PLATFORMS.contains(&normalize_platform_key(key).as_str())
}

/// Display priority for a platform (lower sorts first).
pub fn platform_priority(key: &str) -> u32 {
    match normalize_platform_key(key).as_str() {
        "netflix" => 1,
        "prime" | "amazon" => 2,
        "hotstar" => 3,
        "jiocinema" => 4,
        "zee5" => 5,
        "airtel" => 6,
        _ => DEFAULT_PLATFORM_PRIORITY,
    }
}

/// Platform-specific search page for a title, with a web search fallback.
pub fn platform_search_url(platform: &str, title: &str) -> String {
    let q = urlencoding::encode(title);
    match normalize_platform_key(platform).as_str() {
        "netflix" => format!("https://www.netflix.com/search?q={q}"),
        "prime" | "primevideo" | "amazon" => {
            format!("https://www.amazon.com/s?k={q}&i=instant-video")
        }
        "hotstar" => format!("https://www.hotstar.com/in/search?q={q}"),
        "jiocinema" => format!("https://www.jiocinema.com/search/{q}"),
        "zee5" => format!("https://www.zee5.com/search?q={q}"),
        "sonyliv" => format!("https://www.sonyliv.com/search?q={q}"),
        "aha" => format!("https://www.aha.video/search?q={q}"),
        "youtube" => format!("https://www.youtube.com/results?search_query={q}"),
        _ => format!(
            "https://www.google.com/search?q={q}+{}+ott",
            urlencoding::encode(&platform.to_lowercase())
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
