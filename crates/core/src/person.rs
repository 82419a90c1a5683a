//! Cast and crew profiles.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Shown when a person has neither a custom nor a TMDB profile image.
pub const NO_PROFILE_IMAGE: &str = "/static/img/no-profile.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: DbId,
    pub tmdb_id: Option<i64>,
    pub name: String,
    pub profile_path: Option<String>,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub popularity: f64,
    pub gender: Option<i32>,
    pub is_verified: bool,
    /// Admin overrides.
    pub custom_bio: Option<String>,
    pub custom_profile_url: Option<String>,
}

impl Person {
    /// Custom image, else the TMDB image at `size` (e.g. `w185`), else the placeholder.
    pub fn profile_url(&self, size: &str) -> String {
        if let Some(url) = non_blank(&self.custom_profile_url) {
            return url.to_string();
        }
        match non_blank(&self.profile_path) {
            Some(path) => format!("{TMDB_IMAGE_BASE}/{size}{path}"),
            None => NO_PROFILE_IMAGE.to_string(),
        }
    }

    /// Custom biography, else the TMDB one.
    pub fn bio(&self) -> Option<&str> {
        non_blank(&self.custom_bio).or_else(|| non_blank(&self.biography))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Person {
        Person {
            id: 1,
            tmdb_id: Some(1253360),
            name: "Prabhas".into(),
            profile_path: Some("/abc.jpg".into()),
            biography: Some("Actor".into()),
            birthday: None,
            place_of_birth: None,
            known_for_department: Some("Acting".into()),
            popularity: 30.0,
            gender: Some(2),
            is_verified: false,
            custom_bio: None,
            custom_profile_url: None,
        }
    }

    #[test]
    fn profile_url_precedence() {
        let mut p = person();
        assert_eq!(p.profile_url("w185"), "https://image.tmdb.org/t/p/w185/abc.jpg");

        p.custom_profile_url = Some("https://cdn/p.png".into());
        assert_eq!(p.profile_url("w185"), "https://cdn/p.png");

        p.custom_profile_url = None;
        p.profile_path = None;
        assert_eq!(p.profile_url("w185"), NO_PROFILE_IMAGE);
    }

    #[test]
    fn custom_bio_wins() {
        let mut p = person();
        assert_eq!(p.bio(), Some("Actor"));
        p.custom_bio = Some("Rebel Star".into());
        assert_eq!(p.bio(), Some("Rebel Star"));
        p.custom_bio = Some("  ".into());
        assert_eq!(p.bio(), Some("Actor"));
    }
}
