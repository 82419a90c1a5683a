//! User submissions (movie requests and feature suggestions) and
//! watchlist entries.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// `pending` until an admin acts; `added` and `rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Added,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Added => "added",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "added" => Some(Self::Added),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    #[default]
    Movie,
    Feature,
}

impl SubmissionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Feature => "feature",
        }
    }

    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("feature") {
            Self::Feature
        } else {
            Self::Movie
        }
    }
}

/// Admin decision on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionAction {
    Approve,
    Reject,
}

impl SubmissionAction {
    pub fn target_status(self) -> SubmissionStatus {
        match self {
            Self::Approve => SubmissionStatus::Added,
            Self::Reject => SubmissionStatus::Rejected,
        }
    }
}

/// The status a submission moves to when `action` is applied.
///
/// Only pending submissions can be decided.
pub fn transition(
    current: SubmissionStatus,
    action: SubmissionAction,
) -> Result<SubmissionStatus, CoreError> {
    match current {
        SubmissionStatus::Pending => Ok(action.target_status()),
        other => Err(CoreError::Conflict(format!(
            "Submission is already {}",
            other.as_str()
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubmission {
    pub id: DbId,
    pub movie_title: String,
    pub language: Option<String>,
    pub platform_name: Option<String>,
    pub ott_link: Option<String>,
    pub comment: Option<String>,
    pub submission_type: SubmissionType,
    pub category: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: Timestamp,
}

/// Public suggestion form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSubmission {
    pub movie_title: String,
    pub language: Option<String>,
    pub platform_name: Option<String>,
    pub ott_link: Option<String>,
    pub comment: Option<String>,
    pub submission_type: SubmissionType,
    pub category: Option<String>,
}

impl NewSubmission {
    /// Trim text fields and reject an empty title.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.movie_title = self.movie_title.trim().to_string();
        if self.movie_title.is_empty() {
            return Err(CoreError::Validation("Movie title is required".into()));
        }
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.language = trim(self.language);
        self.platform_name = trim(self.platform_name);
        self.ott_link = trim(self.ott_link);
        self.comment = trim(self.comment);
        self.category = trim(self.category);
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistStatus {
    #[default]
    Watchlist,
    Watched,
    Interested,
}

impl WatchlistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Watchlist => "watchlist",
            Self::Watched => "watched",
            Self::Interested => "interested",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "watchlist" => Some(Self::Watchlist),
            "watched" => Some(Self::Watched),
            "interested" => Some(Self::Interested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: DbId,
    pub user_id: String,
    pub email: Option<String>,
    pub movie_id: DbId,
    pub status: WatchlistStatus,
    /// Platforms the movie was on when it was added.
    pub platforms_available: Vec<String>,
    pub added_at: Timestamp,
    pub watched_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
