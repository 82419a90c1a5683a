/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates are stored as `YYYY-MM-DD` strings and compared lexicographically.
pub type DateString = String;

/// Format a calendar date the way the catalog stores it.
pub fn date_string(date: chrono::NaiveDate) -> DateString {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in UTC.
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
