//! Repository for the `person` table.

use sqlx::PgPool;

use crate::models::person::PersonRow;

const COLUMNS: &str = "\
    id, tmdb_id, name, profile_path, biography, birthday, place_of_birth, \
    known_for_department, popularity, gender, is_verified, custom_bio, custom_profile_url";

pub struct PersonRepo;

impl PersonRepo {
    /// Case-insensitive exact name match; the most popular wins on duplicates.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<PersonRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM person WHERE lower(name) = lower($1) \
             ORDER BY popularity DESC, id ASC LIMIT 1"
        );
        sqlx::query_as::<_, PersonRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
