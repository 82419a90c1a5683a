//! `person` rows.

use ottradar_core::person::Person;
use ottradar_core::types::DbId;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
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
    pub custom_bio: Option<String>,
    pub custom_profile_url: Option<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person {
            id: row.id,
            tmdb_id: row.tmdb_id,
            name: row.name,
            profile_path: row.profile_path,
            biography: row.biography,
            birthday: row.birthday,
            place_of_birth: row.place_of_birth,
            known_for_department: row.known_for_department,
            popularity: row.popularity,
            gender: row.gender,
            is_verified: row.is_verified,
            custom_bio: row.custom_bio,
            custom_profile_url: row.custom_profile_url,
        }
    }
}
