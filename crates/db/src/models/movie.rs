//! `movies` rows.

use ottradar_core::movie::{MediaType, Movie};
use ottradar_core::platforms::parse_platform_map;
use ottradar_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub tmdb_id: i64,
    pub title: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub ott_release_date: Option<String>,
    pub rating: f64,
    pub language: String,
    pub ott_platforms: serde_json::Value,
    pub trailer: Option<String>,
    pub youtube_trailer_id: Option<String>,
    pub runtime: i32,
    pub genres: String,
    pub cast_members: String,
    pub certification: String,
    pub popularity: f64,
    pub is_active: bool,
    pub fetch_source: String,
    pub is_dubbed: bool,
    pub has_telugu_audio: bool,
    pub status: String,
    pub source: String,
    pub media_type: String,
    pub series_name: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub episode_count: Option<i32>,
    pub last_updated: Timestamp,
    pub last_checked: Option<Timestamp>,
    pub last_verified: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            poster: row.poster,
            backdrop: row.backdrop,
            overview: row.overview,
            release_date: row.release_date,
            ott_release_date: row.ott_release_date,
            rating: row.rating,
            language: row.language,
            ott_platforms: parse_platform_map(&row.ott_platforms),
            trailer: row.trailer,
            youtube_trailer_id: row.youtube_trailer_id,
            runtime: row.runtime,
            genres: row.genres,
            cast: row.cast_members,
            certification: row.certification,
            popularity: row.popularity,
            is_active: row.is_active,
            fetch_source: row.fetch_source,
            is_dubbed: row.is_dubbed,
            has_telugu_audio: row.has_telugu_audio,
            status: row.status,
            source: row.source,
            media_type: MediaType::parse(&row.media_type),
            series_name: row.series_name,
            season_number: row.season_number,
            episode_number: row.episode_number,
            episode_count: row.episode_count,
            last_updated: row.last_updated,
            last_checked: row.last_checked,
            last_verified: row.last_verified,
            created_at: row.created_at,
        }
    }
}
