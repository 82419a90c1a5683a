//! Repository for the `movies` table.

use ottradar_core::filter::{MovieQuery, Predicate};
use ottradar_core::movie::{Movie, NewMovie};
use ottradar_core::platforms::platform_map_to_value;
use ottradar_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::MovieRow;
use crate::sql::{count_movies, select_movies, MOVIE_COLUMNS};

/// Column list for INSERT (excludes `id`, `status` and the defaulted timestamps).
const INSERT_COLUMNS: &str = "\
    tmdb_id, title, poster, backdrop, overview, release_date, ott_release_date, \
    rating, language, ott_platforms, trailer, youtube_trailer_id, runtime, genres, \
    cast_members, certification, popularity, fetch_source, source, is_dubbed, \
    has_telugu_audio, media_type, series_name, season_number, episode_number, \
    episode_count, is_active, last_checked, last_verified";

pub struct MovieRepo;

impl MovieRepo {
    pub async fn query(pool: &PgPool, query: &MovieQuery) -> Result<Vec<MovieRow>, sqlx::Error> {
        select_movies(query).build_query_as::<MovieRow>().fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool, predicates: &[Predicate]) -> Result<i64, sqlx::Error> {
        count_movies(predicates).build_query_scalar::<i64>().fetch_one(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_tmdb_id(
        pool: &PgPool,
        tmdb_id: i64,
    ) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = $1");
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(tmdb_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a movie. A duplicate `tmdb_id` violates `uq_movies_tmdb_id`.
    pub async fn insert(pool: &PgPool, movie: &NewMovie) -> Result<MovieRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies ({INSERT_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
              $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, NOW(), NOW()) \
             RETURNING {MOVIE_COLUMNS}"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(movie.tmdb_id)
            .bind(&movie.title)
            .bind(&movie.poster)
            .bind(&movie.backdrop)
            .bind(&movie.overview)
            .bind(&movie.release_date)
            .bind(&movie.ott_release_date)
            .bind(movie.rating)
            .bind(&movie.language)
            .bind(platform_map_to_value(&movie.ott_platforms))
            .bind(&movie.trailer)
            .bind(&movie.youtube_trailer_id)
            .bind(movie.runtime)
            .bind(&movie.genres)
            .bind(&movie.cast)
            .bind(&movie.certification)
            .bind(movie.popularity)
            .bind(&movie.fetch_source)
            .bind(&movie.source)
            .bind(movie.is_dubbed)
            .bind(movie.has_telugu_audio)
            .bind(movie.media_type.as_str())
            .bind(&movie.series_name)
            .bind(movie.season_number)
            .bind(movie.episode_number)
            .bind(movie.episode_count)
            .bind(movie.is_active)
            .fetch_one(pool)
            .await
    }

    /// Write every editable field and bump `last_updated`.
    ///
    /// `tmdb_id` is never written, so `uq_movies_tmdb_id` can only fire on
    /// [`MovieRepo::insert`].
    pub async fn update(pool: &PgPool, movie: &Movie) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET \
                title = $2, poster = $3, backdrop = $4, overview = $5, \
                release_date = $6, ott_release_date = $7, rating = $8, language = $9, \
                ott_platforms = $10, trailer = $11, youtube_trailer_id = $12, runtime = $13, \
                genres = $14, cast_members = $15, certification = $16, popularity = $17, \
                is_active = $18, is_dubbed = $19, has_telugu_audio = $20, status = $21, \
                media_type = $22, series_name = $23, season_number = $24, \
                episode_number = $25, episode_count = $26, last_checked = $27, \
                last_verified = $28, last_updated = NOW() \
             WHERE id = $1 \
             RETURNING {MOVIE_COLUMNS}"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(movie.id)
            .bind(&movie.title)
            .bind(&movie.poster)
            .bind(&movie.backdrop)
            .bind(&movie.overview)
            .bind(&movie.release_date)
            .bind(&movie.ott_release_date)
            .bind(movie.rating)
            .bind(&movie.language)
            .bind(platform_map_to_value(&movie.ott_platforms))
            .bind(&movie.trailer)
            .bind(&movie.youtube_trailer_id)
            .bind(movie.runtime)
            .bind(&movie.genres)
            .bind(&movie.cast)
            .bind(&movie.certification)
            .bind(movie.popularity)
            .bind(movie.is_active)
            .bind(movie.is_dubbed)
            .bind(movie.has_telugu_audio)
            .bind(&movie.status)
            .bind(movie.media_type.as_str())
            .bind(&movie.series_name)
            .bind(movie.season_number)
            .bind(movie.episode_number)
            .bind(movie.episode_count)
            .bind(movie.last_checked)
            .bind(movie.last_verified)
            .fetch_optional(pool)
            .await
    }

    /// Toggle `is_active` for every id. Returns the number of rows touched.
    pub async fn set_active(pool: &PgPool, ids: &[DbId], active: bool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE movies SET is_active = $2, last_updated = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
