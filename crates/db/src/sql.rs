//! Render catalog predicates and orderings to SQL.
//!
//! The rendering mirrors [`Predicate::matches`] so the Postgres store and the
//! in-memory store agree: text matches are case-insensitive substring
//! checks, blank dates never match, and platform predicates look at the
//! object-valued keys of `ott_platforms` after the same normalization
//! (lowercase ASCII alphanumerics) the core applies.

use ottradar_core::filter::{Direction, MovieQuery, Predicate, SortKey};
use ottradar_core::platforms::{normalize_platform_key, FREE_PLATFORMS};
use sqlx::{Postgres, QueryBuilder};

/// Column list for `movies` SELECT queries.
pub const MOVIE_COLUMNS: &str = "\
    id, tmdb_id, title, poster, backdrop, overview, release_date, ott_release_date, \
    rating, language, ott_platforms, trailer, youtube_trailer_id, runtime, genres, \
    cast_members, certification, popularity, is_active, fetch_source, is_dubbed, \
    has_telugu_audio, status, source, media_type, series_name, season_number, \
    episode_number, episode_count, last_updated, last_checked, last_verified, created_at";

/// Normalized form of a platform key `k`, matching `normalize_platform_key`.
const NORMALIZED_KEY: &str = "lower(regexp_replace(k, '[^A-Za-z0-9]', '', 'g'))";

/// Append ` WHERE ...` for the conjunction of `predicates`.
pub fn push_where(qb: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }
    qb.push(" WHERE ");
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        push_predicate(qb, predicate);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Active => {
            qb.push("is_active");
        }
        Predicate::LanguageContains(v) => push_contains(qb, "language", v),
        Predicate::GenreContains(v) => push_contains(qb, "genres", v),
        Predicate::TitleContains(v) => push_contains(qb, "title", v),
        Predicate::CastContains(v) => push_contains(qb, "cast_members", v),
        Predicate::TitleEquals(v) => {
            qb.push("lower(title) = lower(").push_bind(v.clone()).push(")");
        }
        Predicate::PlatformContains(name) => {
            push_platform_exists(qb, |qb| {
                qb.push(" AND strpos(")
                    .push(NORMALIZED_KEY)
                    .push(", ")
                    .push_bind(normalize_platform_key(name))
                    .push(") > 0");
            });
        }
        Predicate::PlatformIs(name) => {
            push_platform_exists(qb, |qb| {
                qb.push(" AND ")
                    .push(NORMALIZED_KEY)
                    .push(" = ")
                    .push_bind(normalize_platform_key(name));
            });
        }
        Predicate::FreePlatform => {
            let keys: Vec<String> = FREE_PLATFORMS.iter().map(|k| k.to_string()).collect();
            push_platform_exists(qb, |qb| {
                qb.push(" AND ")
                    .push(NORMALIZED_KEY)
                    .push(" = ANY(")
                    .push_bind(keys)
                    .push(")");
            });
        }
        Predicate::HasPlatforms => push_platform_exists(qb, |_| {}),
        Predicate::HasPoster => {
            qb.push("(poster IS NOT NULL AND btrim(poster) <> '')");
        }
        Predicate::MinRating(v) => {
            qb.push("rating >= ").push_bind(*v);
        }
        Predicate::PopularityAbove(v) => {
            qb.push("popularity > ").push_bind(*v);
        }
        Predicate::PopularityBelow(v) => {
            qb.push("popularity < ").push_bind(*v);
        }
        Predicate::ReleaseFrom(d) => push_date_cmp(qb, "release_date", ">=", d),
        Predicate::ReleaseTo(d) => push_date_cmp(qb, "release_date", "<=", d),
        Predicate::ReleaseAfter(d) => push_date_cmp(qb, "release_date", ">", d),
        Predicate::ReleaseYear(year) => {
            qb.push("starts_with(btrim(release_date), ")
                .push_bind(year.to_string())
                .push(")");
        }
        Predicate::OttReleaseFrom(d) => push_date_cmp(qb, "ott_release_date", ">=", d),
        Predicate::OttReleaseBetween { from, to } => {
            qb.push("(");
            push_date_cmp(qb, "ott_release_date", ">=", from);
            qb.push(" AND ");
            push_date_cmp(qb, "ott_release_date", "<=", to);
            qb.push(")");
        }
        Predicate::Dubbed(flag) => {
            qb.push("is_dubbed = ").push_bind(*flag);
        }
        Predicate::MediaType(media_type) => {
            qb.push("media_type = ").push_bind(media_type.as_str());
        }
        Predicate::SeriesName(name) => {
            qb.push("lower(series_name) = lower(").push_bind(name.clone()).push(")");
        }
        Predicate::TmdbId(id) => {
            qb.push("tmdb_id = ").push_bind(*id);
        }
        Predicate::Any(inner) => {
            if inner.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push("(");
            for (i, p) in inner.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_predicate(qb, p);
            }
            qb.push(")");
        }
    }
}

fn push_contains(qb: &mut QueryBuilder<'static, Postgres>, column: &str, needle: &str) {
    qb.push("strpos(lower(")
        .push(column)
        .push("), lower(")
        .push_bind(needle.to_string())
        .push(")) > 0");
}

fn push_date_cmp(qb: &mut QueryBuilder<'static, Postgres>, column: &str, op: &str, date: &str) {
    qb.push("NULLIF(btrim(")
        .push(column)
        .push("), '') ")
        .push(op)
        .push(" ")
        .push_bind(date.to_string());
}

/// `EXISTS` over the object-valued keys of `ott_platforms`, narrowed by
/// whatever `condition` appends. Non-object maps never match.
fn push_platform_exists(
    qb: &mut QueryBuilder<'static, Postgres>,
    condition: impl FnOnce(&mut QueryBuilder<'static, Postgres>),
) {
    qb.push(
        "(CASE WHEN jsonb_typeof(ott_platforms) = 'object' THEN EXISTS (\
         SELECT 1 FROM jsonb_object_keys(ott_platforms) AS k \
         WHERE jsonb_typeof(ott_platforms -> k) = 'object'",
    );
    condition(qb);
    qb.push(") ELSE FALSE END)");
}

/// Append ` ORDER BY ...`, always ending with `id` for a stable order.
pub fn push_order(qb: &mut QueryBuilder<'static, Postgres>, sort: &[(SortKey, Direction)]) {
    if sort.iter().any(|(key, _)| *key == SortKey::Random) {
        qb.push(" ORDER BY random()");
        return;
    }

    qb.push(" ORDER BY ");
    for (key, direction) in sort {
        let dir = match direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        let expr = match key {
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::Title => "lower(title)",
            SortKey::ReleaseDate => "NULLIF(btrim(release_date), '')",
            SortKey::OttReleaseDate => "NULLIF(btrim(ott_release_date), '')",
            SortKey::SeasonNumber => "season_number",
            SortKey::EpisodeNumber => "episode_number",
            SortKey::Random => continue,
        };
        qb.push(expr).push(" ").push(dir).push(" NULLS LAST, ");
    }
    qb.push("id ASC");
}

/// Full `SELECT` for a [`MovieQuery`].
pub fn select_movies(query: &MovieQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {MOVIE_COLUMNS} FROM movies"));
    push_where(&mut qb, &query.predicates);
    push_order(&mut qb, &query.sort);
    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit as i64);
    }
    if query.offset > 0 {
        qb.push(" OFFSET ").push_bind(query.offset as i64);
    }
    qb
}

/// `SELECT COUNT(*)` for a predicate list.
pub fn count_movies(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)::BIGINT FROM movies");
    push_where(&mut qb, predicates);
    qb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
