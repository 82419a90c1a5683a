//! The HTTP clients against a local stand-in for the provider APIs.

use std::collections::HashMap;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use ottradar_core::error::CoreError;
use ottradar_core::memory::MemoryStore;
use ottradar_core::movie::fixtures::movie;
use ottradar_core::store::CatalogStore;
use ottradar_providers::config::ProviderConfig;
use ottradar_providers::import::import_by_tmdb_id;
use ottradar_providers::omdb::OmdbClient;
use ottradar_providers::streaming::StreamingClient;
use ottradar_providers::tmdb::TmdbClient;
use ottradar_providers::{enrich_movie_metadata, HttpMetadataSource, ProviderError};
use serde_json::{json, Value};

async fn tmdb_movie(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if params.get("api_key").map(String::as_str) != Some("tmdb-key") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if id == 404 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "id": id,
        "title": "Kalki 2898 AD",
        "overview": "Short",
        "poster_path": "/k.jpg",
        "runtime": 181,
        "genres": [{"id": 878, "name": "Science Fiction"}],
        "vote_average": 6.8,
        "original_language": "te",
        "external_ids": {"imdb_id": "tt12735488"},
        "videos": {"results": [{"key": "kalki-yt", "site": "YouTube", "type": "Trailer"}]},
        "watch/providers": {"results": {"IN": {"flatrate": [
            {"provider_id": 119, "provider_name": "Amazon Prime Video", "logo_path": "/p.png"}
        ]}}}
    })))
}

async fn tmdb_release_dates(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({"results": [{"iso_3166_1": "IN", "release_dates": [
        {"type": 3, "release_date": "2024-06-27T00:00:00.000Z"},
        {"type": 4, "release_date": "2024-08-22T00:00:00.000Z"}
    ]}]}))
}

async fn tmdb_discover(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let results: Vec<Value> = (0..3)
        .map(|i| {
            let id = page * 10 + i;
            json!({"id": id, "title": format!("Film {id}"), "vote_average": 6.0, "popularity": 10.0})
        })
        .collect();
    Json(json!({"page": page, "total_pages": 5, "results": results}))
}

async fn omdb(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("i").map(String::as_str) {
        Some("tt12735488") => Json(json!({
            "Response": "True",
            "imdbRating": "7.1",
            "Plot": "A modern avatar of Vishnu is said to descend to earth.",
            "Rated": "UA"
        })),
        _ => Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})),
    }
}

async fn streaming(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if headers.get("x-rapidapi-key").is_none() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(json!({"result": {"streamingInfo": {"in": {
        "prime": [{"type": "subscription", "link": "https://primevideo.com/detail/kalki"}]
    }}}})))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/3/movie/{id}", get(tmdb_movie))
        .route("/3/movie/{id}/release_dates", get(tmdb_release_dates))
        .route("/3/discover/movie", get(tmdb_discover))
        .route("/omdb/", get(omdb))
        .route("/v2/get/basic", get(streaming))
        .route("/broken", get(|| async { "not json" }))
        .route("/posters/ok.jpg", get(|| async { "jpeg" }))
        .route(
            "/posters/moved.jpg",
            get(|| async { axum::response::Redirect::permanent("/posters/ok.jpg") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base: &str) -> ProviderConfig {
    ProviderConfig {
        tmdb_api_key: Some("tmdb-key".into()),
        omdb_api_key: Some("omdb-key".into()),
        rapid_api_key: Some("rapid-key".into()),
        region: "IN".into(),
        timeout: Duration::from_secs(5),
        tmdb_base_url: format!("{base}/3"),
        omdb_base_url: format!("{base}/omdb/"),
        streaming_base_url: base.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tmdb_details_and_release_dates() {
    let base = spawn_stub().await;
    let client = TmdbClient::new(format!("{base}/3"), Some("tmdb-key".into()));

    let movie = client.movie_details(801688).await.unwrap();
    assert_eq!(movie.imdb_id(), Some("tt12735488"));
    assert!(movie.flatrate_platforms("IN").contains_key("amazon prime video"));

    let dates = client.release_dates(801688).await.unwrap();
    assert_eq!(dates.ott_release_date("IN").as_deref(), Some("2024-08-22"));
}

#[tokio::test]
async fn tmdb_non_success_is_api_error() {
    let base = spawn_stub().await;
    let client = TmdbClient::new(format!("{base}/3"), Some("tmdb-key".into()));
    assert_matches!(
        client.movie_details(404).await,
        Err(ProviderError::Api { status: 404, .. })
    );

    let wrong_key = TmdbClient::new(format!("{base}/3"), Some("nope".into()));
    assert_matches!(
        wrong_key.movie_details(1).await,
        Err(ProviderError::Api { status: 401, .. })
    );
}

#[tokio::test]
async fn fetch_new_movies_walks_pages_up_to_limit() {
    let base = spawn_stub().await;
    let client = TmdbClient::new(format!("{base}/3"), Some("tmdb-key".into()));

    let movies = client.fetch_new_movies(2024, "te", 5, 3).await.unwrap();
    let ids: Vec<i64> = movies.iter().map(|m| m.tmdb_id).collect();
    assert_eq!(ids, vec![10, 11, 12, 20, 21]);
    assert!(movies.iter().all(|m| m.language == "te"));
}

#[tokio::test]
async fn omdb_unknown_id_is_none() {
    let base = spawn_stub().await;
    let client = OmdbClient::new(format!("{base}/omdb/"), Some("omdb-key".into()));

    assert!(client.title("tt0000000").await.unwrap().is_none());
    let title = client.title("tt12735488").await.unwrap().unwrap();
    assert_eq!(title.rating(), Some(7.1));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let base = spawn_stub().await;
    let client = OmdbClient::new(format!("{base}/broken"), Some("omdb-key".into()));
    assert_matches!(
        client.title("tt1").await,
        Err(ProviderError::Decode { provider: "OMDb", .. })
    );
}

#[tokio::test]
async fn streaming_sends_rapidapi_headers() {
    let base = spawn_stub().await;
    let client = StreamingClient::new(base, Some("rapid-key".into()));

    let platforms = client.availability("tt12735488", "in").await.unwrap();
    assert_eq!(
        platforms["prime"].url.as_deref(),
        Some("https://primevideo.com/detail/kalki")
    );
}

#[tokio::test]
async fn unreachable_provider_is_request_error() {
    let client = TmdbClient::new("http://127.0.0.1:9".into(), Some("k".into()));
    assert_matches!(client.movie_details(1).await, Err(ProviderError::Request(_)));
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enrichment_merges_all_three_providers() {
    let base = spawn_stub().await;
    let source = HttpMetadataSource::new(&config(&base)).unwrap();

    let merged = enrich_movie_metadata(&source, 801688).await;

    assert_eq!(
        merged.overview.as_deref(),
        Some("A modern avatar of Vishnu is said to descend to earth.")
    );
    assert_eq!(merged.rating, Some(7.1));
    assert_eq!(merged.certification.as_deref(), Some("UA"));
    assert_eq!(merged.ott_release_date.as_deref(), Some("2024-08-22"));
    assert_eq!(merged.youtube_trailer_id.as_deref(), Some("kalki-yt"));
    let platforms = merged.ott_platforms.unwrap();
    assert_eq!(platforms.keys().collect::<Vec<_>>(), vec!["prime"]);
}

#[tokio::test]
async fn enrichment_without_keys_is_empty() {
    let base = spawn_stub().await;
    let config = ProviderConfig {
        tmdb_api_key: None,
        ..config(&base)
    };
    let source = HttpMetadataSource::new(&config).unwrap();
    assert!(enrich_movie_metadata(&source, 801688).await.is_empty());
}

#[tokio::test]
async fn admin_import_inserts_hidden_title() {
    let base = spawn_stub().await;
    let source = HttpMetadataSource::new(&config(&base)).unwrap();
    let store = MemoryStore::new();

    let outcome = import_by_tmdb_id(&source, &store, 801688).await.unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.movie.title, "Kalki 2898 AD");
    assert!(!outcome.movie.is_active);

    let again = import_by_tmdb_id(&source, &store, 801688).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.movie.id, outcome.movie.id);
}

#[tokio::test]
async fn admin_import_of_unknown_id_is_no_match() {
    let base = spawn_stub().await;
    let source = HttpMetadataSource::new(&config(&base)).unwrap();

    assert_matches!(
        import_by_tmdb_id(&source, &MemoryStore::new(), 404).await,
        Err(CoreError::NoMatch { .. })
    );
}

#[tokio::test]
async fn admin_import_without_key_is_unavailable() {
    let base = spawn_stub().await;
    let config = ProviderConfig {
        tmdb_api_key: None,
        ..config(&base)
    };
    let source = HttpMetadataSource::new(&config).unwrap();

    assert_matches!(
        import_by_tmdb_id(&source, &MemoryStore::new(), 801688).await,
        Err(CoreError::ProviderUnavailable { provider: "TMDB" })
    );
}

// ---------------------------------------------------------------------------
// Posters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poster_scan_flags_only_missing_images() {
    let base = spawn_stub().await;
    let source = HttpMetadataSource::new(&config(&base)).unwrap();

    let poster = |id, title, path: &str| {
        let mut m = movie(id, title);
        m.poster = Some(format!("{base}{path}"));
        m
    };
    let mut hidden = poster(4, "Old Print", "/posters/gone.jpg");
    hidden.is_active = false;
    let store = MemoryStore::with_movies(vec![
        poster(1, "Pushpa 2", "/posters/ok.jpg"),
        poster(2, "Salaar", "/posters/gone.jpg"),
        poster(3, "Hi Nanna", "/posters/moved.jpg"),
        movie(5, "No Poster"),
        hidden,
    ]);

    let checks = source.poster_checker().scan(&store, 100).await.unwrap();
    assert_eq!(checks.len(), 3);

    let broken: Vec<&str> = checks
        .iter()
        .filter(|c| c.is_broken())
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(broken, vec!["Salaar"]);

    let moved = checks.iter().find(|c| c.title == "Hi Nanna").unwrap();
    assert_eq!(moved.status_code, Some(200));
    assert!(moved.is_alive());
}

#[tokio::test]
async fn poster_scan_respects_limit_and_skips_unreachable_hosts() {
    let mut unreachable = movie(1, "Pushpa 2");
    unreachable.poster = Some("http://127.0.0.1:9/p.jpg".into());
    let store = MemoryStore::with_movies(vec![unreachable, movie(2, "Salaar")]);
    let source = HttpMetadataSource::new(&ProviderConfig::default()).unwrap();

    let checks = source.poster_checker().scan(&store, 1).await.unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].status_code, None);
    assert!(checks[0].error.is_some());
    assert!(!checks[0].is_broken());
    assert!(!checks[0].is_alive());
    assert_eq!(store.count(&[]).await.unwrap(), 2);
}
