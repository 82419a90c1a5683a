//! Integration tests for the back-office endpoints that run on the catalog
//! and script stores.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{admin_get, body_json, build_test_app, catalog, get, send, seeded_app, ADMIN};
use ottradar_core::memory::MemoryStore;
use serde_json::json;

// ---------------------------------------------------------------------------
// Admin identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_routes_require_admin_header() {
    let response = get(seeded_app(), "/api/admin/integrity").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "ADMIN_REQUIRED");
}

#[tokio::test]
async fn blank_admin_header_is_rejected() {
    let response = send(seeded_app(), Method::GET, "/api/admin/integrity", None, Some("  ")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Data quality
// ---------------------------------------------------------------------------

#[tokio::test]
async fn integrity_covers_whole_catalog() {
    let response = admin_get(seeded_app(), "/api/admin/integrity").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let report = &json["data"];
    assert_eq!(report["total_movies"], 7);
    assert_eq!(report["fields"].as_array().unwrap().len(), 12);

    let platforms = report["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "ott_platforms")
        .unwrap();
    assert_eq!(platforms["missing"], 1);
}

#[tokio::test]
async fn validate_json_reports_problems() {
    let ok = send(
        seeded_app(),
        Method::POST,
        "/api/admin/validate-json",
        Some(json!({ "ott_platforms": r#"{"aha": {"url": "https://aha.video/x"}}"# })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["data"]["valid"], true);
    assert!(json["data"]["error"].is_null());

    let bad = send(
        seeded_app(),
        Method::POST,
        "/api/admin/validate-json",
        Some(json!({ "ott_platforms": r#"{"aha": {"link": "x"}}"# })),
        Some(ADMIN),
    )
    .await;
    let json = body_json(bad).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["error"], "Platform 'aha' is missing required 'url' field");
}

// ---------------------------------------------------------------------------
// Movie maintenance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_rejects_invalid_input() {
    let response = send(
        seeded_app(),
        Method::PUT,
        "/api/admin/movies/1002",
        Some(json!({ "tmdb_id": 1002, "title": "Salaar", "rating": 11.0 })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Rating must be between 0 and 10");
}

#[tokio::test]
async fn edit_updates_the_movie() {
    let store = Arc::new(MemoryStore::with_movies(catalog()));

    let response = send(
        build_test_app(store.clone()),
        Method::PUT,
        "/api/admin/movies/1002",
        Some(json!({
            "tmdb_id": 1002,
            "title": "Salaar: Part 1 - Ceasefire",
            "ott_platforms": r#"{"netflix": {"url": "https://netflix.com/title/1"}}"#,
        })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["title"],
        "Salaar: Part 1 - Ceasefire"
    );

    let json = body_json(get(build_test_app(store), "/api/movie/1002").await).await;
    assert_eq!(json["data"]["movie"]["title"], "Salaar: Part 1 - Ceasefire");
    assert_eq!(json["data"]["links"][0]["platform"], "netflix");
}

#[tokio::test]
async fn edit_of_unknown_movie_is_404() {
    let response = send(
        seeded_app(),
        Method::PUT,
        "/api/admin/movies/424242",
        Some(json!({ "tmdb_id": 424242, "title": "Ghost" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enrich_without_providers_changes_nothing() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/movies/1004/enrich",
        None,
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["applied"], json!([]));
    assert_eq!(json["data"]["movie"]["title"], "Kalki 2898 AD");
}

#[tokio::test]
async fn bulk_deactivate_hides_movies() {
    let store = Arc::new(MemoryStore::with_movies(catalog()));

    let response = send(
        build_test_app(store.clone()),
        Method::POST,
        "/api/admin/movies/bulk",
        Some(json!({ "ids": [2], "action": "deactivate" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["affected"], 1);

    let json = body_json(get(build_test_app(store), "/api/search?q=salaar").await).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn bulk_requires_ids() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/movies/bulk",
        Some(json!({ "ids": [], "action": "delete" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_refresh_without_providers_changes_nothing() {
    let store = Arc::new(MemoryStore::with_movies(catalog()));

    let response = send(
        build_test_app(store.clone()),
        Method::POST,
        "/api/admin/movies/bulk",
        Some(json!({ "ids": [1, 4], "action": "refresh_ott" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["affected"], 0);

    let json = body_json(get(build_test_app(store), "/api/movie/1001").await).await;
    assert!(json["data"]["movie"]["ott_platforms"]["netflix"].is_object());
}

// ---------------------------------------------------------------------------
// Import and OTT gaps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn importing_catalogued_id_returns_existing_movie() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/movies/import",
        Some(json!({ "tmdb_id": 1002 })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["created"], false);
    assert_eq!(json["data"]["movie"]["title"], "Salaar");
}

#[tokio::test]
async fn importing_new_id_without_tmdb_key_is_unavailable() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/movies/import",
        Some(json!({ "tmdb_id": 999999 })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "PROVIDER_UNAVAILABLE");
}

#[tokio::test]
async fn importing_non_positive_id_is_rejected() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/movies/import",
        Some(json!({ "tmdb_id": 0 })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn movies_without_ott_are_listed() {
    let json = body_json(admin_get(seeded_app(), "/api/admin/movies-without-ott").await).await;
    let missing = json["data"].as_array().unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0]["tmdb_id"], 1004);
    assert_eq!(missing[0]["title"], "Kalki 2898 AD");
}

#[tokio::test]
async fn ott_diagnostics_count_every_movie() {
    let json = body_json(admin_get(seeded_app(), "/api/admin/ott-diagnostics").await).await;
    let report = &json["data"];
    assert_eq!(report["total_movies"], 7);
    assert_eq!(report["without_ott"], 1);
    assert_eq!(report["with_ott"], 6);
    assert_eq!(report["language_distribution"]["te"], 1);
}

#[tokio::test]
async fn ott_entry_adds_platform_link() {
    let store = Arc::new(MemoryStore::with_movies(catalog()));

    let response = send(
        build_test_app(store.clone()),
        Method::POST,
        "/api/admin/ott-entry",
        Some(json!({
            "movie_id": 4,
            "platform": "prime",
            "ott_link": "https://www.primevideo.com/detail/kalki",
            "ott_release_date": "2024-08-22"
        })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(build_test_app(store.clone()), "/api/movie/1004").await).await;
    let movie = &json["data"]["movie"];
    assert_eq!(
        movie["ott_platforms"]["prime"]["url"],
        "https://www.primevideo.com/detail/kalki"
    );
    assert_eq!(movie["ott_release_date"], "2024-08-22");

    let json =
        body_json(admin_get(build_test_app(store), "/api/admin/movies-without-ott").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn ott_entry_with_bad_link_is_rejected() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/ott-entry",
        Some(json!({ "movie_id": 4, "platform": "prime", "ott_link": "primevideo.com/kalki" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PLATFORM_DATA");
}

#[tokio::test]
async fn ott_entry_for_unknown_movie_is_404() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/ott-entry",
        Some(json!({ "movie_id": 404, "ott_release_date": "2024-08-22" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Images and cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_scan_skips_movies_without_posters() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/images/scan?limit=10",
        None,
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["checked"], 0);
    assert_eq!(json["data"]["broken"], json!([]));
}

#[tokio::test]
async fn homepage_is_cached_until_cleared() {
    let app = seeded_app();
    let total = |json: serde_json::Value| json["data"]["stats"]["total_movies"].clone();

    assert_eq!(total(body_json(get(app.clone(), "/api/home").await).await), 6);

    let response = send(
        app.clone(),
        Method::POST,
        "/api/admin/movies/bulk",
        Some(json!({ "ids": [2], "action": "deactivate" })),
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(total(body_json(get(app.clone(), "/api/home").await).await), 6);

    let response = send(app.clone(), Method::POST, "/api/admin/cache/clear", None, Some(ADMIN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["cleared"], true);

    assert_eq!(total(body_json(get(app, "/api/home").await).await), 5);
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registered_scripts_are_listed_with_class() {
    let json = body_json(admin_get(seeded_app(), "/api/admin/scripts").await).await;
    let jobs = json["data"].as_array().unwrap();
    assert_eq!(jobs.len(), 8);

    let checker = jobs
        .iter()
        .find(|j| j["name"] == "daily_ott_checker")
        .unwrap();
    assert_eq!(checker["heavy"], true);
    assert_eq!(checker["class"], "heavy");
}

#[tokio::test]
async fn unknown_script_is_rejected() {
    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/scripts/rm_rf/run",
        None,
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_SCRIPT");
}

#[tokio::test]
async fn execution_history_starts_empty() {
    let json = body_json(admin_get(seeded_app(), "/api/admin/scripts/executions").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn unknown_execution_is_404() {
    let response = admin_get(seeded_app(), "/api/admin/scripts/executions/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        seeded_app(),
        Method::POST,
        "/api/admin/scripts/executions/42/start",
        None,
        Some(ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
