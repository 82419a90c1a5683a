//! Integration tests for the public catalog endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, seeded_app};

fn titles(items: &serde_json::Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_matches_titles_case_insensitively() {
    let response = get(seeded_app(), "/api/search?q=SALAAR").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(titles(&json["results"]), vec!["Salaar"]);
    assert_eq!(json["total"], 1);
    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 12);
    assert_eq!(json["has_more"], false);
}

#[tokio::test]
async fn search_skips_inactive_movies() {
    let json = body_json(get(seeded_app(), "/api/search?q=old%20print").await).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn search_without_matches_degrades_to_empty() {
    // No TMDB key is configured, so the import fallback finds nothing.
    let response = get(seeded_app(), "/api/search?q=zzzz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["results"], serde_json::json!([]));
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn blank_search_returns_nothing() {
    let json = body_json(get(seeded_app(), "/api/search").await).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn search_paginates() {
    // Salaar, Kalki 2898 AD and Baahubali all contain "al".
    let json = body_json(get(seeded_app(), "/api/search?q=al&per_page=2").await).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["total"], 3);
    assert_eq!(json["has_more"], true);
    // Most popular first.
    assert_eq!(titles(&json["results"])[0], "Salaar");
}

#[tokio::test]
async fn single_character_search_returns_nothing() {
    let response = get(seeded_app(), "/api/search?q=%20a%20").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
    assert_eq!(json["results"], serde_json::json!([]));
    assert_eq!(json["has_more"], false);
}

// ---------------------------------------------------------------------------
// Listings and filter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn free_category_lists_free_platform_titles() {
    let response = get(seeded_app(), "/api/movies/free").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(titles(&json["data"]["items"]), vec!["Baahubali"]);
    assert_eq!(json["data"]["total"], 1);
}

#[tokio::test]
async fn unknown_category_is_404() {
    let response = get(seeded_app(), "/api/movies/blockbusters").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn filter_by_platform_sorted_by_rating() {
    let response = get(seeded_app(), "/api/filter?platform=netflix&sort=rating").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(titles(&json["data"]["items"]), vec!["Hi Nanna", "Pushpa 2"]);
    assert_eq!(json["data"]["total"], 2);
}

#[tokio::test]
async fn filter_with_platform_list_ors_entries() {
    let json = body_json(
        get(seeded_app(), "/api/filter?platform=prime,youtube&sort=popularity").await,
    )
    .await;
    assert_eq!(titles(&json["data"]["items"]), vec!["Salaar", "Baahubali"]);
}

#[tokio::test]
async fn filter_rejects_unknown_sort() {
    let response = get(seeded_app(), "/api/filter?sort=loudest").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn homepage_has_every_section() {
    let json = body_json(get(seeded_app(), "/api/home").await).await;
    let home = &json["data"];
    for section in [
        "featured",
        "continue_watching",
        "popular_on_radar",
        "new_on_ott",
        "hidden_gems",
        "free_picks",
    ] {
        assert!(home[section].is_array(), "missing section {section}");
    }
    assert!(home["stats"]["total_movies"].as_u64().unwrap() >= 1);
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_by_tmdb_id() {
    let response = get(seeded_app(), "/api/movie/1001").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let detail = &json["data"];
    assert_eq!(detail["movie"]["title"], "Pushpa 2");
    assert_eq!(detail["links"][0]["platform"], "netflix");
    assert_eq!(detail["primary_platforms"], serde_json::json!(["netflix"]));
    assert_eq!(detail["release_status"], "upcoming");
    assert!(detail["similar"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["id"] != 1));
}

#[tokio::test]
async fn detail_by_slug() {
    let json = body_json(get(seeded_app(), "/api/movie/hi-nanna").await).await;
    assert_eq!(json["data"]["movie"]["title"], "Hi Nanna");
}

#[tokio::test]
async fn detail_without_platforms_is_served_when_providers_are_down() {
    let response = get(seeded_app(), "/api/movie/1004").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["movie"]["title"], "Kalki 2898 AD");
    assert_eq!(json["data"]["links"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_movie_is_404() {
    let response = get(seeded_app(), "/api/movie/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn series_by_slug_groups_seasons() {
    let response = get(seeded_app(), "/api/series/kota-factory").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["series_name"], "kota factory");
    assert_eq!(json["data"]["seasons"][0]["season_number"], 1);
    assert_eq!(
        json["data"]["seasons"][0]["episodes"][0]["title"],
        "Kota Factory"
    );
}

#[tokio::test]
async fn unknown_series_is_404() {
    let response = get(seeded_app(), "/api/series/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
