//! Router integration tests over the in-memory store
//!
//! Each test builds the full router with `MemoryStore` behind it and drives
//! it with `tower::ServiceExt::oneshot`, asserting on status codes and JSON
//! bodies the way clients see them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bhajanmala_core::{
    Bhajan, BhajanService, CatalogStore, Membership, MemoryStore, Part, PartService, ReorderEngine,
};
use bhajanmala_server::{create_router, AppState};

struct TestApp {
    store: Arc<MemoryStore>,
    router: Router,
}

fn test_app(featured_ids: Vec<String>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let catalog: Arc<dyn CatalogStore> = store.clone();
    let state = AppState {
        bhajans: Arc::new(BhajanService::new(catalog.clone())),
        parts: Arc::new(PartService::new(catalog.clone())),
        reorder: Arc::new(ReorderEngine::new(catalog)),
        featured_ids: Arc::new(featured_ids),
    };
    TestApp {
        store,
        router: create_router(state, None),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn with_body(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn seed_part(store: &MemoryStore, title: &str, order: i64, bhajan_ids: &[&str]) -> Part {
    let mut part = Part::new(title, order);
    part.bhajans = bhajan_ids
        .iter()
        .enumerate()
        .map(|(index, id)| Membership {
            bhajan_id: id.to_string(),
            order: index as i64 + 1,
        })
        .collect();
    store.create_part(part).await.expect("seed part")
}

async fn seed_bhajan(store: &MemoryStore, id: &str, title: &str, order: i64) -> Bhajan {
    let mut bhajan = Bhajan::new(title, "Bhajan", "lyrics", None, None, order);
    bhajan.id = id.to_string();
    store.create_bhajan(bhajan).await.expect("seed bhajan")
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = test_app(Vec::new());

    let response = app.router.oneshot(get("/api/health")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_and_list_bhajans() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .clone()
        .oneshot(with_body(
            "POST",
            "/api/bhajans",
            json!({
                "title": "Hanuman Chalisa",
                "category": "Chalisa",
                "lyrics": "जय हनुमान ज्ञान गुण सागर"
            }),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    assert_eq!(created["title"], "Hanuman Chalisa");
    assert_eq!(created["language"], "Hindi");
    assert_eq!(created["order"], 1);

    let response = app.router.oneshot(get("/api/bhajans")).await.expect("send");
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn create_bhajan_with_blank_title_is_rejected() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .oneshot(with_body(
            "POST",
            "/api/bhajans",
            json!({ "title": "  ", "category": "Chalisa", "lyrics": "l" }),
        ))
        .await
        .expect("send");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_missing_bhajan_returns_404() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .oneshot(with_body(
            "PATCH",
            "/api/bhajans/missing",
            json!({ "title": "New" }),
        ))
        .await
        .expect("send");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], "BHAJAN_NOT_FOUND");
}

#[tokio::test]
async fn featured_resolves_configured_picks_in_order() {
    let app = test_app(vec!["b2".to_string(), "b1".to_string()]);
    seed_bhajan(&app.store, "b1", "First", 1).await;
    seed_bhajan(&app.store, "b2", "Second", 2).await;

    let response = app
        .router
        .oneshot(get("/api/bhajans/featured"))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|b| b["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn catalog_reorder_applies_bulk_assignments() {
    let app = test_app(Vec::new());
    seed_bhajan(&app.store, "b1", "First", 1).await;
    seed_bhajan(&app.store, "b2", "Second", 2).await;

    let response = app
        .router
        .clone()
        .oneshot(with_body(
            "POST",
            "/api/bhajans/reorder",
            json!({ "order": [ { "id": "b1", "order": 2 }, { "id": "b2", "order": 1 } ] }),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let response = app.router.oneshot(get("/api/bhajans")).await.expect("send");
    let body = json_body(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|b| b["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn parts_listing_resolves_memberships_in_order() {
    let app = test_app(Vec::new());
    seed_bhajan(&app.store, "b1", "First", 1).await;
    seed_bhajan(&app.store, "b2", "Second", 2).await;
    seed_part(&app.store, "भाग 1", 1, &["b2", "b1"]).await;

    let response = app.router.oneshot(get("/api/parts")).await.expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let parts = body.as_array().expect("array");
    assert_eq!(parts.len(), 1);
    let titles: Vec<&str> = parts[0]["bhajans"]
        .as_array()
        .expect("bhajans")
        .iter()
        .map(|b| b["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn reorder_moves_a_bhajan_between_parts() {
    let app = test_app(Vec::new());
    for (id, title) in [("a", "A"), ("b", "B"), ("x", "X"), ("y", "Y")] {
        seed_bhajan(&app.store, id, title, 1).await;
    }
    let source = seed_part(&app.store, "भाग 1", 1, &["a", "b"]).await;
    let target = seed_part(&app.store, "भाग 2", 2, &["x", "y"]).await;

    let response = app
        .router
        .clone()
        .oneshot(with_body(
            "PATCH",
            "/api/parts/reorder",
            json!({
                "sourcePartId": source.id,
                "targetPartId": target.id,
                "movedBhajanId": "a",
                "anchorBhajanId": "y"
            }),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let stored_target = app
        .store
        .get_part(&target.id)
        .await
        .expect("get")
        .expect("target");
    let ids: Vec<String> = stored_target
        .ordered_memberships()
        .into_iter()
        .map(|m| m.bhajan_id)
        .collect();
    assert_eq!(ids, vec!["x", "a", "y"]);
}

#[tokio::test]
async fn reorder_with_blank_field_returns_400() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .oneshot(with_body(
            "PATCH",
            "/api/parts/reorder",
            json!({
                "sourcePartId": "",
                "targetPartId": "p",
                "movedBhajanId": "a",
                "anchorBhajanId": "b"
            }),
        ))
        .await
        .expect("send");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_INSTRUCTION");
}

#[tokio::test]
async fn reorder_with_unknown_part_returns_404() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .oneshot(with_body(
            "PATCH",
            "/api/parts/reorder",
            json!({
                "sourcePartId": "missing",
                "targetPartId": "missing",
                "movedBhajanId": "a",
                "anchorBhajanId": "b"
            }),
        ))
        .await
        .expect("send");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], "PART_NOT_FOUND");
}

#[tokio::test]
async fn part_create_rename_delete_lifecycle() {
    let app = test_app(Vec::new());

    let response = app
        .router
        .clone()
        .oneshot(with_body("POST", "/api/parts", json!({ "title": "भाग 1" })))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().expect("id").to_string();

    let response = app
        .router
        .clone()
        .oneshot(with_body(
            "PATCH",
            &format!("/api/parts/{id}"),
            json!({ "title": "Renamed" }),
        ))
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["title"], "Renamed");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/parts/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/parts/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
