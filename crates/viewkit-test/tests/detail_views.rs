//! Single-record views served through the router.

mod common;

use viewkit_test::assertions::{assert_contains, assert_has_header, assert_status};

use common::{client, engine, id_of, seeded_store};

#[tokio::test]
async fn test_detail_found() {
    let store = seeded_store();
    let (_dir, engine) = engine();
    let client = client(&store, &engine);
    let id = id_of(&store, "user3").await;

    let response = client.get(&format!("/users/{id}/")).await;
    assert_status(&response, 200);
    assert_contains(&response, "<h1>user3</h1>");
    assert_contains(&response, "<p>testtest</p>");
    assert_has_header(&response, "x-request-id");
}

#[tokio::test]
async fn test_detail_unknown_id_is_404() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/507f1f77bcf86cd799439011/").await;
    assert_status(&response, 404);
}

#[tokio::test]
async fn test_detail_malformed_id_is_404() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/not-an-id/").await;
    assert_status(&response, 404);
}

#[tokio::test]
async fn test_detail_head() {
    let store = seeded_store();
    let (_dir, engine) = engine();
    let client = client(&store, &engine);
    let id = id_of(&store, "user").await;

    let response = client.head(&format!("/users/{id}/")).await;
    assert_status(&response, 200);
    assert_has_header(&response, "content-type");
}

#[tokio::test]
async fn test_detail_options_lists_methods() {
    let store = seeded_store();
    let (_dir, engine) = engine();
    let client = client(&store, &engine);
    let id = id_of(&store, "user").await;

    let response = client.options(&format!("/users/{id}/")).await;
    assert_status(&response, 200);
    let allow = response.header("allow").unwrap();
    assert!(allow.contains("GET"));
    assert!(!allow.contains("POST"));
}

#[tokio::test]
async fn test_json_detail() {
    let store = seeded_store();
    let (_dir, engine) = engine();
    let client = client(&store, &engine);
    let id = id_of(&store, "user").await;

    let response = client.get(&format!("/users/{id}/json/")).await;
    assert_status(&response, 200);
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["username"], "user");
    assert_eq!(body["name"], "foofoo");
}

#[tokio::test]
async fn test_json_detail_missing_is_404() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/507f1f77bcf86cd799439011/json/").await;
    assert_status(&response, 404);
}
