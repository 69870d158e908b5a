//! Path parameters echoed back as JSON.

mod common;

use serde_json::json;
use viewkit_test::assertions::{assert_json_eq, assert_status};

use common::{client, engine, seeded_store};

#[tokio::test]
async fn test_json_view_params() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/echo/john/hello-world/").await;
    assert_status(&response, 200);
    assert_json_eq(
        &response,
        &json!({"params": {"user": "john", "slug": "hello-world"}}),
    );
}

#[tokio::test]
async fn test_json_view_rejects_post() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.post("/echo/john/hello-world/", &[]).await;
    assert_status(&response, 405);
}

#[tokio::test]
async fn test_unrouted_path_is_404() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/nowhere/").await;
    assert_status(&response, 404);
}
