//! Paginated and filtered list views served through the router.

mod common;

use viewkit_test::assertions::{assert_contains, assert_not_contains, assert_status};

use common::{client, engine, seeded_store};

fn items(body: &str) -> usize {
    body.matches("<li>").count()
}

#[tokio::test]
async fn test_unpaginated_list_shows_everything() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/").await;
    assert_status(&response, 200);
    assert_eq!(items(&response.text()), 12);
    assert_contains(&response, "<li>user</li>");
}

#[tokio::test]
async fn test_pages_from_path() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    for (page, expected) in [(1, 3), (2, 3), (3, 3), (4, 2)] {
        let response = client
            .get(&format!("/users/by-name/testtest/page/{page}/"))
            .await;
        assert_status(&response, 200);
        assert_eq!(items(&response.text()), expected, "page {page}");
        assert_contains(&response, &format!("page {page} of 4"));
    }
}

#[tokio::test]
async fn test_last_page_contents() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/by-name/testtest/page/4/").await;
    assert_contains(&response, "<li>user10</li>");
    assert_contains(&response, "<li>user11</li>");
    assert_not_contains(&response, "<li>user9</li>");
}

#[tokio::test]
async fn test_page_from_query_string() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/by-name/testtest/?page=2").await;
    assert_status(&response, 200);
    assert_contains(&response, "<li>user4</li>");
    assert_contains(&response, "page 2 of 4");
}

#[tokio::test]
async fn test_page_past_end_is_404() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/by-name/testtest/page/5/").await;
    assert_status(&response, 404);
}

#[tokio::test]
async fn test_malformed_page_falls_back_to_first() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/by-name/testtest/?page=abc").await;
    assert_status(&response, 200);
    assert_contains(&response, "<li>user1</li>");
    assert_contains(&response, "page 1 of 4");
}

#[tokio::test]
async fn test_filter_excludes_other_names() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/users/by-name/foofoo/").await;
    assert_status(&response, 200);
    assert_eq!(items(&response.text()), 1);
    assert_contains(&response, "<li>user</li>");
}

#[tokio::test]
async fn test_list_rejects_post() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.post("/users/", &[]).await;
    assert_status(&response, 405);
    assert!(response.header("allow").unwrap().contains("GET"));
}

#[tokio::test]
async fn test_json_list() {
    let (_dir, engine) = engine();
    let client = client(&seeded_store(), &engine);

    let response = client.get("/api/users/testtest/?page=3").await;
    assert_status(&response, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["user_list"].as_array().unwrap().len(), 1);
    assert_eq!(body["user_list"][0]["username"], "user11");
    assert_eq!(body["current_page"], 3);
    assert_eq!(body["page_count"], 3);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["params"]["name"], "testtest");
}
