//! End-to-end coverage of the generic CRUD surface: round trips, the
//! pagination window, the error taxonomy, and constraint handling.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn category_create_get_roundtrip() {
    let app = TestApp::spawn().await;

    let id = app.seed_category("Tools").await;
    let res = app.get(&format!("/api/categories/{id}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "id": id, "name": "Tools" }));
}

#[tokio::test]
async fn customer_read_nests_country() {
    let app = TestApp::spawn().await;

    let country = app.seed_country("France").await;
    let id = app.seed_customer("jane@example.com", country).await;

    let res = app.get(&format!("/api/customers/{id}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json(),
        json!({
            "id": id,
            "email": "jane@example.com",
            "firstname": "Jane",
            "lastname": "Doe",
            "country": { "id": country, "name": "France" },
        })
    );
}

#[tokio::test]
async fn product_read_nests_category_and_renders_price_at_two_decimals() {
    let app = TestApp::spawn().await;

    let category = app.seed_category("Tools").await;
    let id = app
        .create(
            "/api/products",
            json!({
                "name": "Hammer",
                "description": "Steel claw hammer",
                "price": "12.5",
                "category": category,
                "status": "ACTIVE",
            }),
        )
        .await;

    let res = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["price"], "12.50");
    assert_eq!(body["category"], json!({ "id": category, "name": "Tools" }));
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["tags"], json!([]));
}

#[tokio::test]
async fn product_tags_are_auto_created_and_deduplicated() {
    let app = TestApp::spawn().await;

    let category = app.seed_category("Tools").await;
    let id = app
        .create(
            "/api/products",
            json!({
                "name": "Hammer",
                "price": "12.50",
                "category": category,
                "status": "ACTIVE",
                "tags": ["blue", "steel", "blue"],
            }),
        )
        .await;

    let res = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(res.json()["tags"], json!(["blue", "steel"]));
    assert_eq!(app.count("/api/tags").await, 2);

    // Replacing the product replaces its tag set; existing tags are reused,
    // never deleted.
    let res = app
        .put(
            &format!("/api/products/{id}"),
            json!({
                "name": "Hammer",
                "price": "12.50",
                "category": category,
                "status": "ACTIVE",
                "tags": ["steel"],
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(res.json()["tags"], json!(["steel"]));
    assert_eq!(app.count("/api/tags").await, 2);
}

#[tokio::test]
async fn replace_then_get_shows_new_state() {
    let app = TestApp::spawn().await;

    let id = app.seed_category("Tols").await;
    let res = app
        .put(&format!("/api/categories/{id}"), json!({ "name": "Tools" }))
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/categories/{id}")).await;
    assert_eq!(res.json()["name"], "Tools");
}

#[tokio::test]
async fn delete_then_get_returns_not_found() {
    let app = TestApp::spawn().await;

    let id = app.seed_category("Tools").await;
    let res = app.delete(&format!("/api/categories/{id}")).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/categories/{id}")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Not found");
}

#[tokio::test]
async fn delete_unknown_id_is_404_and_leaves_collection_unchanged() {
    let app = TestApp::spawn().await;

    app.seed_category("Tools").await;
    let res = app.delete("/api/categories/999").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("/api/categories").await, 1);
}

#[tokio::test]
async fn replace_unknown_id_is_404() {
    let app = TestApp::spawn().await;

    let res = app
        .put("/api/categories/999", json!({ "name": "Tools" }))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_name_is_an_integrity_error_with_single_row_kept() {
    let app = TestApp::spawn().await;

    app.seed_category("Tools").await;
    let res = app.post("/api/categories", json!({ "name": "Tools" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Integrity error");
    assert_eq!(app.count("/api/categories").await, 1);
}

#[tokio::test]
async fn duplicate_customer_email_is_an_integrity_error() {
    let app = TestApp::spawn().await;

    let country = app.seed_country("France").await;
    app.seed_customer("jane@example.com", country).await;
    let res = app
        .post(
            "/api/customers",
            json!({
                "email": "jane@example.com",
                "firstname": "Other",
                "lastname": "Person",
                "country": country,
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Integrity error");
}

#[tokio::test]
async fn deleting_a_referenced_category_is_rejected_and_nothing_changes() {
    let app = TestApp::spawn().await;

    let category = app.seed_category("Tools").await;
    let product = app.seed_product("Hammer", "12.50", category).await;

    let res = app.delete(&format!("/api/categories/{category}")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Integrity error");

    let res = app.get(&format!("/api/products/{product}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["category"]["id"], category);
}

#[tokio::test]
async fn unresolvable_reference_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            "/api/products",
            json!({
                "name": "Hammer",
                "price": "12.50",
                "category": 999,
                "status": "ACTIVE",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.message(), "category: referenced entity 999 not found");
    assert_eq!(app.count("/api/products").await, 0);
}

#[tokio::test]
async fn field_validation_failures_are_422_naming_the_field() {
    let app = TestApp::spawn().await;

    let country = app.seed_country("France").await;
    let res = app
        .post(
            "/api/customers",
            json!({
                "email": "not-an-email",
                "firstname": "Jane",
                "lastname": "Doe",
                "country": country,
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.message().contains("email"), "got: {}", res.message());
}

#[tokio::test]
async fn unknown_product_status_is_rejected() {
    let app = TestApp::spawn().await;

    let category = app.seed_category("Tools").await;
    let res = app
        .post(
            "/api/products",
            json!({
                "name": "Hammer",
                "price": "12.50",
                "category": category,
                "status": "BOGUS",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn post_without_body_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let res = app
        .request(axum::http::Method::POST, "/api/categories", None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "No input data provided");
}

#[tokio::test]
async fn list_pages_are_windows_in_id_order_with_a_next_locator() {
    let app = TestApp::spawn().await;

    for i in 1..=10 {
        app.seed_category(&format!("cat-{i:02}")).await;
    }

    let res = app.get("/api/categories?limit=3&offset=1").await;
    assert_eq!(res.status, StatusCode::OK);
    let names: Vec<String> = res
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["cat-02", "cat-03", "cat-04"]);
    assert_eq!(
        res.headers.get("x-next").unwrap().to_str().unwrap(),
        "/api/categories?offset=4&limit=3"
    );
}

#[tokio::test]
async fn list_defaults_and_the_advisory_locator_past_the_end() {
    let app = TestApp::spawn().await;

    app.seed_category("Tools").await;
    let res = app.get("/api/categories").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json().as_array().unwrap().len(), 1);
    // The locator is emitted even when the next window would be empty.
    assert_eq!(
        res.headers.get("x-next").unwrap().to_str().unwrap(),
        "/api/categories?offset=100&limit=100"
    );
}

#[tokio::test]
async fn out_of_range_pagination_is_rejected_before_querying() {
    let app = TestApp::spawn().await;

    for query in ["limit=0", "limit=101", "offset=-1"] {
        let res = app.get(&format!("/api/categories?{query}")).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{query}");
    }
}
