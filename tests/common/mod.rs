#![allow(dead_code)]

//! In-process test harness: a migrated in-memory SQLite store behind the
//! real router, driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use shop_api::config::AppConfig;
use shop_api::db::{establish_connection, run_migrations, DbConfig};
use shop_api::{app, AppState};

pub struct TestApp {
    pub db: DatabaseConnection,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "response body is not JSON ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn message(&self) -> String {
        self.json()["message"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

impl TestApp {
    /// A single shared connection keeps the in-memory database alive for
    /// the whole test.
    pub async fn spawn() -> TestApp {
        let db = establish_connection(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        run_migrations(&db).await.unwrap();

        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: 1,
            db_min_connections: 1,
        };
        let router = app(AppState::new(db.clone(), config));
        TestApp { db, router }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body: bytes,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// POST and unwrap the created id.
    pub async fn create(&self, path: &str, body: Value) -> i32 {
        let res = self.post(path, body).await;
        assert_eq!(
            res.status,
            StatusCode::CREATED,
            "create {path} failed: {}",
            String::from_utf8_lossy(&res.body)
        );
        res.json().as_i64().unwrap() as i32
    }

    /// Number of rows the list endpoint returns on its first page.
    pub async fn count(&self, path: &str) -> usize {
        let res = self.get(path).await;
        assert_eq!(res.status, StatusCode::OK);
        res.json().as_array().unwrap().len()
    }

    pub async fn seed_category(&self, name: &str) -> i32 {
        self.create("/api/categories", serde_json::json!({ "name": name }))
            .await
    }

    pub async fn seed_country(&self, name: &str) -> i32 {
        self.create("/api/countries", serde_json::json!({ "name": name }))
            .await
    }

    pub async fn seed_customer(&self, email: &str, country: i32) -> i32 {
        self.create(
            "/api/customers",
            serde_json::json!({
                "email": email,
                "firstname": "Jane",
                "lastname": "Doe",
                "country": country,
            }),
        )
        .await
    }

    pub async fn seed_product(&self, name: &str, price: &str, category: i32) -> i32 {
        self.create(
            "/api/products",
            serde_json::json!({
                "name": name,
                "price": price,
                "category": category,
                "status": "ACTIVE",
            }),
        )
        .await
    }

    /// Create an order from (product id, quantity) pairs.
    pub async fn seed_order(&self, customer: i32, lines: &[(i32, i32)]) -> i32 {
        let detail: Vec<Value> = lines
            .iter()
            .map(|(product, quantity)| {
                serde_json::json!({ "product": product, "quantity": quantity })
            })
            .collect();
        self.create(
            "/api/orders",
            serde_json::json!({ "customer": customer, "detail": detail }),
        )
        .await
    }

    pub async fn set_order_status(&self, order: i32, status: &str) {
        let res = self
            .put(
                &format!("/api/orders/{order}"),
                serde_json::json!({ "status": status }),
            )
            .await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);
    }
}
