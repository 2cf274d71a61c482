/// Common test utilities for integration tests
///
/// Provides a `TestContext` with an in-memory SQLite database, the fully
/// built router, and helpers for registering users, minting admin tokens,
/// and driving the app as a `tower::Service`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{ApiConfig, Config, JwtConfig};
use tasktrack_shared::auth::jwt::{create_token, Claims};
use tasktrack_shared::db::migrations::run_migrations;
use tasktrack_shared::db::pool::DatabaseConfig;
use tasktrack_shared::models::user::{CreateUser, User, UserRole};
use tower::Service as _;

/// Signing secret used by every test token
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing the app and its database
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
}

impl TestContext {
    /// Creates a fresh app over an in-memory database
    pub async fn new() -> Self {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&db).await.expect("migrations");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec![],
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        TestContext { db, app }
    }

    /// Sends a request and returns status plus parsed JSON body
    /// (`Value::Null` for empty or non-JSON bodies)
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    /// Registers a user through the API; returns the response body
    /// (`{token, user}`)
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/register",
                None,
                Some(serde_json::json!({"username": username, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body
    }

    /// Registers a user and returns just the token
    pub async fn user_token(&self, username: &str) -> String {
        let body = self.register(username, "longenough1").await;
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates an admin directly in the store and mints a token for them
    /// (admins are provisioned out of band, not via the API)
    pub async fn admin_token(&self) -> String {
        let admin = User::create(
            &self.db,
            CreateUser {
                username: format!("admin-{}", rand_suffix()),
                password_hash: "$argon2id$unused".to_string(),
                role: UserRole::Admin,
            },
        )
        .await
        .expect("admin user");

        create_token(
            &Claims::new(admin.id, &admin.username, admin.role),
            TEST_SECRET,
        )
        .expect("admin token")
    }

    /// Row count of a table, for asserting that rejected requests left the
    /// store untouched
    pub async fn count(&self, table: &str) -> i64 {
        let sql = match table {
            "users" => "SELECT COUNT(*) FROM users",
            "tasks" => "SELECT COUNT(*) FROM tasks",
            other => panic!("unknown table {other}"),
        };
        let row: (i64,) = sqlx::query_as(sql).fetch_one(&self.db).await.unwrap();
        row.0
    }

    /// Creates a task through the API and returns its id
    pub async fn create_task(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .request(
                "POST",
                "/api/tasks",
                Some(token),
                Some(serde_json::json!({"title": title, "assignee": "alice"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "task creation failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

fn rand_suffix() -> u32 {
    // distinct usernames without pulling in a RNG crate
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos()
}
