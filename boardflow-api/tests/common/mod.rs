/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup (gated on `TEST_DATABASE_URL`)
/// - Test user creation and JWT token generation
/// - Router construction and request helpers
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use boardflow_api::app::{build_router, AppState};
use boardflow_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use boardflow_shared::auth::jwt::{create_token, Claims, TokenType};
use boardflow_shared::auth::password;
use boardflow_shared::db::migrations::ensure_database_exists;
use boardflow_shared::models::board::Board;
use boardflow_shared::models::column::Column;
use boardflow_shared::models::task::{CreateTask, Task, TaskPriority};
use boardflow_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a test context against `TEST_DATABASE_URL`, or `None` when
    /// the variable is unset (so the suite is skippable without a database)
    pub async fn try_new() -> Option<Self> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        Some(
            Self::new(&url)
                .await
                .expect("Failed to build test context"),
        )
    }

    async fn new(url: &str) -> anyhow::Result<Self> {
        ensure_database_exists(url).await?;

        let db = PgPool::connect(url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = Self::create_user(&db, &format!("test-{}", Uuid::new_v4())).await?;
        let jwt_token = Self::access_token_for(user.id)?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                static_dir: None,
            },
            database: DatabaseConfig {
                url: url.to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let app = build_router(AppState::new(db.clone(), config));

        Ok(TestContext {
            db,
            app,
            user,
            jwt_token,
        })
    }

    /// Creates a user with the shared test password
    pub async fn create_user(db: &PgPool, username: &str) -> anyhow::Result<User> {
        let password_hash = password::hash_password(TEST_PASSWORD)?;
        let user = User::create(
            db,
            CreateUser {
                username: username.to_string(),
                password_hash,
            },
        )
        .await?;
        Ok(user)
    }

    /// Mints an access token for an arbitrary user
    pub fn access_token_for(user_id: Uuid) -> anyhow::Result<String> {
        let claims = Claims::new(user_id, TokenType::Access);
        Ok(create_token(&claims, TEST_JWT_SECRET)?)
    }

    /// Returns authorization header value for the context's user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a JSON request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
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

        self.app.clone().call(request).await.unwrap()
    }

    /// Sends an authenticated JSON request as the context's user
    pub async fn authed(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        self.request(method, uri, Some(&self.jwt_token), body).await
    }

    /// Cleans up test data (cascades to boards, columns, tasks)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Reads a response body as JSON, panicking with the body on failure
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("Invalid JSON body: {e}: {}", String::from_utf8_lossy(&body)))
}

/// Asserts a status and returns the JSON body
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    if actual != status {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        panic!(
            "Expected {status}, got {actual}: {}",
            String::from_utf8_lossy(&body)
        );
    }
    json_body(response).await
}

/// Creates a board directly through the model layer
pub async fn create_test_board(ctx: &TestContext, title: &str) -> anyhow::Result<Board> {
    Ok(Board::create(&ctx.db, ctx.user.id, title).await?)
}

/// Creates a column directly through the model layer
pub async fn create_test_column(
    ctx: &TestContext,
    board_id: Uuid,
    title: &str,
) -> anyhow::Result<Column> {
    Ok(Column::create(&ctx.db, board_id, title).await?)
}

/// Creates a task directly through the model layer
pub async fn create_test_task(
    ctx: &TestContext,
    column_id: Uuid,
    title: &str,
) -> anyhow::Result<Task> {
    Ok(Task::create(
        &ctx.db,
        column_id,
        CreateTask {
            title: title.to_string(),
            description: None,
            deadline: None,
            priority: TaskPriority::Low,
        },
    )
    .await?)
}
