/// Common test utilities for integration tests
///
/// Provides a [`TestContext`] with a database pool, a built router, and a
/// pre-created creator/clipper pair with bearer tokens. Tests are skipped
/// when `DATABASE_URL` is not set so the suite still passes on machines
/// without a local PostgreSQL.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use clipconnect_api::app::{build_router, AppState};
use clipconnect_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use clipconnect_shared::auth::jwt::{create_token, Claims};
use clipconnect_shared::auth::password;
use clipconnect_shared::models::gig::{CreateGig, Difficulty, Gig};
use clipconnect_shared::models::user::{CreateUser, Role, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub creator: User,
    pub creator_token: String,
    pub clipper: User,
    pub clipper_token: String,
}

impl TestContext {
    /// Creates a test context, or None when no test database is configured
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return Ok(None);
        };

        let db = PgPool::connect(&database_url).await?;

        // Path is relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                expires_in_hours: 1,
            },
            cloudinary: None,
        };

        let creator = create_test_user(&db, Role::Creator).await?;
        let clipper = create_test_user(&db, Role::Clipper).await?;

        let creator_token = token_for(&creator)?;
        let clipper_token = token_for(&clipper)?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            creator,
            creator_token,
            clipper,
            clipper_token,
        }))
    }

    /// Sends a JSON request through the router
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response {
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

        self.app.call(request).await.unwrap()
    }

    /// Creates a gig owned by the context's creator
    pub async fn create_gig(&self) -> anyhow::Result<Gig> {
        let gig = Gig::create(
            &self.db,
            CreateGig {
                creator_id: self.creator.id,
                title: format!("Test gig {}", Uuid::new_v4()),
                description: "Cut my stream VOD into highlights".to_string(),
                pay: 50.0,
                requirements: "60s vertical cut".to_string(),
                difficulty: Difficulty::Medium,
                image_url: None,
                image_public_id: None,
            },
        )
        .await?;

        Ok(gig)
    }

    /// Cleans up test data (cascades to gigs and applications)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1 OR id = $2")
            .bind(self.creator.id)
            .bind(self.clipper.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

async fn create_test_user(db: &PgPool, role: Role) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: password::hash_password("test-password-123")?,
            role,
            first_name: Some("Test".to_string()),
            last_name: None,
        },
    )
    .await?;

    Ok(user)
}

fn token_for(user: &User) -> anyhow::Result<String> {
    let claims = Claims::new(user.id, user.role, chrono::Duration::hours(1));
    Ok(create_token(&claims, TEST_JWT_SECRET)?)
}

/// Asserts a status and returns the parsed JSON body
pub async fn expect_status(response: Response, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8_lossy(&body);

    assert_eq!(status, expected, "unexpected status, body: {body_str}");

    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
