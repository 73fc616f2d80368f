use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use ardoise::config::cors::CorsConfig;
use ardoise::config::jwt::JwtConfig;
use ardoise::config::rate_limit::RateLimitConfig;
use ardoise::middleware::auth::UserRole;
use ardoise::router::init_router;
use ardoise::state::AppState;
use ardoise::utils::jwt::create_access_token;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::default(),
    };
    init_router(state)
}

pub fn admin_token() -> String {
    create_access_token(
        Uuid::new_v4(),
        "admin@test.com",
        UserRole::Admin,
        &JwtConfig::from_env(),
    )
    .unwrap()
}

pub fn student_token(student_id: Uuid) -> String {
    create_access_token(
        student_id,
        "student@test.com",
        UserRole::Student,
        &JwtConfig::from_env(),
    )
    .unwrap()
}

/// Fire one request against a fresh router and return status plus parsed
/// JSON body (Null for empty bodies).
pub async fn request(
    pool: &PgPool,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = setup_test_app(pool.clone()).await;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Extractor rejections (bad path params, malformed JSON) come back
    // as plain text; surface them as a JSON string so asserts can still
    // print something useful.
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };

    (status, json)
}

/// Create a student profile through the admin surface and return its id.
#[allow(dead_code)]
pub async fn create_student(pool: &PgPool, admin: &str, education_level: &str) -> Uuid {
    let (status, body) = request(
        pool,
        "POST",
        "/api/students",
        Some(admin),
        Some(serde_json::json!({
            "first_name": "Test",
            "last_name": "Élève",
            "education_level": education_level
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create_student failed: {}", body);

    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

/// Create a subject through the admin surface and return its id (new
/// subjects start at version 1).
#[allow(dead_code)]
pub async fn create_subject(pool: &PgPool, admin: &str, title: &str, level: &str) -> Uuid {
    let (status, body) = request(
        pool,
        "POST",
        "/api/subjects",
        Some(admin),
        Some(serde_json::json!({
            "title": title,
            "category": "Mathématiques",
            "level": level
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create_subject failed: {}", body);

    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

/// Create a lesson under a subject and return its id.
#[allow(dead_code)]
pub async fn create_lesson(pool: &PgPool, admin: &str, subject_id: Uuid, title: &str) -> Uuid {
    let (status, body) = request(
        pool,
        "POST",
        &format!("/api/subjects/{}/lessons", subject_id),
        Some(admin),
        Some(serde_json::json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create_lesson failed: {}", body);

    Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
}

#[allow(dead_code)]
pub async fn transition(
    pool: &PgPool,
    admin: &str,
    path: &str,
    action: &str,
    expected_version: i64,
) -> (StatusCode, serde_json::Value) {
    request(
        pool,
        "POST",
        &format!("{}/transition", path),
        Some(admin),
        Some(serde_json::json!({
            "action": action,
            "expected_version": expected_version
        })),
    )
    .await
}

#[allow(dead_code)]
pub async fn set_active(
    pool: &PgPool,
    admin: &str,
    path: &str,
    is_active: bool,
    expected_version: i64,
) -> (StatusCode, serde_json::Value) {
    request(
        pool,
        "PATCH",
        &format!("{}/active", path),
        Some(admin),
        Some(serde_json::json!({
            "is_active": is_active,
            "expected_version": expected_version
        })),
    )
    .await
}

/// Walk a freshly created subject with one fresh lesson through
/// submit/approve/activate so both are publicly visible.
#[allow(dead_code)]
pub async fn publish_subject_with_lesson(
    pool: &PgPool,
    admin: &str,
    title: &str,
    level: &str,
) -> Uuid {
    let subject_id = create_subject(pool, admin, title, level).await;
    let lesson_id = create_lesson(pool, admin, subject_id, "Introduction").await;

    let subject_path = format!("/api/subjects/{}", subject_id);
    let lesson_path = format!("/api/lessons/{}", lesson_id);

    for (path, base) in [(&subject_path, 1), (&lesson_path, 1)] {
        let (status, _) = transition(pool, admin, path, "submit", base).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = transition(pool, admin, path, "approve", base + 1).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = set_active(pool, admin, path, true, base + 2).await;
        assert_eq!(status, StatusCode::OK);
    }

    subject_id
}
