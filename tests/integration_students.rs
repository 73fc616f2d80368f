mod common;

use axum::http::StatusCode;
use common::{admin_token, create_student, publish_subject_with_lesson, request, student_token};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_student_profile_carries_mapped_label(pool: PgPool) {
    let admin = admin_token();
    let student_id = create_student(&pool, &admin, "SECONDE").await;

    let (status, body) = request(
        &pool,
        "GET",
        "/api/students/me",
        Some(&student_token(student_id)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["education_level"], "SECONDE");
    assert_eq!(body["subject_level"], "2nde");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_settings_update_changes_visible_subjects_immediately(pool: PgPool) {
    let admin = admin_token();
    let sixieme_subject =
        publish_subject_with_lesson(&pool, &admin, "Maths 6ème", "6ème").await;
    let cinquieme_subject =
        publish_subject_with_lesson(&pool, &admin, "Maths 5ème", "5ème").await;

    let student_id = create_student(&pool, &admin, "6EME").await;
    let token = student_token(student_id);

    let (_, body) = request(&pool, "GET", "/api/subjects", Some(&token), None).await;
    assert_eq!(body[0]["id"], sixieme_subject.to_string());

    // Change the enrolled level; the acknowledged update must be
    // observed by the very next catalog query.
    let (status, body) = request(
        &pool,
        "PATCH",
        "/api/students/me/settings",
        Some(&token),
        Some(serde_json::json!({
            "education": { "education_level": "5EME" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["education_level"], "5EME");
    assert_eq!(body["subject_level"], "5ème");

    let (_, body) = request(&pool, "GET", "/api/subjects", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], cinquieme_subject.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_token_without_profile_is_not_found(pool: PgPool) {
    let token = student_token(uuid::Uuid::new_v4());

    let (status, body) = request(&pool, "GET", "/api/subjects", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("profile"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_settings_rejects_unknown_level_code(pool: PgPool) {
    let admin = admin_token();
    let student_id = create_student(&pool, &admin, "CM1").await;

    let (status, _) = request(
        &pool,
        "PATCH",
        "/api/students/me/settings",
        Some(&student_token(student_id)),
        Some(serde_json::json!({
            "education": { "education_level": "SUPERIEUR" }
        })),
    )
    .await;

    // Unknown codes die in deserialization; they never reach a mapping
    // fallback.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_listing_is_admin_only_and_filterable(pool: PgPool) {
    let admin = admin_token();
    create_student(&pool, &admin, "CM2").await;
    create_student(&pool, &admin, "CM2").await;
    let other = create_student(&pool, &admin, "TERMINALE").await;

    let (status, body) = request(
        &pool,
        "GET",
        "/api/students?education_level=CM2",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);

    let (status, _) = request(
        &pool,
        "GET",
        "/api/students",
        Some(&student_token(other)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
