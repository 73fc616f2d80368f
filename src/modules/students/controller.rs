use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::{RequireAdmin, RequireStudent};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, StudentProfile,
    UpdateSettingsDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students/me",
    responses(
        (status = 200, description = "The caller's student profile", body = StudentProfile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student accounts only"),
        (status = 404, description = "No profile for this account")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<StudentProfile>, AppError> {
    let student_id = auth_user.user_id()?;
    let student = StudentService::get_student(&state.db, student_id).await?;

    Ok(Json(student.into()))
}

#[utoipa::path(
    patch,
    path = "/api/students/me/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings updated; next catalog query reflects the new level", body = StudentProfile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student accounts only"),
        (status = 404, description = "No profile for this account")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_settings(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Json(dto): Json<UpdateSettingsDto>,
) -> Result<Json<StudentProfile>, AppError> {
    let student_id = auth_user.user_id()?;
    let student = StudentService::update_education_level(
        &state.db,
        student_id,
        dto.education.education_level,
    )
    .await?;

    Ok(Json(student.into()))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student profile created", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Paginated list of students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(&state.db, filters).await?;

    Ok(Json(students))
}
