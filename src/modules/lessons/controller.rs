use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{OptionalAuthUser, RequireAdmin};
use crate::modules::lessons::model::{CreateLessonDto, Lesson};
use crate::modules::publication::model::{SetActiveDto, TransitionDto, TransitionResponse};
use crate::modules::publication::service::PublicationService;
use crate::modules::subjects::catalog::CatalogService;
use crate::modules::subjects::controller::resolve_audience;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/subjects/{subject_id}/lessons",
    params(
        ("subject_id" = Uuid, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Lessons of the subject visible to the caller", body = Vec<Lesson>),
        (status = 404, description = "Subject not found or not visible to the caller")
    ),
    tag = "Lessons",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject_lessons(
    State(state): State<AppState>,
    OptionalAuthUser(maybe_user): OptionalAuthUser,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let audience = resolve_audience(&state, maybe_user).await?;
    let lessons = SubjectService::lessons_of_visible(&state.db, audience, subject_id).await?;

    Ok(Json(lessons))
}

#[utoipa::path(
    post,
    path = "/api/subjects/{subject_id}/lessons",
    params(
        ("subject_id" = Uuid, Path, description = "Subject ID")
    ),
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created in draft, inactive", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 404, description = "Subject not found"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(subject_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = CatalogService::create_lesson(&state.db, subject_id, dto).await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    post,
    path = "/api/lessons/{id}/transition",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    request_body = TransitionDto,
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Version conflict; refetch and retry"),
        (status = 422, description = "Action not legal from the current status")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn transition_lesson(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<TransitionDto>,
) -> Result<Json<TransitionResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let action = dto.action;
    let outcome = PublicationService::transition_lesson(&state.db, id, actor, dto).await?;

    crate::metrics::track_transition("lesson", action.as_str());

    Ok(Json(outcome))
}

#[utoipa::path(
    patch,
    path = "/api/lessons/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Lesson ID")
    ),
    request_body = SetActiveDto,
    responses(
        (status = 200, description = "Activation flag updated", body = Lesson),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Version conflict; refetch and retry")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_lesson_active(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<SetActiveDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = PublicationService::set_lesson_active(&state.db, id, dto).await?;

    Ok(Json(lesson))
}
