use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{AuthUser, OptionalAuthUser, RequireAdmin, UserRole};
use crate::modules::publication::model::{SetActiveDto, TransitionDto, TransitionResponse};
use crate::modules::publication::service::PublicationService;
use crate::modules::students::service::StudentService;
use crate::modules::subjects::catalog::CatalogService;
use crate::modules::subjects::model::{
    CreateSubjectDto, Subject, SubjectFilterParams, SubjectView,
};
use crate::modules::subjects::service::SubjectService;
use crate::modules::subjects::visibility::Audience;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Map the caller to an audience. Anonymous callers browse publicly;
/// students are scoped by the education level on their profile, read
/// fresh on every request so a settings change is observed by the very
/// next query.
pub async fn resolve_audience(
    state: &AppState,
    maybe_user: Option<AuthUser>,
) -> Result<Audience, AppError> {
    match maybe_user {
        None => Ok(Audience::Public),
        Some(user) => match user.role()? {
            UserRole::Admin => Ok(Audience::Admin),
            UserRole::Student => {
                let student = StudentService::get_student(&state.db, user.user_id()?).await?;
                Ok(Audience::Student(student.education_level))
            }
        },
    }
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SubjectFilterParams),
    responses(
        (status = 200, description = "Subjects visible to the caller", body = Vec<SubjectView>),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Student token without a profile")
    ),
    tag = "Subjects",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    OptionalAuthUser(maybe_user): OptionalAuthUser,
    Query(filters): Query<SubjectFilterParams>,
) -> Result<Json<Vec<SubjectView>>, AppError> {
    let audience = resolve_audience(&state, maybe_user).await?;
    let views = SubjectService::list_visible(&state.db, audience, filters).await?;

    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(
        ("id" = Uuid, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Subject details", body = SubjectView),
        (status = 404, description = "Subject not found or not visible to the caller")
    ),
    tag = "Subjects",
    security((), ("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    OptionalAuthUser(maybe_user): OptionalAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SubjectView>, AppError> {
    let audience = resolve_audience(&state, maybe_user).await?;
    let view = SubjectService::get_visible(&state.db, audience, id).await?;

    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created in draft, inactive", body = Subject),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 422, description = "Invalid input")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_subject(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = CatalogService::create_subject(&state.db, dto).await?;

    crate::metrics::track_subject_created(subject.level.as_str());

    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    post,
    path = "/api/subjects/{id}/transition",
    params(
        ("id" = Uuid, Path, description = "Subject ID")
    ),
    request_body = TransitionDto,
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Version conflict; refetch and retry"),
        (status = 422, description = "Action not legal from the current status")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn transition_subject(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<TransitionDto>,
) -> Result<Json<TransitionResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let action = dto.action;
    let outcome = PublicationService::transition_subject(&state.db, id, actor, dto).await?;

    crate::metrics::track_transition("subject", action.as_str());

    Ok(Json(outcome))
}

#[utoipa::path(
    patch,
    path = "/api/subjects/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Subject ID")
    ),
    request_body = SetActiveDto,
    responses(
        (status = 200, description = "Activation flag updated", body = Subject),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - administrators only"),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Version conflict; refetch and retry")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_subject_active(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<SetActiveDto>,
) -> Result<Json<Subject>, AppError> {
    let subject = PublicationService::set_subject_active(&state.db, id, dto).await?;

    Ok(Json(subject))
}
