use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::levels::model::SubjectLevel;
use crate::modules::publication::model::ReviewStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[schema(value_type = String, example = "6ème")]
    pub level: SubjectLevel,
    pub review_status: ReviewStatus,
    pub is_active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    /// Subject level label, e.g. "6ème"
    #[schema(value_type = String, example = "6ème")]
    pub level: SubjectLevel,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct SubjectFilterParams {
    pub category: Option<String>,
    /// Restrict to one subject level label, e.g. "CM2"
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub level: Option<SubjectLevel>,
}

/// Audience-scoped projection of a subject, as returned by the catalog
/// query. `total_lessons` counts the lessons that same audience may see.
/// `progress` is supplied by the learning-analytics collaborator and is
/// passed through untouched (0 when absent).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubjectView {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[schema(value_type = String, example = "6ème")]
    pub level: SubjectLevel,
    pub review_status: ReviewStatus,
    pub is_active: bool,
    pub total_lessons: i64,
    pub progress: f64,
}
