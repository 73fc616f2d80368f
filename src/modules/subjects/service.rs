use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::lessons::model::Lesson;
use crate::modules::subjects::catalog::CatalogService;
use crate::modules::subjects::model::{SubjectFilterParams, SubjectView};
use crate::modules::subjects::visibility::{self, Audience};
use crate::utils::errors::AppError;

pub struct SubjectService;

impl SubjectService {
    /// The primary catalog query: one snapshot, one predicate pipeline,
    /// recomputed on every call. A student whose education level changed
    /// a moment ago sees the new scope immediately because nothing here
    /// is cached.
    #[instrument(skip(db))]
    pub async fn list_visible(
        db: &PgPool,
        audience: Audience,
        filters: SubjectFilterParams,
    ) -> Result<Vec<SubjectView>, AppError> {
        let snapshot = CatalogService::snapshot(db).await?;
        // Progress belongs to the learning-analytics collaborator; until
        // its feed is wired in, every subject reports 0.
        let progress = HashMap::new();
        let mut views = visibility::visible(audience, &snapshot, &progress);

        if let Some(category) = &filters.category {
            views.retain(|v| &v.category == category);
        }
        if let Some(level) = filters.level {
            views.retain(|v| v.level == level);
        }

        Ok(views)
    }

    /// A single subject through the same pipeline; a subject the caller
    /// may not see is indistinguishable from one that does not exist.
    #[instrument(skip(db))]
    pub async fn get_visible(
        db: &PgPool,
        audience: Audience,
        subject_id: Uuid,
    ) -> Result<SubjectView, AppError> {
        let views = Self::list_visible(db, audience, SubjectFilterParams::default()).await?;

        views
            .into_iter()
            .find(|v| v.id == subject_id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))
    }

    /// Lessons of a subject the caller may see: every lesson for admins,
    /// only live lessons otherwise.
    #[instrument(skip(db))]
    pub async fn lessons_of_visible(
        db: &PgPool,
        audience: Audience,
        subject_id: Uuid,
    ) -> Result<Vec<Lesson>, AppError> {
        let snapshot = CatalogService::snapshot(db).await?;
        let progress = HashMap::new();
        let views = visibility::visible(audience, &snapshot, &progress);

        if !views.iter().any(|v| v.id == subject_id) {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        let lessons = snapshot.lessons_of(subject_id);
        let lessons = if audience.is_admin() {
            lessons.to_vec()
        } else {
            lessons.iter().filter(|l| l.is_live()).cloned().collect()
        };

        Ok(lessons)
    }
}
