use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::lessons::model::Lesson;
use crate::modules::publication::model::{
    ContentKind, ReviewAction, ReviewStatus, SetActiveDto, TransitionDto, TransitionResponse,
};
use crate::modules::subjects::model::Subject;
use crate::utils::errors::AppError;

pub struct PublicationService;

impl PublicationService {
    /// Apply a review action to a subject.
    ///
    /// The write is a compare-and-swap on the row version: two admins
    /// acting on the same observed version cannot both win; the loser
    /// gets 409 and must refetch. Successful transitions are recorded in
    /// the audit trail with the acting admin.
    #[instrument(skip(db))]
    pub async fn transition_subject(
        db: &PgPool,
        subject_id: Uuid,
        actor: Uuid,
        dto: TransitionDto,
    ) -> Result<TransitionResponse, AppError> {
        let previous = sqlx::query_scalar::<_, ReviewStatus>(
            "SELECT review_status FROM subjects WHERE id = $1",
        )
        .bind(subject_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        let next = previous.apply(dto.action).map_err(AppError::unprocessable)?;

        let mut tx = db.begin().await?;

        let result = sqlx::query(
            r#"UPDATE subjects
               SET review_status = $1, version = version + 1, updated_at = NOW()
               WHERE id = $2 AND version = $3"#,
        )
        .bind(next)
        .bind(subject_id)
        .bind(dto.expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Subject was modified concurrently; refetch and retry"
            )));
        }

        Self::record_transition(
            &mut tx,
            ContentKind::Subject,
            subject_id,
            dto.action,
            previous,
            next,
            actor,
        )
        .await?;

        tx.commit().await?;

        Ok(TransitionResponse {
            previous,
            next,
            version: dto.expected_version + 1,
        })
    }

    /// Apply a review action to a lesson. Same contract as
    /// [`Self::transition_subject`].
    #[instrument(skip(db))]
    pub async fn transition_lesson(
        db: &PgPool,
        lesson_id: Uuid,
        actor: Uuid,
        dto: TransitionDto,
    ) -> Result<TransitionResponse, AppError> {
        let previous = sqlx::query_scalar::<_, ReviewStatus>(
            "SELECT review_status FROM lessons WHERE id = $1",
        )
        .bind(lesson_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))?;

        let next = previous.apply(dto.action).map_err(AppError::unprocessable)?;

        let mut tx = db.begin().await?;

        let result = sqlx::query(
            r#"UPDATE lessons
               SET review_status = $1, version = version + 1, updated_at = NOW()
               WHERE id = $2 AND version = $3"#,
        )
        .bind(next)
        .bind(lesson_id)
        .bind(dto.expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Lesson was modified concurrently; refetch and retry"
            )));
        }

        Self::record_transition(
            &mut tx,
            ContentKind::Lesson,
            lesson_id,
            dto.action,
            previous,
            next,
            actor,
        )
        .await?;

        tx.commit().await?;

        Ok(TransitionResponse {
            previous,
            next,
            version: dto.expected_version + 1,
        })
    }

    /// Toggle a subject's activation flag. Review status is untouched:
    /// deactivating an approved subject keeps its review history.
    #[instrument(skip(db))]
    pub async fn set_subject_active(
        db: &PgPool,
        subject_id: Uuid,
        dto: SetActiveDto,
    ) -> Result<Subject, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM subjects WHERE id = $1)")
                .bind(subject_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        let subject = sqlx::query_as::<_, Subject>(
            r#"UPDATE subjects
               SET is_active = $1, version = version + 1, updated_at = NOW()
               WHERE id = $2 AND version = $3
               RETURNING id, title, category, level, review_status, is_active, version, created_at, updated_at"#,
        )
        .bind(dto.is_active)
        .bind(subject_id)
        .bind(dto.expected_version)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::conflict(anyhow::anyhow!(
                "Subject was modified concurrently; refetch and retry"
            ))
        })?;

        Ok(subject)
    }

    /// Toggle a lesson's activation flag. Same contract as
    /// [`Self::set_subject_active`].
    #[instrument(skip(db))]
    pub async fn set_lesson_active(
        db: &PgPool,
        lesson_id: Uuid,
        dto: SetActiveDto,
    ) -> Result<Lesson, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1)")
                .bind(lesson_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Lesson not found")));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"UPDATE lessons
               SET is_active = $1, version = version + 1, updated_at = NOW()
               WHERE id = $2 AND version = $3
               RETURNING id, subject_id, title, content, review_status, is_active, version, position, created_at, updated_at"#,
        )
        .bind(dto.is_active)
        .bind(lesson_id)
        .bind(dto.expected_version)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::conflict(anyhow::anyhow!(
                "Lesson was modified concurrently; refetch and retry"
            ))
        })?;

        Ok(lesson)
    }

    async fn record_transition(
        tx: &mut Transaction<'_, Postgres>,
        kind: ContentKind,
        content_id: Uuid,
        action: ReviewAction,
        previous: ReviewStatus,
        next: ReviewStatus,
        actor: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO content_transitions
               (content_kind, content_id, action, previous_status, next_status, actor)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(kind.as_str())
        .bind(content_id)
        .bind(action.as_str())
        .bind(previous)
        .bind(next)
        .bind(actor)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
