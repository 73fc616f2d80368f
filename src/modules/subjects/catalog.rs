//! Catalog access for subjects and lessons.
//!
//! All reads of the two content tables go through [`CatalogService`]; the
//! only writers are subject/lesson creation here and the publication
//! service. Query surfaces that used to be re-implemented per endpoint
//! (admin listing, public listing, student listing) now share one
//! snapshot so they cannot drift apart.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::lessons::model::{CreateLessonDto, Lesson};
use crate::modules::levels::model::SubjectLevel;
use crate::modules::subjects::model::{CreateSubjectDto, Subject};
use crate::utils::errors::AppError;

/// An immutable, insertion-ordered materialization of the catalog, taken
/// in one pass at query time. The visibility filter works exclusively
/// against this snapshot, never against live queries, so one request
/// always sees one consistent state.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    subjects: Vec<Subject>,
    lessons_by_subject: HashMap<Uuid, Vec<Lesson>>,
}

impl CatalogSnapshot {
    /// Build a snapshot from pre-ordered rows: subjects in insertion
    /// order, lessons in position order. Grouping preserves both.
    pub fn from_parts(subjects: Vec<Subject>, lessons: Vec<Lesson>) -> Self {
        let mut lessons_by_subject: HashMap<Uuid, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            lessons_by_subject
                .entry(lesson.subject_id)
                .or_default()
                .push(lesson);
        }

        Self {
            subjects,
            lessons_by_subject,
        }
    }

    /// All subjects, in insertion order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Subjects carrying the given level label, in insertion order.
    pub fn subjects_by_label(&self, label: SubjectLevel) -> impl Iterator<Item = &Subject> {
        self.subjects.iter().filter(move |s| s.level == label)
    }

    /// Lessons of one subject, in position order. Unknown ids yield an
    /// empty slice; a subject with no lessons is a normal state.
    pub fn lessons_of(&self, subject_id: Uuid) -> &[Lesson] {
        self.lessons_by_subject
            .get(&subject_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub struct CatalogService;

impl CatalogService {
    #[instrument(skip(db))]
    pub async fn snapshot(db: &PgPool) -> Result<CatalogSnapshot, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT id, title, category, level, review_status, is_active, version, created_at, updated_at
               FROM subjects
               ORDER BY created_at, id"#,
        )
        .fetch_all(db)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, subject_id, title, content, review_status, is_active, version, position, created_at, updated_at
               FROM lessons
               ORDER BY subject_id, position, created_at"#,
        )
        .fetch_all(db)
        .await?;

        Ok(CatalogSnapshot::from_parts(subjects, lessons))
    }

    /// Create a subject in its initial publication state
    /// (draft, inactive).
    #[instrument(skip(db))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"INSERT INTO subjects (title, category, level)
               VALUES ($1, $2, $3)
               RETURNING id, title, category, level, review_status, is_active, version, created_at, updated_at"#,
        )
        .bind(&dto.title)
        .bind(&dto.category)
        .bind(dto.level)
        .fetch_one(db)
        .await?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, subject_id: Uuid) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"SELECT id, title, category, level, review_status, is_active, version, created_at, updated_at
               FROM subjects
               WHERE id = $1"#,
        )
        .bind(subject_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        Ok(subject)
    }

    /// Create a lesson under a subject, in (draft, inactive), appended at
    /// the end of the subject's lesson order.
    #[instrument(skip(db))]
    pub async fn create_lesson(
        db: &PgPool,
        subject_id: Uuid,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let subject_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM subjects WHERE id = $1)")
                .bind(subject_id)
                .fetch_one(db)
                .await?;

        if !subject_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"INSERT INTO lessons (subject_id, title, content, position)
               VALUES (
                   $1, $2, $3,
                   COALESCE((SELECT MAX(position) + 1 FROM lessons WHERE subject_id = $1), 0)
               )
               RETURNING id, subject_id, title, content, review_status, is_active, version, position, created_at, updated_at"#,
        )
        .bind(subject_id)
        .bind(&dto.title)
        .bind(dto.content.as_deref().unwrap_or(""))
        .fetch_one(db)
        .await?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn get_lesson(db: &PgPool, lesson_id: Uuid) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, subject_id, title, content, review_status, is_active, version, position, created_at, updated_at
               FROM lessons
               WHERE id = $1"#,
        )
        .bind(lesson_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))?;

        Ok(lesson)
    }
}
