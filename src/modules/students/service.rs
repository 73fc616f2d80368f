use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::levels::model::EducationLevel;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (first_name, last_name, education_level)
               VALUES ($1, $2, $3)
               RETURNING id, first_name, last_name, education_level, created_at, updated_at"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.education_level)
        .fetch_one(db)
        .await?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, student_id: Uuid) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, first_name, last_name, education_level, created_at, updated_at
               FROM students
               WHERE id = $1"#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student profile not found")))?;

        Ok(student)
    }

    /// Settings update for the education level. Once this returns, any
    /// subsequent catalog query for the same student resolves against the
    /// new level; there is no cached projection to go stale.
    #[instrument(skip(db))]
    pub async fn update_education_level(
        db: &PgPool,
        student_id: Uuid,
        education_level: EducationLevel,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"UPDATE students
               SET education_level = $1, updated_at = NOW()
               WHERE id = $2
               RETURNING id, first_name, last_name, education_level, created_at, updated_at"#,
        )
        .bind(education_level)
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student profile not found")))?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let (total, students) = match filters.education_level {
            Some(level) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM students WHERE education_level = $1",
                )
                .bind(level)
                .fetch_one(db)
                .await?;

                let students = sqlx::query_as::<_, Student>(
                    r#"SELECT id, first_name, last_name, education_level, created_at, updated_at
                       FROM students
                       WHERE education_level = $1
                       ORDER BY last_name, first_name
                       LIMIT $2 OFFSET $3"#,
                )
                .bind(level)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;

                (total, students)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
                    .fetch_one(db)
                    .await?;

                let students = sqlx::query_as::<_, Student>(
                    r#"SELECT id, first_name, last_name, education_level, created_at, updated_at
                       FROM students
                       ORDER BY last_name, first_name
                       LIMIT $1 OFFSET $2"#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;

                (total, students)
            }
        };

        let has_more = offset + limit < total;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::pagination::PaginationParams;
    use axum::http::StatusCode;

    fn create_dto(first_name: &str, level: EducationLevel) -> CreateStudentDto {
        CreateStudentDto {
            first_name: first_name.to_string(),
            last_name: "Mbarga".to_string(),
            education_level: level,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_get_student(pool: PgPool) {
        let created =
            StudentService::create_student(&pool, create_dto("Paul", EducationLevel::Sixieme))
                .await
                .unwrap();

        let fetched = StudentService::get_student(&pool, created.id).await.unwrap();
        assert_eq!(fetched.first_name, "Paul");
        assert_eq!(fetched.education_level, EducationLevel::Sixieme);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_student_not_found(pool: PgPool) {
        let result = StudentService::get_student(&pool, Uuid::new_v4()).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_education_level_observed_by_next_read(pool: PgPool) {
        let created =
            StudentService::create_student(&pool, create_dto("Claude", EducationLevel::Sixieme))
                .await
                .unwrap();

        let updated = StudentService::update_education_level(
            &pool,
            created.id,
            EducationLevel::Cinquieme,
        )
        .await
        .unwrap();
        assert_eq!(updated.education_level, EducationLevel::Cinquieme);

        // The acknowledged write is what the next profile read returns.
        let fetched = StudentService::get_student(&pool, created.id).await.unwrap();
        assert_eq!(fetched.education_level, EducationLevel::Cinquieme);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_education_level_unknown_student(pool: PgPool) {
        let result = StudentService::update_education_level(
            &pool,
            Uuid::new_v4(),
            EducationLevel::Terminale,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_students_filtered_by_level(pool: PgPool) {
        StudentService::create_student(&pool, create_dto("Awa", EducationLevel::Cm2))
            .await
            .unwrap();
        StudentService::create_student(&pool, create_dto("Brice", EducationLevel::Cm2))
            .await
            .unwrap();
        StudentService::create_student(&pool, create_dto("Chantal", EducationLevel::Terminale))
            .await
            .unwrap();

        let response = StudentService::get_students(
            &pool,
            StudentFilterParams {
                education_level: Some(EducationLevel::Cm2),
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.meta.total, 2);
        assert!(
            response
                .data
                .iter()
                .all(|s| s.education_level == EducationLevel::Cm2)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_students_pagination(pool: PgPool) {
        for i in 0..5 {
            StudentService::create_student(
                &pool,
                create_dto(&format!("Élève{}", i), EducationLevel::Ce1),
            )
            .await
            .unwrap();
        }

        let response = StudentService::get_students(
            &pool,
            StudentFilterParams {
                education_level: None,
                pagination: PaginationParams {
                    limit: Some(2),
                    offset: Some(0),
                    page: None,
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.meta.total, 5);
        assert!(response.meta.has_more);
    }
}
