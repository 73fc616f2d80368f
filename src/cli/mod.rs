//! Operational commands invoked through the binary's argv (see
//! `main.rs`), kept out of the HTTP surface on purpose.

use fake::Fake;
use fake::faker::name::fr_fr::{FirstName, LastName};
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::lessons::model::CreateLessonDto;
use crate::modules::levels::model::{EducationLevel, SubjectLevel};
use crate::modules::publication::model::{ReviewAction, SetActiveDto, TransitionDto};
use crate::modules::publication::service::PublicationService;
use crate::modules::students::model::CreateStudentDto;
use crate::modules::students::service::StudentService;
use crate::modules::subjects::catalog::CatalogService;
use crate::modules::subjects::model::CreateSubjectDto;
use crate::utils::errors::AppError;

pub struct SeedSummary {
    pub students: usize,
    pub subjects: usize,
    pub lessons: usize,
}

/// Seed a demo catalog: a few students across levels, and per level a
/// published subject plus content left in intermediate review states so
/// the admin and public views visibly differ.
pub async fn seed_demo(db: &PgPool) -> Result<SeedSummary, AppError> {
    // Acting editor recorded in the transition audit trail.
    let editor = Uuid::new_v4();
    let mut summary = SeedSummary {
        students: 0,
        subjects: 0,
        lessons: 0,
    };

    let student_levels = [
        EducationLevel::MaternellePetite,
        EducationLevel::Cp,
        EducationLevel::Cm2,
        EducationLevel::Sixieme,
        EducationLevel::Troisieme,
        EducationLevel::Terminale,
    ];

    for level in student_levels {
        StudentService::create_student(
            db,
            CreateStudentDto {
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                education_level: level,
            },
        )
        .await?;
        summary.students += 1;
    }

    let catalog = [
        ("Éveil et découverte", "Sciences", SubjectLevel::Maternelle),
        ("Mathématiques CM2", "Mathématiques", SubjectLevel::Cm2),
        ("Mathématiques 6ème", "Mathématiques", SubjectLevel::Sixieme),
        ("Français 6ème", "Français", SubjectLevel::Sixieme),
        ("Histoire-Géographie 3ème", "Histoire-Géographie", SubjectLevel::Troisieme),
        ("Philosophie Tle", "Français", SubjectLevel::Terminale),
    ];

    for (title, category, level) in catalog {
        let subject = CatalogService::create_subject(
            db,
            CreateSubjectDto {
                title: title.to_string(),
                category: category.to_string(),
                level,
            },
        )
        .await?;
        summary.subjects += 1;

        let lesson = CatalogService::create_lesson(
            db,
            subject.id,
            CreateLessonDto {
                title: format!("{} - Introduction", title),
                content: Some("Contenu de démonstration.".to_string()),
            },
        )
        .await?;
        summary.lessons += 1;

        // A second lesson stays in draft so the admin count differs
        // from the public one.
        CatalogService::create_lesson(
            db,
            subject.id,
            CreateLessonDto {
                title: format!("{} - Chapitre en préparation", title),
                content: None,
            },
        )
        .await?;
        summary.lessons += 1;

        publish_lesson(db, editor, lesson.id).await?;
        publish_subject(db, editor, subject.id).await?;
    }

    // One subject left mid-review: present in the admin view only.
    let pending = CatalogService::create_subject(
        db,
        CreateSubjectDto {
            title: "Informatique 2nde".to_string(),
            category: "Informatique".to_string(),
            level: SubjectLevel::Seconde,
        },
    )
    .await?;
    summary.subjects += 1;
    PublicationService::transition_subject(
        db,
        pending.id,
        editor,
        TransitionDto {
            action: ReviewAction::Submit,
            expected_version: pending.version,
        },
    )
    .await?;

    Ok(summary)
}

async fn publish_subject(db: &PgPool, editor: Uuid, subject_id: Uuid) -> Result<(), AppError> {
    let mut version = 1;
    for action in [ReviewAction::Submit, ReviewAction::Approve] {
        let outcome = PublicationService::transition_subject(
            db,
            subject_id,
            editor,
            TransitionDto {
                action,
                expected_version: version,
            },
        )
        .await?;
        version = outcome.version;
    }

    PublicationService::set_subject_active(
        db,
        subject_id,
        SetActiveDto {
            is_active: true,
            expected_version: version,
        },
    )
    .await?;

    Ok(())
}

async fn publish_lesson(db: &PgPool, editor: Uuid, lesson_id: Uuid) -> Result<(), AppError> {
    let mut version = 1;
    for action in [ReviewAction::Submit, ReviewAction::Approve] {
        let outcome = PublicationService::transition_lesson(
            db,
            lesson_id,
            editor,
            TransitionDto {
                action,
                expected_version: version,
            },
        )
        .await?;
        version = outcome.version;
    }

    PublicationService::set_lesson_active(
        db,
        lesson_id,
        SetActiveDto {
            is_active: true,
            expected_version: version,
        },
    )
    .await?;

    Ok(())
}
