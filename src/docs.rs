use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::lessons::model::{CreateLessonDto, Lesson};
use crate::modules::levels::model::{EducationLevel, MappingEntry};
use crate::modules::publication::model::{
    ReviewAction, ReviewStatus, SetActiveDto, TransitionDto, TransitionResponse,
};
use crate::modules::students::model::{
    CreateStudentDto, EducationSettingsDto, PaginatedStudentsResponse, Student, StudentFilterParams,
    StudentProfile, UpdateSettingsDto,
};
use crate::modules::subjects::model::{
    CreateSubjectDto, Subject, SubjectFilterParams, SubjectView,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::transition_subject,
        crate::modules::subjects::controller::set_subject_active,
        crate::modules::lessons::controller::get_subject_lessons,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::transition_lesson,
        crate::modules::lessons::controller::set_lesson_active,
        crate::modules::levels::controller::get_mapping_table,
        crate::modules::levels::controller::get_mapping_for_code,
        crate::modules::students::controller::get_profile,
        crate::modules::students::controller::update_settings,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
    ),
    components(
        schemas(
            Subject,
            SubjectView,
            CreateSubjectDto,
            SubjectFilterParams,
            Lesson,
            CreateLessonDto,
            ReviewStatus,
            ReviewAction,
            TransitionDto,
            TransitionResponse,
            SetActiveDto,
            EducationLevel,
            MappingEntry,
            Student,
            StudentProfile,
            CreateStudentDto,
            EducationSettingsDto,
            UpdateSettingsDto,
            StudentFilterParams,
            PaginatedStudentsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Subjects", description = "Audience-scoped subject catalog and publication"),
        (name = "Lessons", description = "Lesson authoring and publication"),
        (name = "Levels", description = "Education level to subject level mapping diagnostics"),
        (name = "Students", description = "Student profiles and settings")
    ),
    info(
        title = "Ardoise API",
        version = "0.1.0",
        description = "Level-aware content visibility service: one mapping table, one publication state machine, one visibility pipeline shared by admin, public and student surfaces.",
        contact(
            name = "API Support",
            email = "support@ardoise.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
