use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::levels::model::{EducationLevel, SubjectLevel};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub education_level: EducationLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile as returned to the student, with the subject level label their
/// education level maps to. Exposing the label here keeps the settings
/// page and the catalog visibly in agreement.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub education_level: EducationLevel,
    #[schema(value_type = String, example = "6ème")]
    pub subject_level: SubjectLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Student> for StudentProfile {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            education_level: student.education_level,
            subject_level: student.education_level.subject_level(),
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub education_level: EducationLevel,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EducationSettingsDto {
    pub education_level: EducationLevel,
}

/// Settings update shape: `{"education": {"education_level": "6EME"}}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsDto {
    pub education: EducationSettingsDto,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StudentFilterParams {
    #[param(value_type = Option<String>)]
    pub education_level: Option<EducationLevel>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_carries_mapped_label() {
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Amina".to_string(),
            last_name: "Ngo".to_string(),
            education_level: EducationLevel::Seconde,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = StudentProfile::from(student);
        assert_eq!(profile.subject_level, SubjectLevel::Seconde);
        assert_eq!(profile.subject_level.as_str(), "2nde");
    }

    #[test]
    fn test_settings_dto_shape() {
        let dto: UpdateSettingsDto =
            serde_json::from_str(r#"{"education": {"education_level": "CM2"}}"#).unwrap();
        assert_eq!(dto.education.education_level, EducationLevel::Cm2);
    }
}
