use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::publication::model::ReviewStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub content: String,
    pub review_status: ReviewStatus,
    pub is_active: bool,
    pub version: i64,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    /// Whether this lesson counts toward its subject's public visibility.
    pub fn is_live(&self) -> bool {
        self.review_status == ReviewStatus::Approved && self.is_active
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(review_status: ReviewStatus, is_active: bool) -> Lesson {
        Lesson {
            id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            title: "Les fractions".to_string(),
            content: String::new(),
            review_status,
            is_active,
            version: 1,
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_live_requires_both_approved_and_active() {
        assert!(lesson(ReviewStatus::Approved, true).is_live());
        assert!(!lesson(ReviewStatus::Approved, false).is_live());
        assert!(!lesson(ReviewStatus::PendingReview, true).is_live());
        assert!(!lesson(ReviewStatus::Draft, false).is_live());
    }
}
