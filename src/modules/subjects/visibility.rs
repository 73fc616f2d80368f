//! Audience-scoped catalog visibility.
//!
//! Every surface that lists subjects (admin console, public browsing,
//! student feed) calls [`visible`]; the audience only selects which gates
//! apply, it never selects a different code path. The gates run in a
//! fixed order, cheapest first:
//!
//! 1. audience gate  - admins bypass everything below
//! 2. activation gate - subject must be active
//! 3. review gate     - subject must be approved
//! 4. level gate      - students only: subject label must match the
//!                      label mapped from the student's education level
//! 5. lesson liveness - at least one approved and active lesson
//!
//! The function is pure over the snapshot: same inputs, same output, and
//! an empty result is an ordinary value.

use std::collections::HashMap;

use uuid::Uuid;

use crate::modules::lessons::model::Lesson;
use crate::modules::levels::model::{EducationLevel, SubjectLevel};
use crate::modules::publication::model::ReviewStatus;
use crate::modules::subjects::catalog::CatalogSnapshot;
use crate::modules::subjects::model::{Subject, SubjectView};

/// Who is asking. The student variant carries the education level read
/// from the profile at query time, so a "student without a level" cannot
/// be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Public,
    Student(EducationLevel),
}

impl Audience {
    fn student_label(self) -> Option<SubjectLevel> {
        match self {
            Audience::Student(level) => Some(level.subject_level()),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Audience::Admin)
    }
}

/// Compute the audience-scoped view of the catalog, in catalog insertion
/// order. `progress` maps subject ids to a completion percentage owned by
/// the learning-analytics collaborator; it is passed through untouched.
pub fn visible(
    audience: Audience,
    catalog: &CatalogSnapshot,
    progress: &HashMap<Uuid, f64>,
) -> Vec<SubjectView> {
    let student_label = audience.student_label();
    let is_admin = audience.is_admin();

    catalog
        .subjects()
        .iter()
        .filter(|subject| {
            if is_admin {
                return true;
            }
            if !subject.is_active {
                return false;
            }
            if subject.review_status != ReviewStatus::Approved {
                return false;
            }
            if let Some(label) = student_label
                && subject.level != label
            {
                return false;
            }
            catalog.lessons_of(subject.id).iter().any(Lesson::is_live)
        })
        .map(|subject| view_of(subject, catalog, is_admin, progress))
        .collect()
}

fn view_of(
    subject: &Subject,
    catalog: &CatalogSnapshot,
    is_admin: bool,
    progress: &HashMap<Uuid, f64>,
) -> SubjectView {
    let lessons = catalog.lessons_of(subject.id);
    let total_lessons = if is_admin {
        lessons.len() as i64
    } else {
        lessons.iter().filter(|l| l.is_live()).count() as i64
    };

    SubjectView {
        id: subject.id,
        title: subject.title.clone(),
        category: subject.category.clone(),
        level: subject.level,
        review_status: subject.review_status,
        is_active: subject.is_active,
        total_lessons,
        progress: progress.get(&subject.id).copied().unwrap_or(0.0),
    }
}
