//! Publication state machine for subjects and lessons.
//!
//! Review status moves only through [`ReviewStatus::apply`]; nothing else
//! in the crate writes the `review_status` columns. The activation flag
//! is deliberately not part of the machine: an approved item can be
//! switched off and on without losing its review history.
//!
//! ```text
//! draft --submit--> pending_review --approve--> approved
//!                          |--reject--> rejected
//! rejected --resubmit--> pending_review
//! approved --revise-->   draft            (editing forces re-review)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Editorial review stage of a subject or lesson.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    PendingReview,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::PendingReview => "pending_review",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Apply a review action, returning the resulting status.
    ///
    /// Anything not listed in the machine above is an
    /// [`InvalidTransition`]; the caller's state is left untouched.
    /// There is no terminal state: rejected items stay resubmittable.
    pub fn apply(self, action: ReviewAction) -> Result<ReviewStatus, InvalidTransition> {
        match (self, action) {
            (ReviewStatus::Draft, ReviewAction::Submit) => Ok(ReviewStatus::PendingReview),
            (ReviewStatus::PendingReview, ReviewAction::Approve) => Ok(ReviewStatus::Approved),
            (ReviewStatus::PendingReview, ReviewAction::Reject) => Ok(ReviewStatus::Rejected),
            (ReviewStatus::Rejected, ReviewAction::Resubmit) => Ok(ReviewStatus::PendingReview),
            (ReviewStatus::Approved, ReviewAction::Revise) => Ok(ReviewStatus::Draft),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action an admin can request against a content item's review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Submit,
    Approve,
    Reject,
    Resubmit,
    Revise,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 5] = [
        ReviewAction::Submit,
        ReviewAction::Approve,
        ReviewAction::Reject,
        ReviewAction::Resubmit,
        ReviewAction::Revise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Submit => "submit",
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::Resubmit => "resubmit",
            ReviewAction::Revise => "revise",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A review action that is not legal from the item's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: ReviewStatus,
    pub action: ReviewAction,
}

impl std::error::Error for InvalidTransition {}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot {} a {} item", self.action, self.from)
    }
}

/// Which table a transition targets; recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Subject,
    Lesson,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Subject => "subject",
            ContentKind::Lesson => "lesson",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionDto {
    pub action: ReviewAction,
    /// Version of the item as last observed by the caller; the write is
    /// rejected with 409 if someone else got there first.
    pub expected_version: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveDto {
    pub is_active: bool,
    pub expected_version: i64,
}

/// Outcome of a successful transition, exposed so the caller can persist
/// or audit the change.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransitionResponse {
    pub previous: ReviewStatus,
    pub next: ReviewStatus,
    pub version: i64,
}
