use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_lesson, get_subject_lessons, set_lesson_active, transition_lesson,
};

/// Routes nested under /subjects/{subject_id}/lessons.
pub fn init_subject_lessons_router() -> Router<AppState> {
    Router::new().route("/", get(get_subject_lessons).post(create_lesson))
}

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/transition", post(transition_lesson))
        .route("/{id}/active", patch(set_lesson_active))
}
