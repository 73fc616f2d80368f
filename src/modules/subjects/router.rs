use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_subject, get_subject, get_subjects, set_subject_active, transition_subject,
};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_subjects).post(create_subject))
        .route("/{id}", get(get_subject))
        .route("/{id}/transition", post(transition_subject))
        .route("/{id}/active", patch(set_subject_active))
}
