use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{create_student, get_profile, get_students, update_settings};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/me", get(get_profile))
        .route("/me/settings", patch(update_settings))
}
