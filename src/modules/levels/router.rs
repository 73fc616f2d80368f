use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_mapping_for_code, get_mapping_table};

pub fn init_levels_router() -> Router<AppState> {
    Router::new()
        .route("/mapping", get(get_mapping_table))
        .route("/mapping/{code}", get(get_mapping_for_code))
}
