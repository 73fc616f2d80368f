use axum::{Json, extract::Path};
use tracing::instrument;

use crate::modules::levels::model::{EducationLevel, MappingEntry};
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/levels/mapping",
    responses(
        (status = 200, description = "Full education level to subject level mapping table", body = Vec<MappingEntry>)
    ),
    tag = "Levels"
)]
#[instrument]
pub async fn get_mapping_table() -> Json<Vec<MappingEntry>> {
    let table = EducationLevel::ALL
        .iter()
        .map(|&code| MappingEntry {
            education_level: code,
            subject_level: code.subject_level(),
        })
        .collect();

    Json(table)
}

#[utoipa::path(
    get,
    path = "/api/levels/mapping/{code}",
    params(
        ("code" = String, Path, description = "Education level code, e.g. 6EME")
    ),
    responses(
        (status = 200, description = "Mapping entry for the given code", body = MappingEntry),
        (status = 400, description = "Not a known education level code")
    ),
    tag = "Levels"
)]
#[instrument]
pub async fn get_mapping_for_code(
    Path(code): Path<EducationLevel>,
) -> Result<Json<MappingEntry>, AppError> {
    Ok(Json(MappingEntry {
        education_level: code,
        subject_level: code.subject_level(),
    }))
}
