//! Handler for the static survey model.

use axum::Json;
use flash_core::survey::{self, Section};
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct SurveyModel {
    pub section_count: usize,
    pub sections: &'static [Section],
}

/// GET /api/v1/survey
pub async fn get_survey() -> Json<DataResponse<SurveyModel>> {
    Json(DataResponse {
        data: SurveyModel {
            section_count: survey::section_count(),
            sections: survey::SURVEY,
        },
    })
}
