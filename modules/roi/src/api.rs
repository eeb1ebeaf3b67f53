//! HTTP surface of the ROI module.

use std::sync::Arc;

use appgate_kit::RouteGroup;
use axum::Json;
use axum::routing::{get, post};
use http::{Method, StatusCode};

use crate::calculator;
use crate::domain::{IndustryProfile, RoiCalculationResult, RoiInputs};

/// Route group exposed to the host. The calculator backs a public
/// marketing page, so the whole group is served without authentication.
pub fn route_group() -> anyhow::Result<Arc<RouteGroup>> {
    Ok(Arc::new(
        RouteGroup::builder()
            .public()
            .route(
                Method::POST,
                "/roi/calculate",
                "calculate_roi",
                post(calculate_roi),
            )
            .route(
                Method::GET,
                "/roi/industries",
                "list_industries",
                get(list_industries),
            )
            .build(),
    ))
}

async fn calculate_roi(
    Json(inputs): Json<RoiInputs>,
) -> Result<Json<RoiCalculationResult>, (StatusCode, Json<serde_json::Value>)> {
    inputs.validate().map_err(|message| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": message })),
        )
    })?;
    Ok(Json(calculator::calculate(&inputs)))
}

async fn list_industries() -> Json<&'static [IndustryProfile]> {
    Json(calculator::industry_profiles())
}
