use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;
use crate::models::{AnalysisRequest, AnalysisResponse, ServiceStatus};
use crate::server::AppState;

pub async fn root(State(analyzer): State<AppState>) -> Json<ServiceStatus> {
    Json(analyzer.status())
}

pub async fn analyze(
    State(analyzer): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, Error> {
    let Json(request) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    let response = analyzer.analyze(request).await?;
    Ok(Json(response))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let detail = self.to_string();
        if status.is_client_error() {
            tracing::warn!("Rejected request: {}", detail);
        } else {
            tracing::error!("Request failed: {}", detail);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
