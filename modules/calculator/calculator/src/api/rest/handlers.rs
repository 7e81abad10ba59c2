use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Query};
use axum::http::Uri;
use axum::Json;
use calculator_sdk::models::OperationsInfo;
use serde_json::Value;
use tracing::debug;
use utoipa::OpenApi;

use super::dto::{
    CalculateRequest, CalculateResponse, ClearHistoryResponse, ErrorResponse, HealthResponse,
    HistoryQuery, HistoryResponse, OperationsResponse,
};
use super::error::ApiError;
use super::extract::ClientMeta;
use super::openapi::CalculatorApiDoc;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Evaluate one arithmetic operation and record it in the history.
#[utoipa::path(
    post,
    path = "/calculate",
    tag = "calculator",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Calculation result", body = CalculateResponse),
        (status = 400, description = "Invalid input or arithmetic error", body = ErrorResponse)
    )
)]
pub async fn calculate(
    Extension(svc): Extension<Arc<Service>>,
    ClientMeta(origin): ClientMeta,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        debug!(error = %rejection, "rejected calculation body");
        DomainError::invalid_field("body", rejection.body_text())
    })?;

    let req = CalculateRequest::try_from(&body)?;
    let calculation = svc.calculate(req.a, req.b, req.operation, origin)?;
    Ok(Json(calculation.into()))
}

/// List recent calculations, newest first.
#[utoipa::path(
    get,
    path = "/history",
    tag = "calculator",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Calculation history", body = HistoryResponse),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_history(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let entries = svc.list_history(query.limit()?).await?;
    Ok(Json(entries.into()))
}

/// Delete the whole calculation history.
#[utoipa::path(
    delete,
    path = "/history",
    tag = "calculator",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn clear_history(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let deleted = svc.clear_history().await?;
    Ok(Json(ClearHistoryResponse::new(deleted)))
}

#[utoipa::path(
    get,
    path = "/operations",
    tag = "calculator",
    responses((status = 200, description = "Supported operations", body = OperationsResponse))
)]
pub async fn list_operations() -> Json<OperationsResponse> {
    Json(OperationsInfo::supported().into())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "calculator",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(Service::health().into())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(CalculatorApiDoc::openapi())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}
