use utoipa::OpenApi;

use super::dto::{
    CalculateRequest, CalculateResponse, CalculationDto, ClearHistoryResponse, ErrorResponse,
    FieldViolationDto, HealthResponse, HistoryEntryDto, HistoryResponse, OperationsResponse,
};
use super::handlers;

/// OpenAPI document served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Calculator API", description = "Arithmetic with a persisted calculation history"),
    paths(
        handlers::calculate,
        handlers::list_history,
        handlers::clear_history,
        handlers::list_operations,
        handlers::health,
    ),
    components(schemas(
        CalculateRequest,
        CalculateResponse,
        CalculationDto,
        HistoryEntryDto,
        HistoryResponse,
        ClearHistoryResponse,
        OperationsResponse,
        HealthResponse,
        FieldViolationDto,
        ErrorResponse,
    )),
    tags((name = "calculator", description = "Calculator operations and history"))
)]
pub struct CalculatorApiDoc;
