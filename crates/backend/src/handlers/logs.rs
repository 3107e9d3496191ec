use axum::extract::Query;
use axum::Json;
use contracts::shared::api::IdResponse;
use contracts::shared::logger::{CreateLogRequest, LogEntry, LogQuery};

use crate::shared::error::{error_response, ApiResult, DomainError};
use crate::shared::logger;

/// GET /api/logs?category=import&limit=100
pub async fn list_all(Query(query): Query<LogQuery>) -> ApiResult<Vec<LogEntry>> {
    logger::repository::list(&query)
        .await
        .map(Json)
        .map_err(|e| error_response("logs list", e))
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> ApiResult<IdResponse> {
    req.validate()
        .map_err(|e| error_response("logs create", DomainError::validation(e)))?;
    logger::repository::insert(req.source, &req.category, &req.message)
        .await
        .map(|id| Json(IdResponse { id: id.to_string() }))
        .map_err(|e| error_response("logs create", e))
}

/// DELETE /api/logs
///
/// Возвращает число удаленных записей
pub async fn clear_all() -> ApiResult<u64> {
    logger::repository::clear()
        .await
        .map(Json)
        .map_err(|e| error_response("logs clear", e))
}
