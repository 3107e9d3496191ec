use axum::extract::Path;
use axum::Json;
use contracts::domain::a006_procurement::{Procurement, ProcurementDto, ProcurementId};
use contracts::shared::api::IdResponse;

use crate::domain::a006_procurement;
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError};

/// GET /api/procurement
pub async fn list_all() -> ApiResult<Vec<Procurement>> {
    a006_procurement::service::list_all()
        .await
        .map(Json)
        .map_err(|e| error_response("a006 list", e))
}

/// GET /api/procurement/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Procurement> {
    let id = parse_id::<ProcurementId>(&id)?;
    match a006_procurement::service::get_by_id(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a006 get", DomainError::not_found("Закупка не найдена"))),
        Err(e) => Err(error_response("a006 get", e)),
    }
}

/// POST /api/procurement
pub async fn upsert(Json(dto): Json<ProcurementDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a006_procurement::service::update(dto).await.map(|_| id),
        None => a006_procurement::service::create(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a006 upsert", e))
}

/// DELETE /api/procurement/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<ProcurementId>(&id)?;
    a006_procurement::service::delete(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a006 delete", e))
}
