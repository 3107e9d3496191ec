use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::a001_catalog_option::{
    CatalogOption, CatalogOptionDto, CatalogOptionId, CatalogOptionQuery,
};
use contracts::shared::api::IdResponse;

use crate::domain::a001_catalog_option;
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError};

/// GET /api/catalog_option?kind=ip&active_only=true
pub async fn list_all(Query(query): Query<CatalogOptionQuery>) -> ApiResult<Vec<CatalogOption>> {
    let result = match query.kind {
        Some(kind) => a001_catalog_option::service::list_by_kind(kind, query.active_only).await,
        None => a001_catalog_option::service::list_all().await,
    };
    result
        .map(Json)
        .map_err(|e| error_response("a001 list", e))
}

/// GET /api/catalog_option/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<CatalogOption> {
    let id = parse_id::<CatalogOptionId>(&id)?;
    match a001_catalog_option::service::get_by_id(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a001 get", DomainError::not_found("Опция не найдена"))),
        Err(e) => Err(error_response("a001 get", e)),
    }
}

/// POST /api/catalog_option
pub async fn upsert(Json(dto): Json<CatalogOptionDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a001_catalog_option::service::update(dto).await.map(|_| id),
        None => a001_catalog_option::service::create(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a001 upsert", e))
}

/// DELETE /api/catalog_option/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<CatalogOptionId>(&id)?;
    a001_catalog_option::service::delete(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a001 delete", e))
}
