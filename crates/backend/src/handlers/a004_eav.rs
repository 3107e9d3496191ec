use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::a004_eav::{
    EavAttribute, EavAttributeDto, EavAttributeId, EavEntityData, EavFilter, EavSearchQuery,
    EavValueQuery, SetEavValueRequest,
};
use contracts::shared::api::IdResponse;

use crate::domain::a004_eav;
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError};

// ============================================================================
// Атрибуты
// ============================================================================

/// GET /api/eav_attribute
pub async fn list_attributes() -> ApiResult<Vec<EavAttribute>> {
    a004_eav::service::list_attributes()
        .await
        .map(Json)
        .map_err(|e| error_response("a004 list", e))
}

/// GET /api/eav_attribute/:id
pub async fn get_attribute(Path(id): Path<String>) -> ApiResult<EavAttribute> {
    let id = parse_id::<EavAttributeId>(&id)?;
    match a004_eav::service::get_attribute(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a004 get", DomainError::not_found("Атрибут не найден"))),
        Err(e) => Err(error_response("a004 get", e)),
    }
}

/// POST /api/eav_attribute
pub async fn upsert_attribute(Json(dto): Json<EavAttributeDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a004_eav::service::update_attribute(dto).await.map(|_| id),
        None => a004_eav::service::create_attribute(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a004 upsert", e))
}

/// DELETE /api/eav_attribute/:id
pub async fn delete_attribute(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<EavAttributeId>(&id)?;
    a004_eav::service::delete_attribute(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a004 delete", e))
}

// ============================================================================
// Значения
// ============================================================================

/// GET /api/eav/:entity_type/:entity_id
pub async fn get_entity_data(
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> ApiResult<EavEntityData> {
    a004_eav::service::eav_data(&entity_type, &entity_id)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 data", e))
}

/// PUT /api/eav/:entity_type/:entity_id
pub async fn set_entity_data(
    Path((entity_type, entity_id)): Path<(String, String)>,
    Json(requests): Json<Vec<SetEavValueRequest>>,
) -> ApiResult<EavEntityData> {
    a004_eav::service::set_values(&entity_type, &entity_id, &requests)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 set", e))
}

/// GET /api/eav/:entity_type/:entity_id/missing-required
pub async fn missing_required(
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> ApiResult<Vec<String>> {
    a004_eav::service::missing_required(&entity_type, &entity_id)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 missing-required", e))
}

/// GET /api/eav/:entity_type/:entity_id/:code?default=...
pub async fn get_value(
    Path((entity_type, entity_id, code)): Path<(String, String, String)>,
    Query(query): Query<EavValueQuery>,
) -> ApiResult<Option<serde_json::Value>> {
    a004_eav::service::get_value(&entity_type, &entity_id, &code, query.default_value())
        .await
        .map(Json)
        .map_err(|e| error_response("a004 get value", e))
}

/// DELETE /api/eav/:entity_type/:entity_id/:code
pub async fn delete_value(
    Path((entity_type, entity_id, code)): Path<(String, String, String)>,
) -> ApiResult<bool> {
    a004_eav::service::delete_value(&entity_type, &entity_id, &code)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 delete value", e))
}

/// GET /api/eav/:entity_type/filter?weight__gt=10&color=red
pub async fn filter(
    Path(entity_type): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<String>> {
    let filters = params
        .iter()
        .map(|(key, value)| EavFilter::parse(key, value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| error_response("a004 filter", DomainError::validation(e)))?;
    a004_eav::service::filter_entities(&entity_type, &filters)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 filter", e))
}

/// GET /api/eav/:entity_type/search?q=...
pub async fn search(
    Path(entity_type): Path<String>,
    Query(query): Query<EavSearchQuery>,
) -> ApiResult<Vec<String>> {
    a004_eav::service::search_text(&entity_type, &query.q)
        .await
        .map(Json)
        .map_err(|e| error_response("a004 search", e))
}
