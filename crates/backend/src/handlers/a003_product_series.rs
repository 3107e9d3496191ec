use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::a003_product_series::{
    EffectiveSeries, ProductSeries, ProductSeriesDto, ProductSeriesId, ResolvedValue, SeriesField,
};
use contracts::domain::a005_dimension_table::{DimensionDataQuery, SeriesDimensionData};
use contracts::shared::api::IdResponse;

use crate::domain::{a003_product_series, a004_eav, a005_dimension_table};
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError};

/// GET /api/product_series
pub async fn list_all() -> ApiResult<Vec<ProductSeries>> {
    a003_product_series::service::list_all()
        .await
        .map(Json)
        .map_err(|e| error_response("a003 list", e))
}

/// GET /api/product_series/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<ProductSeries> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    match a003_product_series::service::get_by_id(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a003 get", DomainError::not_found("Серия не найдена"))),
        Err(e) => Err(error_response("a003 get", e)),
    }
}

/// POST /api/product_series
pub async fn upsert(Json(dto): Json<ProductSeriesDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a003_product_series::service::update(dto).await.map(|_| id),
        None => a003_product_series::service::create(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a003 upsert", e))
}

/// DELETE /api/product_series/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    a003_product_series::service::delete(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a003 delete", e))
}

/// GET /api/series/:id/effective
pub async fn effective(Path(id): Path<String>) -> ApiResult<EffectiveSeries> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    a003_product_series::service::effective(id)
        .await
        .map(Json)
        .map_err(|e| error_response("a003 effective", e))
}

/// GET /api/series/:id/resolve/:field
pub async fn resolve_field(Path((id, field)): Path<(String, String)>) -> ApiResult<ResolvedValue> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    let field = field
        .parse::<SeriesField>()
        .map_err(|e| error_response("a003 resolve", DomainError::validation(e)))?;
    a003_product_series::service::resolve_field(id, field)
        .await
        .map(Json)
        .map_err(|e| error_response("a003 resolve", e))
}

/// GET /api/series/:id/missing-fields
pub async fn missing_fields(Path(id): Path<String>) -> ApiResult<Vec<SeriesField>> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    a003_product_series::service::missing_required_fields(id)
        .await
        .map(Json)
        .map_err(|e| error_response("a003 missing-fields", e))
}

/// GET /api/series/:id/dimensions?dn=DN50,DN80&pn=PN16
pub async fn dimensions(
    Path(id): Path<String>,
    Query(query): Query<DimensionDataQuery>,
) -> ApiResult<SeriesDimensionData> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    let dn = query.dn_list();
    let pn = query.pn_list();
    a005_dimension_table::service::series_dimension_data(id, dn.as_deref(), pn.as_deref())
        .await
        .map(Json)
        .map_err(|e| error_response("a003 dimensions", e))
}

/// GET /api/series/:id/eav/:code
///
/// Значение EAV-атрибута с учетом базовых серий
pub async fn eav_value(Path((id, code)): Path<(String, String)>) -> ApiResult<Option<serde_json::Value>> {
    let id = parse_id::<ProductSeriesId>(&id)?;
    a004_eav::service::resolve_for_series(id, &code)
        .await
        .map(Json)
        .map_err(|e| error_response("a003 eav", e))
}
