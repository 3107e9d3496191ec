use axum::extract::Path;
use axum::Json;
use contracts::domain::a001_catalog_option::OptionKind;
use contracts::domain::a002_series_option::{
    EffectiveOptions, SeriesOption, SeriesOptionDto, SeriesOptionId,
};
use contracts::domain::a003_product_series::ProductSeriesId;
use contracts::shared::api::IdResponse;

use crate::domain::a002_series_option;
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError, ErrorResponse};

fn parse_kind(raw: &str) -> Result<OptionKind, ErrorResponse> {
    raw.parse::<OptionKind>()
        .map_err(|e| error_response("a002 kind", DomainError::validation(e)))
}

/// GET /api/series_option/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<SeriesOption> {
    let id = parse_id::<SeriesOptionId>(&id)?;
    match a002_series_option::service::get_by_id(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a002 get", DomainError::not_found("Опция серии не найдена"))),
        Err(e) => Err(error_response("a002 get", e)),
    }
}

/// POST /api/series_option
pub async fn upsert(Json(dto): Json<SeriesOptionDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a002_series_option::service::update(dto).await.map(|_| id),
        None => a002_series_option::service::create(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a002 upsert", e))
}

/// DELETE /api/series_option/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<SeriesOptionId>(&id)?;
    a002_series_option::service::delete(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a002 delete", e))
}

/// GET /api/series/:id/options
pub async fn list_for_series(Path(id): Path<String>) -> ApiResult<Vec<SeriesOption>> {
    let series_id = parse_id::<ProductSeriesId>(&id)?;
    a002_series_option::service::list_for_series(series_id)
        .await
        .map(Json)
        .map_err(|e| error_response("a002 list", e))
}

/// GET /api/series/:id/options/:kind
///
/// Опции серии или ближайшего предка
pub async fn effective_options(Path((id, kind)): Path<(String, String)>) -> ApiResult<EffectiveOptions> {
    let series_id = parse_id::<ProductSeriesId>(&id)?;
    let kind = parse_kind(&kind)?;
    a002_series_option::service::effective_options(series_id, kind)
        .await
        .map(Json)
        .map_err(|e| error_response("a002 effective", e))
}

/// GET /api/series/:id/options/:kind/default
pub async fn default_option(Path((id, kind)): Path<(String, String)>) -> ApiResult<Option<SeriesOption>> {
    let series_id = parse_id::<ProductSeriesId>(&id)?;
    let kind = parse_kind(&kind)?;
    a002_series_option::service::default_option(series_id, kind)
        .await
        .map(Json)
        .map_err(|e| error_response("a002 default", e))
}

/// POST /api/series/:id/options/:kind/ensure-default
pub async fn ensure_default(Path((id, kind)): Path<(String, String)>) -> ApiResult<Option<SeriesOption>> {
    let series_id = parse_id::<ProductSeriesId>(&id)?;
    let kind = parse_kind(&kind)?;
    a002_series_option::service::ensure_default_exists(series_id, kind)
        .await
        .map(|outcome| Json(outcome.default_option().cloned()))
        .map_err(|e| error_response("a002 ensure-default", e))
}

/// GET /api/series/:id/highest-ip
pub async fn highest_ip(Path(id): Path<String>) -> ApiResult<Option<SeriesOption>> {
    let series_id = parse_id::<ProductSeriesId>(&id)?;
    a002_series_option::service::highest_ip_option(series_id)
        .await
        .map(Json)
        .map_err(|e| error_response("a002 highest-ip", e))
}
