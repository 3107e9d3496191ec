use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::a005_dimension_table::{
    DimensionCell, DimensionCellDto, DimensionData, DimensionDataQuery, DimensionParameter,
    DimensionParameterDto, DimensionParameterId, DimensionTable, DimensionTableDto,
    DimensionTableId, DuplicateTableRequest, TableDrawing, TableDrawingDto, TableDrawingId,
};
use contracts::shared::api::IdResponse;

use crate::domain::a005_dimension_table;
use crate::shared::error::{error_response, parse_id, ApiResult, DomainError};

// ============================================================================
// Таблицы
// ============================================================================

/// GET /api/dimension_table
pub async fn list_all() -> ApiResult<Vec<DimensionTable>> {
    a005_dimension_table::service::list_all()
        .await
        .map(Json)
        .map_err(|e| error_response("a005 list", e))
}

/// GET /api/dimension_table/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<DimensionTable> {
    let id = parse_id::<DimensionTableId>(&id)?;
    match a005_dimension_table::service::get_by_id(id.value()).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(error_response("a005 get", DomainError::not_found("Таблица ВГХ не найдена"))),
        Err(e) => Err(error_response("a005 get", e)),
    }
}

/// POST /api/dimension_table
pub async fn upsert(Json(dto): Json<DimensionTableDto>) -> ApiResult<IdResponse> {
    let result = match dto.id.clone() {
        Some(id) => a005_dimension_table::service::update(dto).await.map(|_| id),
        None => a005_dimension_table::service::create(dto)
            .await
            .map(|id| id.to_string()),
    };
    result
        .map(|id| Json(IdResponse { id }))
        .map_err(|e| error_response("a005 upsert", e))
}

/// DELETE /api/dimension_table/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::delete(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a005 delete", e))
}

/// GET /api/dimension-tables/:id/data?dn=DN50,DN80&pn=PN16&export=true
pub async fn dimension_data(
    Path(id): Path<String>,
    Query(query): Query<DimensionDataQuery>,
) -> ApiResult<DimensionData> {
    let id = parse_id::<DimensionTableId>(&id)?;
    let dn = query.dn_list();
    let pn = query.pn_list();
    a005_dimension_table::service::get_dimension_data(id, dn.as_deref(), pn.as_deref(), query.export)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 data", e))
}

/// POST /api/dimension-tables/:id/duplicate
pub async fn duplicate(
    Path(id): Path<String>,
    Json(request): Json<DuplicateTableRequest>,
) -> ApiResult<IdResponse> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::duplicate_table(id, request)
        .await
        .map(|id| Json(IdResponse { id: id.to_string() }))
        .map_err(|e| error_response("a005 duplicate", e))
}

/// DELETE /api/dimension-tables/:id/pn/:pn_code
///
/// Возвращает число удаленных значений
pub async fn delete_pn_data(Path((id, pn_code)): Path<(String, String)>) -> ApiResult<u64> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::delete_pn_data(id, &pn_code)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 delete pn", e))
}

// ============================================================================
// Параметры
// ============================================================================

/// GET /api/dimension-tables/:id/parameters
pub async fn list_parameters(Path(id): Path<String>) -> ApiResult<Vec<DimensionParameter>> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::list_parameters(id)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 parameters", e))
}

/// POST /api/dimension-tables/:id/parameters
pub async fn create_parameter(
    Path(id): Path<String>,
    Json(dto): Json<DimensionParameterDto>,
) -> ApiResult<IdResponse> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::create_parameter(id, dto)
        .await
        .map(|id| Json(IdResponse { id: id.to_string() }))
        .map_err(|e| error_response("a005 create parameter", e))
}

/// PUT /api/dimension-parameters
pub async fn update_parameter(Json(dto): Json<DimensionParameterDto>) -> ApiResult<bool> {
    a005_dimension_table::service::update_parameter(dto)
        .await
        .map(|_| Json(true))
        .map_err(|e| error_response("a005 update parameter", e))
}

/// DELETE /api/dimension-parameters/:id
pub async fn delete_parameter(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<DimensionParameterId>(&id)?;
    a005_dimension_table::service::delete_parameter(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a005 delete parameter", e))
}

// ============================================================================
// Чертежи
// ============================================================================

/// GET /api/dimension-tables/:id/drawings
pub async fn list_drawings(Path(id): Path<String>) -> ApiResult<Vec<TableDrawing>> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::list_drawings(id)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 drawings", e))
}

/// POST /api/dimension-tables/:id/drawings
pub async fn create_drawing(
    Path(id): Path<String>,
    Json(dto): Json<TableDrawingDto>,
) -> ApiResult<IdResponse> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::create_drawing(id, dto)
        .await
        .map(|id| Json(IdResponse { id: id.to_string() }))
        .map_err(|e| error_response("a005 create drawing", e))
}

/// PUT /api/dimension-drawings
pub async fn update_drawing(Json(dto): Json<TableDrawingDto>) -> ApiResult<bool> {
    a005_dimension_table::service::update_drawing(dto)
        .await
        .map(|_| Json(true))
        .map_err(|e| error_response("a005 update drawing", e))
}

/// DELETE /api/dimension-drawings/:id
pub async fn delete_drawing(Path(id): Path<String>) -> ApiResult<bool> {
    let id = parse_id::<TableDrawingId>(&id)?;
    a005_dimension_table::service::delete_drawing(id.value())
        .await
        .map(Json)
        .map_err(|e| error_response("a005 delete drawing", e))
}

// ============================================================================
// Значения
// ============================================================================

/// GET /api/dimension-tables/:id/cells
pub async fn list_cells(Path(id): Path<String>) -> ApiResult<Vec<DimensionCell>> {
    let id = parse_id::<DimensionTableId>(&id)?;
    a005_dimension_table::service::list_cells(id)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 cells", e))
}

/// PUT /api/dimension-cells
pub async fn upsert_cell(Json(dto): Json<DimensionCellDto>) -> ApiResult<DimensionCell> {
    a005_dimension_table::service::upsert_cell(dto)
        .await
        .map(Json)
        .map_err(|e| error_response("a005 upsert cell", e))
}
