use super::matrix_builder::{self, DimensionSource};
use super::{cell_repository, drawing_repository, parameter_repository, repository};
use crate::domain::{a001_catalog_option, a003_product_series};
use crate::shared::error::DomainError;
use contracts::domain::a001_catalog_option::{CatalogOption, CatalogOptionId, OptionKind};
use contracts::domain::a003_product_series::{ProductSeriesId, ResolvedValue, SeriesField};
use contracts::domain::a005_dimension_table::{
    DimensionCell, DimensionCellDto, DimensionCellId, DimensionData, DimensionParameter, DimensionParameterDto,
    DimensionParameterId, DimensionTable, DimensionTableDto, DimensionTableId,
    DuplicateTableRequest, SeriesDimensionData, TableDrawing, TableDrawingDto, TableDrawingId,
};
use contracts::domain::common::AggregateId;
use std::collections::HashMap;
use uuid::Uuid;

fn parse_dto_id(id: Option<&str>) -> anyhow::Result<Uuid> {
    id.and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))
}

async fn ensure_code_unique(code: &str, exclude: Option<DimensionTableId>) -> anyhow::Result<()> {
    if let Some(existing) = repository::get_by_code(code).await? {
        if Some(existing.base.id) != exclude {
            return Err(DomainError::conflict(format!(
                "Таблица с кодом '{}' уже существует",
                code
            )));
        }
    }
    Ok(())
}

async fn require_table(id: DimensionTableId) -> anyhow::Result<DimensionTable> {
    repository::get_by_id(id.value())
        .await?
        .ok_or_else(|| DomainError::not_found("Таблица ВГХ не найдена"))
}

// ============================================================================
// Таблицы
// ============================================================================

pub async fn create(dto: DimensionTableDto) -> anyhow::Result<Uuid> {
    let mut aggregate = DimensionTable::from_dto(&dto);
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate.base.code, None).await?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn update(dto: DimensionTableDto) -> anyhow::Result<()> {
    let id = parse_dto_id(dto.id.as_deref())?;
    let mut aggregate = require_table(DimensionTableId(id)).await?;
    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate.base.code, Some(aggregate.base.id)).await?;
    aggregate.before_write();
    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<DimensionTable>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<DimensionTable>> {
    repository::list_all().await
}

// ============================================================================
// Параметры
// ============================================================================

pub async fn list_parameters(table_id: DimensionTableId) -> anyhow::Result<Vec<DimensionParameter>> {
    require_table(table_id).await?;
    parameter_repository::list_for_table(table_id).await
}

pub async fn create_parameter(
    table_id: DimensionTableId,
    dto: DimensionParameterDto,
) -> anyhow::Result<Uuid> {
    require_table(table_id).await?;
    let parameter = DimensionParameter::from_dto(table_id, &dto);
    parameter.validate().map_err(DomainError::validation)?;
    parameter_repository::insert(&parameter).await
}

pub async fn update_parameter(dto: DimensionParameterDto) -> anyhow::Result<()> {
    let id = parse_dto_id(dto.id.as_deref())?;
    let current = parameter_repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Параметр не найден"))?;

    let mut parameter = DimensionParameter::from_dto(current.table_id, &dto);
    parameter.id = current.id;
    parameter.metadata.created_at = current.metadata.created_at;
    parameter.validate().map_err(DomainError::validation)?;
    parameter_repository::update(&parameter).await
}

/// Удаление параметра вместе с его значениями
pub async fn delete_parameter(id: Uuid) -> anyhow::Result<bool> {
    let removed = cell_repository::delete_for_parameter(DimensionParameterId(id)).await?;
    tracing::debug!("a005: удалено значений параметра {}: {}", id, removed);
    parameter_repository::delete(id).await
}

// ============================================================================
// Чертежи
// ============================================================================

pub async fn list_drawings(table_id: DimensionTableId) -> anyhow::Result<Vec<TableDrawing>> {
    require_table(table_id).await?;
    drawing_repository::list_for_table(table_id).await
}

pub async fn create_drawing(table_id: DimensionTableId, dto: TableDrawingDto) -> anyhow::Result<Uuid> {
    require_table(table_id).await?;
    let drawing = TableDrawing::from_dto(table_id, &dto);
    drawing.validate().map_err(DomainError::validation)?;
    drawing_repository::insert(&drawing).await
}

pub async fn update_drawing(dto: TableDrawingDto) -> anyhow::Result<()> {
    let id = parse_dto_id(dto.id.as_deref())?;
    let current = drawing_repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Чертеж не найден"))?;

    let mut drawing = TableDrawing::from_dto(current.table_id, &dto);
    drawing.id = current.id;
    drawing.metadata.created_at = current.metadata.created_at;
    drawing.validate().map_err(DomainError::validation)?;
    drawing_repository::update(&drawing).await
}

pub async fn delete_drawing(id: Uuid) -> anyhow::Result<bool> {
    drawing_repository::delete(id).await
}

// ============================================================================
// Значения
// ============================================================================

async fn parameter_ids(table_id: DimensionTableId) -> anyhow::Result<Vec<DimensionParameterId>> {
    Ok(parameter_repository::list_for_table(table_id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect())
}

pub async fn list_cells(table_id: DimensionTableId) -> anyhow::Result<Vec<DimensionCell>> {
    require_table(table_id).await?;
    cell_repository::list_for_parameters(&parameter_ids(table_id).await?).await
}

fn require_axis(option: Option<CatalogOption>, kind: OptionKind) -> anyhow::Result<()> {
    match option {
        Some(o) if o.kind == kind => Ok(()),
        _ => Err(DomainError::validation(format!(
            "{}: значение не найдено в справочнике",
            kind.label()
        ))),
    }
}

/// Запись значения; для существующей пары (параметр, DN, PN) значение заменяется
pub async fn upsert_cell(dto: DimensionCellDto) -> anyhow::Result<DimensionCell> {
    let cell = DimensionCell::from_dto(&dto);
    cell.validate().map_err(DomainError::validation)?;

    parameter_repository::get_by_id(cell.parameter_id.value())
        .await?
        .ok_or_else(|| DomainError::not_found("Параметр не найден"))?;
    require_axis(
        a001_catalog_option::service::get_by_id(cell.dn_id.value()).await?,
        OptionKind::Dn,
    )?;
    require_axis(
        a001_catalog_option::service::get_by_id(cell.pn_id.value()).await?,
        OptionKind::Pn,
    )?;

    cell_repository::upsert(&cell).await
}

/// Удаление всех значений таблицы для PN
pub async fn delete_pn_data(table_id: DimensionTableId, pn_code: &str) -> anyhow::Result<u64> {
    require_table(table_id).await?;
    let pn = a001_catalog_option::service::find_by_code(OptionKind::Pn, pn_code)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Pn '{}' не найден", pn_code.trim())))?;
    let removed = cell_repository::delete_for_pn(&parameter_ids(table_id).await?, pn.base.id).await?;
    tracing::info!(
        "a005: удалено {} значений {} из таблицы {}",
        removed,
        pn.base.code,
        table_id
    );
    Ok(removed)
}

// ============================================================================
// Представление
// ============================================================================

async fn resolve_axis(
    kind: OptionKind,
    requested: Option<&[String]>,
    present: Vec<CatalogOptionId>,
) -> anyhow::Result<(Vec<CatalogOption>, Vec<String>)> {
    match requested {
        Some(codes) => a001_catalog_option::service::resolve_codes(kind, codes).await,
        None => Ok((
            a001_catalog_option::service::get_by_ids(&present).await?,
            Vec::new(),
        )),
    }
}

/// Матрицы и чертежи таблицы для выбранных DN/PN
///
/// `None` вместо списка означает все DN/PN, присутствующие в таблице.
pub async fn get_dimension_data(
    table_id: DimensionTableId,
    dn_list: Option<&[String]>,
    pn_list: Option<&[String]>,
    export: bool,
) -> anyhow::Result<DimensionData> {
    require_table(table_id).await?;
    let parameters = parameter_repository::list_for_table(table_id).await?;
    let ids: Vec<DimensionParameterId> = parameters.iter().map(|p| p.id).collect();
    let cells = cell_repository::list_for_parameters(&ids).await?;
    let drawings = drawing_repository::list_for_table(table_id).await?;
    let dn_catalog = a001_catalog_option::service::list_by_kind(OptionKind::Dn, false).await?;

    let (present_dn, present_pn) = matrix_builder::axes_in_cells(&cells);
    let (dns, mut errors) = resolve_axis(OptionKind::Dn, dn_list, present_dn).await?;
    let (pns, pn_errors) = resolve_axis(OptionKind::Pn, pn_list, present_pn).await?;
    errors.extend(pn_errors);

    let source = DimensionSource {
        parameters: &parameters,
        cells: &cells,
        drawings: &drawings,
        dn_catalog: &dn_catalog,
    };
    let data = matrix_builder::build_dimension_data(&source, dns, pns, errors, export);
    tracing::info!(
        "a005: таблица {}: {} чертежей, {} матриц",
        table_id,
        data.images.len(),
        data.matrices.len()
    );
    Ok(data)
}

/// Копия таблицы с параметрами, чертежами и значениями
pub async fn duplicate_table(id: DimensionTableId, request: DuplicateTableRequest) -> anyhow::Result<Uuid> {
    let source = require_table(id).await?;
    let mut copy = source.duplicate(request.new_name.as_deref(), request.new_code.as_deref());
    copy.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&copy.base.code, None).await?;
    copy.before_write();
    let new_id = repository::insert(&copy).await?;
    let new_table_id = DimensionTableId(new_id);

    let parameters = parameter_repository::list_for_table(id).await?;
    let old_ids: Vec<DimensionParameterId> = parameters.iter().map(|p| p.id).collect();
    let cells = cell_repository::list_for_parameters(&old_ids).await?;

    let mut mapping = HashMap::new();
    for parameter in parameters {
        let mut cloned = parameter.clone();
        cloned.id = DimensionParameterId::new_v4();
        cloned.table_id = new_table_id;
        parameter_repository::insert(&cloned).await?;
        mapping.insert(parameter.id, cloned.id);
    }

    for drawing in drawing_repository::list_for_table(id).await? {
        let mut cloned = drawing;
        cloned.id = TableDrawingId::new_v4();
        cloned.table_id = new_table_id;
        drawing_repository::insert(&cloned).await?;
    }

    let mut copied_cells = 0usize;
    for cell in cells {
        let Some(new_parameter) = mapping.get(&cell.parameter_id) else {
            continue;
        };
        let mut cloned = cell;
        cloned.id = DimensionCellId::new_v4();
        cloned.parameter_id = *new_parameter;
        cell_repository::upsert(&cloned).await?;
        copied_cells += 1;
    }

    tracing::info!(
        "a005: таблица {} скопирована в {} ({} параметров, {} значений)",
        source.base.code,
        copy.base.code,
        mapping.len(),
        copied_cells
    );
    Ok(new_id)
}

/// Таблица ВГХ из унаследованного значения поля серии
pub fn resolved_table(resolved: &ResolvedValue) -> Option<DimensionTableId> {
    resolved
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DimensionTableId::from_string(s).ok())
}

/// Данные ВГХ серии; таблица берется из серии или ближайшего предка
pub async fn series_dimension_data(
    series_id: ProductSeriesId,
    dn_list: Option<&[String]>,
    pn_list: Option<&[String]>,
) -> anyhow::Result<SeriesDimensionData> {
    let resolved =
        a003_product_series::service::resolve_field(series_id, SeriesField::DimensionTableId).await?;

    let Some(table_id) = resolved_table(&resolved) else {
        return Ok(SeriesDimensionData {
            table_id: None,
            source_series_id: None,
            data: DimensionData {
                errors: vec!["Для серии не задана таблица ВГХ".into()],
                ..Default::default()
            },
        });
    };

    let data = get_dimension_data(table_id, dn_list, pn_list, false).await?;
    Ok(SeriesDimensionData {
        table_id: Some(table_id.as_string()),
        source_series_id: resolved.source_series_id,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_product_series::inheritance::SeriesGraph;
    use contracts::domain::a003_product_series::ProductSeries;

    fn series(code: &str, parent: Option<&ProductSeries>) -> ProductSeries {
        let mut s = ProductSeries::new_for_insert(code.into(), code.into());
        s.original_series_id = parent.map(|p| p.base.id);
        s
    }

    #[test]
    fn test_table_inherited_from_ancestor() {
        let table = DimensionTableId::new_v4();
        let mut root = series("BV", None);
        root.dimension_table_id = Some(table);
        let middle = series("BV-1", Some(&root));
        let leaf = series("BV-1-2", Some(&middle));
        let (root_id, leaf_id) = (root.base.id, leaf.base.id);
        let graph = SeriesGraph::new(vec![root, middle, leaf]);

        let resolved = graph.resolve_field(leaf_id, SeriesField::DimensionTableId);
        assert_eq!(resolved_table(&resolved), Some(table));
        assert_eq!(resolved.source_series_id, Some(root_id.as_string()));
    }

    #[test]
    fn test_own_table_wins_and_missing_table_is_none() {
        let (inherited, own) = (DimensionTableId::new_v4(), DimensionTableId::new_v4());
        let mut root = series("BV", None);
        root.dimension_table_id = Some(inherited);
        let mut child = series("BV-1", Some(&root));
        child.dimension_table_id = Some(own);
        let lonely = series("GV", None);
        let (child_id, lonely_id) = (child.base.id, lonely.base.id);
        let graph = SeriesGraph::new(vec![root, child, lonely]);

        let resolved = graph.resolve_field(child_id, SeriesField::DimensionTableId);
        assert_eq!(resolved_table(&resolved), Some(own));
        assert_eq!(resolved.source_series_id, Some(child_id.as_string()));

        let resolved = graph.resolve_field(lonely_id, SeriesField::DimensionTableId);
        assert_eq!(resolved_table(&resolved), None);
    }
}
