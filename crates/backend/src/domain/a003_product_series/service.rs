use super::inheritance::SeriesGraph;
use super::repository;
use crate::shared::error::DomainError;
use contracts::domain::a003_product_series::{
    EffectiveSeries, ProductSeries, ProductSeriesDto, ProductSeriesId, ResolvedValue, SeriesField,
};
use uuid::Uuid;

/// Граф всех действующих серий
pub async fn load_graph() -> anyhow::Result<SeriesGraph> {
    Ok(SeriesGraph::new(repository::list_all().await?))
}

/// Проверка родителя: существует и не замыкает цепочку
fn check_parent(graph: &SeriesGraph, series: &ProductSeries) -> anyhow::Result<()> {
    let Some(parent_id) = series.original_series_id else {
        return Ok(());
    };
    if graph.get(parent_id).is_none() {
        return Err(DomainError::validation("Базовая серия не найдена"));
    }
    if graph.would_create_cycle(series.base.id, parent_id) {
        return Err(DomainError::validation(
            "Обнаружена циклическая ссылка в цепочке наследования",
        ));
    }
    Ok(())
}

/// Создание новой серии
pub async fn create(dto: ProductSeriesDto) -> anyhow::Result<Uuid> {
    let mut aggregate = ProductSeries::from_dto(&dto);

    aggregate.validate().map_err(DomainError::validation)?;
    check_parent(&load_graph().await?, &aggregate)?;

    aggregate.before_write();
    repository::insert(&aggregate).await
}

/// Обновление серии; смена родителя проверяется на циклы
pub async fn update(dto: ProductSeriesDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Серия не найдена"))?;

    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();

    aggregate.validate().map_err(DomainError::validation)?;
    check_parent(&load_graph().await?, &aggregate)?;

    aggregate.before_write();
    repository::update(&aggregate).await
}

/// Мягкое удаление серии
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ProductSeries>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<ProductSeries>> {
    repository::list_all().await
}

async fn graph_with(id: ProductSeriesId) -> anyhow::Result<SeriesGraph> {
    let graph = load_graph().await?;
    if graph.get(id).is_none() {
        return Err(DomainError::not_found("Серия не найдена"));
    }
    Ok(graph)
}

/// Эффективное значение поля с источником
pub async fn resolve_field(id: ProductSeriesId, field: SeriesField) -> anyhow::Result<ResolvedValue> {
    Ok(graph_with(id).await?.resolve_field(id, field))
}

/// Все наследуемые поля серии
pub async fn effective(id: ProductSeriesId) -> anyhow::Result<EffectiveSeries> {
    graph_with(id)
        .await?
        .effective(id)
        .ok_or_else(|| DomainError::not_found("Серия не найдена"))
}

pub async fn missing_required_fields(id: ProductSeriesId) -> anyhow::Result<Vec<SeriesField>> {
    Ok(graph_with(id).await?.missing_required_fields(id))
}

/// Серия и ее предки, от ближайшего к дальнему
pub async fn lookup_chain(id: ProductSeriesId) -> anyhow::Result<Vec<ProductSeriesId>> {
    Ok(graph_with(id).await?.lookup_chain(id))
}
