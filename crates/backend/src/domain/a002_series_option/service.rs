use super::defaults::{self, DefaultOutcome};
use super::repository;
use super::store::DbSeriesOptionStore;
use crate::domain::a001_catalog_option::repository as catalog_repository;
use crate::domain::a003_product_series::inheritance::first_in_chain;
use crate::domain::a003_product_series::{repository as series_repository, service as series_service};
use crate::shared::error::DomainError;
use contracts::domain::a001_catalog_option::OptionKind;
use contracts::domain::a002_series_option::{EffectiveOptions, SeriesOption, SeriesOptionDto};
use contracts::domain::a003_product_series::ProductSeriesId;
use contracts::domain::common::AggregateId;
use std::collections::HashMap;
use uuid::Uuid;

/// Активные опции в порядке сортировки
pub fn available(options: &[SeriesOption]) -> Vec<SeriesOption> {
    let mut items: Vec<SeriesOption> = options.iter().filter(|o| o.is_active).cloned().collect();
    items.sort_by_key(|o| o.sorting_order);
    items
}

/// Проверки, требующие БД: серия, значение справочника, соседние опции
async fn check_against_store(option: &SeriesOption) -> anyhow::Result<()> {
    if series_repository::get_by_id(option.series_id.value()).await?.is_none() {
        return Err(DomainError::validation("Серия не найдена"));
    }

    if let Some(option_id) = option.option_id {
        let catalog_option = catalog_repository::get_by_id(option_id.value())
            .await?
            .filter(|c| !c.base.metadata.is_deleted)
            .ok_or_else(|| DomainError::validation("Значение справочника не найдено"))?;
        if catalog_option.kind != option.kind {
            return Err(DomainError::validation(format!(
                "Значение '{}' не относится к справочнику '{}'",
                catalog_option.base.code,
                option.kind.label()
            )));
        }
    }

    let siblings = repository::list_for(option.series_id, option.kind).await?;
    defaults::check_write_invariants(option, &siblings).map_err(DomainError::validation)
}

/// Создание опции серии
pub async fn create(dto: SeriesOptionDto) -> anyhow::Result<Uuid> {
    let mut aggregate = SeriesOption::from_dto(&dto);

    aggregate.validate().map_err(DomainError::validation)?;
    check_against_store(&aggregate).await?;

    aggregate.before_write();
    repository::insert(&aggregate).await
}

/// Обновление опции серии
pub async fn update(dto: SeriesOptionDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Опция не найдена"))?;

    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();

    aggregate.validate().map_err(DomainError::validation)?;
    check_against_store(&aggregate).await?;

    aggregate.before_write();
    repository::update(&aggregate).await
}

/// Мягкое удаление опции
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<SeriesOption>> {
    repository::get_by_id(id).await
}

pub async fn list_for_series(series_id: ProductSeriesId) -> anyhow::Result<Vec<SeriesOption>> {
    repository::list_for_series(series_id).await
}

/// Доступные (активные) опции серии
pub async fn list_available(
    series_id: ProductSeriesId,
    kind: OptionKind,
) -> anyhow::Result<Vec<SeriesOption>> {
    Ok(available(&repository::list_for(series_id, kind).await?))
}

/// Активная стандартная опция
pub async fn default_option(
    series_id: ProductSeriesId,
    kind: OptionKind,
) -> anyhow::Result<Option<SeriesOption>> {
    Ok(list_available(series_id, kind)
        .await?
        .into_iter()
        .find(|o| o.is_default))
}

/// Активные опции первой серии цепочки, у которой они есть
pub fn effective_in_chain(
    series_id: ProductSeriesId,
    kind: OptionKind,
    chain: &[ProductSeriesId],
    mut options_of: impl FnMut(ProductSeriesId) -> Vec<SeriesOption>,
) -> EffectiveOptions {
    let found = first_in_chain(chain, |candidate| {
        let options = available(&options_of(candidate));
        (!options.is_empty()).then_some(options)
    });
    let (source_series_id, options) = match found {
        Some((source, options)) => (
            Some(source.as_string()),
            options.iter().map(SeriesOption::option_info).collect(),
        ),
        None => (None, Vec::new()),
    };
    EffectiveOptions {
        series_id: series_id.as_string(),
        kind,
        source_series_id,
        options,
    }
}

/// Опции серии или ближайшего предка, у которого они есть
pub async fn effective_options(
    series_id: ProductSeriesId,
    kind: OptionKind,
) -> anyhow::Result<EffectiveOptions> {
    let chain = series_service::lookup_chain(series_id).await?;
    let mut by_series: HashMap<ProductSeriesId, Vec<SeriesOption>> = HashMap::new();
    for candidate in &chain {
        by_series.insert(*candidate, repository::list_for(*candidate, kind).await?);
    }
    Ok(effective_in_chain(series_id, kind, &chain, |candidate| {
        by_series.remove(&candidate).unwrap_or_default()
    }))
}

/// Гарантировать стандартную опцию вида у серии
pub async fn ensure_default_exists(
    series_id: ProductSeriesId,
    kind: OptionKind,
) -> anyhow::Result<DefaultOutcome> {
    if series_repository::get_by_id(series_id.value()).await?.is_none() {
        return Err(DomainError::not_found("Серия не найдена"));
    }
    defaults::ensure_default_exists(&DbSeriesOptionStore, series_id, kind).await
}

/// IP-опция серии с наивысшим рангом
pub async fn highest_ip_option(series_id: ProductSeriesId) -> anyhow::Result<Option<SeriesOption>> {
    let options = list_available(series_id, OptionKind::Ip).await?;
    let catalog = catalog_repository::list_by_kind(OptionKind::Ip, false).await?;
    Ok(defaults::highest_ip(&options, &catalog).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_skips_inactive_and_sorts() {
        let series = ProductSeriesId::new_v4();
        let mut items = Vec::new();
        for (encoding, order, active) in [("B", 2, true), ("X", 0, false), ("A", 1, true)] {
            let mut option =
                SeriesOption::new_for_insert(series, OptionKind::Switches, encoding.into(), String::new());
            option.sorting_order = order;
            option.is_active = active;
            items.push(option);
        }

        let encodings: Vec<String> = available(&items)
            .iter()
            .map(|o| o.encoding().to_string())
            .collect();
        assert_eq!(encodings, vec!["A".to_string(), "B".to_string()]);
    }

    fn option(series: ProductSeriesId, encoding: &str, active: bool) -> SeriesOption {
        let mut option =
            SeriesOption::new_for_insert(series, OptionKind::Ip, encoding.into(), String::new());
        option.is_active = active;
        option
    }

    #[test]
    fn test_effective_options_fall_back_to_ancestor() {
        let (child, parent, root) = (
            ProductSeriesId::new_v4(),
            ProductSeriesId::new_v4(),
            ProductSeriesId::new_v4(),
        );
        let chain = [child, parent, root];
        // у потомка только неактивная опция, она не считается
        let mut stored: HashMap<ProductSeriesId, Vec<SeriesOption>> = HashMap::new();
        stored.insert(child, vec![option(child, "IP54", false)]);
        stored.insert(parent, vec![option(parent, "IP65", true)]);
        stored.insert(root, vec![option(root, "IP68", true)]);

        let effective = effective_in_chain(child, OptionKind::Ip, &chain, |id| {
            stored.get(&id).cloned().unwrap_or_default()
        });
        assert_eq!(effective.series_id, child.as_string());
        assert_eq!(effective.source_series_id, Some(parent.as_string()));
        assert_eq!(effective.options.len(), 1);
        assert_eq!(effective.options[0].encoding, "IP65");
    }

    #[test]
    fn test_effective_options_prefer_own_and_handle_empty_chain() {
        let (child, parent) = (ProductSeriesId::new_v4(), ProductSeriesId::new_v4());
        let own = effective_in_chain(child, OptionKind::Ip, &[child, parent], |id| {
            vec![option(id, if id == child { "IP67" } else { "IP54" }, true)]
        });
        assert_eq!(own.source_series_id, Some(child.as_string()));
        assert_eq!(own.options[0].encoding, "IP67");

        let none = effective_in_chain(child, OptionKind::Ip, &[child, parent], |_| Vec::new());
        assert_eq!(none.source_series_id, None);
        assert!(none.options.is_empty());
    }
}
