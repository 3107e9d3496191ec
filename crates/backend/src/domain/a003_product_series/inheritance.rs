//! Наследование полей серии по цепочке `original_series_id`

use contracts::domain::a003_product_series::{
    EffectiveSeries, ProductSeries, ProductSeriesId, ResolvedValue, SeriesField,
};
use contracts::domain::common::AggregateId;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Глубина поиска значения поля (уровень 0 - сама серия)
pub const MAX_RECURSION: usize = 5;

/// Предел длины цепочки для глубины, предков и `will_inherit`
pub const MAX_CHAIN_DEPTH: usize = 10;

/// Первое значение по цепочке серий и серия, которая его дала
pub fn first_in_chain<T>(
    chain: &[ProductSeriesId],
    mut lookup: impl FnMut(ProductSeriesId) -> Option<T>,
) -> Option<(ProductSeriesId, T)> {
    chain
        .iter()
        .find_map(|&series_id| lookup(series_id).map(|value| (series_id, value)))
}

/// Снимок всех серий для вычислений по цепочке без обращений к БД
pub struct SeriesGraph {
    series: HashMap<ProductSeriesId, ProductSeries>,
}

fn series_label(series: &ProductSeries) -> &str {
    if series.name().trim().is_empty() {
        &series.base.code
    } else {
        series.name()
    }
}

impl SeriesGraph {
    pub fn new(items: Vec<ProductSeries>) -> Self {
        Self {
            series: items.into_iter().map(|s| (s.base.id, s)).collect(),
        }
    }

    pub fn get(&self, id: ProductSeriesId) -> Option<&ProductSeries> {
        self.series.get(&id)
    }

    fn parent(&self, series: &ProductSeries) -> Option<&ProductSeries> {
        series
            .original_series_id
            .and_then(|parent_id| self.series.get(&parent_id))
    }

    /// Эффективное значение поля с указанием источника
    pub fn resolve_field(&self, id: ProductSeriesId, field: SeriesField) -> ResolvedValue {
        let mut visited = HashSet::new();
        let mut current = self.get(id);
        let mut level = 0;

        while let Some(series) = current {
            if level >= MAX_RECURSION {
                return ResolvedValue {
                    field,
                    value: None,
                    source_series_id: None,
                    comment: format!(
                        "Достигнут максимальный уровень рекурсии ({})",
                        MAX_RECURSION
                    ),
                };
            }
            if !visited.insert(series.base.id) {
                break;
            }
            if let Some(value) = series.own_value(field) {
                let comment = if level == 0 {
                    format!("Значение из модели: {}", series_label(series))
                } else {
                    format!(
                        "Значение унаследовано из: {} (уровень {})",
                        series_label(series),
                        level
                    )
                };
                return ResolvedValue {
                    field,
                    value: Some(value),
                    source_series_id: Some(series.base.id.as_string()),
                    comment,
                };
            }
            current = self.parent(series);
            level += 1;
        }

        ResolvedValue {
            field,
            value: None,
            source_series_id: None,
            comment: "Значение не найдено".to_string(),
        }
    }

    pub fn effective_value(&self, id: ProductSeriesId, field: SeriesField) -> Option<Value> {
        self.resolve_field(id, field).value
    }

    /// Все наследуемые поля серии разом
    pub fn effective(&self, id: ProductSeriesId) -> Option<EffectiveSeries> {
        self.get(id)?;
        Some(EffectiveSeries {
            id: id.as_string(),
            inheritance_depth: self.inheritance_depth(id),
            fields: SeriesField::ALL
                .iter()
                .map(|field| self.resolve_field(id, *field))
                .collect(),
            missing_required_fields: self.missing_required_fields(id),
        })
    }

    /// Длина цепочки предков, не больше `MAX_CHAIN_DEPTH`
    pub fn inheritance_depth(&self, id: ProductSeriesId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id);
        while let Some(series) = current {
            if depth >= MAX_CHAIN_DEPTH {
                break;
            }
            match self.parent(series) {
                Some(parent) => {
                    depth += 1;
                    current = Some(parent);
                }
                None => break,
            }
        }
        depth
    }

    /// Предки серии от ближайшего к дальнему
    pub fn ancestors(&self, id: ProductSeriesId) -> Vec<ProductSeriesId> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = self.get(id).and_then(|s| self.parent(s));
        while let Some(series) = current {
            if result.len() >= MAX_CHAIN_DEPTH || !visited.insert(series.base.id) {
                break;
            }
            result.push(series.base.id);
            current = self.parent(series);
        }
        result
    }

    /// Серия и ее предки: порядок поиска унаследованных данных
    pub fn lookup_chain(&self, id: ProductSeriesId) -> Vec<ProductSeriesId> {
        let mut chain = vec![id];
        chain.extend(self.ancestors(id));
        chain
    }

    /// Есть ли непустое значение поля у кого-то из предков
    pub fn will_inherit(&self, id: ProductSeriesId, field: SeriesField) -> bool {
        self.ancestors(id)
            .into_iter()
            .filter_map(|ancestor| self.get(ancestor))
            .any(|series| series.own_value(field).is_some())
    }

    /// Обязательные поля, которые не заполнены и не наследуются
    pub fn missing_required_fields(&self, id: ProductSeriesId) -> Vec<SeriesField> {
        let Some(series) = self.get(id) else {
            return Vec::new();
        };
        SeriesField::REQUIRED
            .iter()
            .copied()
            .filter(|field| series.own_value(*field).is_none() && !self.will_inherit(id, *field))
            .collect()
    }

    /// Приведет ли назначение `new_parent` родителем серии `id` к циклу
    pub fn would_create_cycle(&self, id: ProductSeriesId, new_parent: ProductSeriesId) -> bool {
        if id == new_parent {
            return true;
        }
        let mut visited = HashSet::new();
        let mut current = self.get(new_parent);
        while let Some(series) = current {
            if series.base.id == id {
                return true;
            }
            if !visited.insert(series.base.id) {
                // цикл выше по цепочке уже существует
                return true;
            }
            current = self.parent(series);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_product_series::ProductSeriesDto;

    fn series(code: &str, name: &str, parent: Option<&ProductSeries>) -> ProductSeries {
        let mut s = ProductSeries::new_for_insert(code.into(), name.into());
        s.original_series_id = parent.map(|p| p.base.id);
        s
    }

    /// Цепочка длиной `len`: [0] - корень, [len-1] - самый дальний потомок
    fn chain(len: usize) -> Vec<ProductSeries> {
        let mut items: Vec<ProductSeries> = Vec::new();
        for i in 0..len {
            let parent = items.last();
            let s = series(&format!("S{}", i), &format!("Серия {}", i), parent);
            items.push(s);
        }
        items
    }

    #[test]
    fn test_first_in_chain_walks_to_ancestor() {
        let items = chain(3);
        let ids: Vec<ProductSeriesId> = items.iter().map(|s| s.base.id).collect();
        let graph = SeriesGraph::new(items);
        let lookup_order = graph.lookup_chain(ids[2]);
        assert_eq!(lookup_order, vec![ids[2], ids[1], ids[0]]);

        let mut asked = Vec::new();
        let found = first_in_chain(&lookup_order, |id| {
            asked.push(id);
            (id == ids[1] || id == ids[0]).then_some(id.as_string())
        });
        assert_eq!(found, Some((ids[1], ids[1].as_string())));
        assert_eq!(asked, vec![ids[2], ids[1]]);

        assert_eq!(first_in_chain(&lookup_order, |_| None::<()>), None);
    }

    #[test]
    fn test_own_value_wins() {
        let mut root = series("BV", "Кран шаровой", None);
        root.brand = Some("Tecofi".into());
        let id = root.base.id;
        let graph = SeriesGraph::new(vec![root]);

        let resolved = graph.resolve_field(id, SeriesField::Brand);
        assert_eq!(resolved.value, Some(Value::String("Tecofi".into())));
        assert_eq!(resolved.source_series_id, Some(id.as_string()));
        assert_eq!(resolved.comment, "Значение из модели: Кран шаровой");
    }

    #[test]
    fn test_blank_values_fall_back_to_parent() {
        let mut root = series("BV", "Базовая", None);
        root.producer = Some("Завод".into());
        root.port_qty = Some(2);
        let mut child = series("", "  ", Some(&root));
        child.producer = Some("   ".into());
        let (root_id, child_id) = (root.base.id, child.base.id);
        let graph = SeriesGraph::new(vec![root, child]);

        let producer = graph.resolve_field(child_id, SeriesField::Producer);
        assert_eq!(producer.value, Some(Value::String("Завод".into())));
        assert_eq!(producer.source_series_id, Some(root_id.as_string()));
        assert_eq!(producer.comment, "Значение унаследовано из: Базовая (уровень 1)");

        assert_eq!(graph.effective_value(child_id, SeriesField::PortQty), Some(Value::from(2)));
        assert_eq!(
            graph.effective_value(child_id, SeriesField::Code),
            Some(Value::String("BV".into()))
        );
    }

    #[test]
    fn test_not_found_comment() {
        let root = series("BV", "Базовая", None);
        let id = root.base.id;
        let graph = SeriesGraph::new(vec![root]);

        let resolved = graph.resolve_field(id, SeriesField::SealingClass);
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.comment, "Значение не найдено");
    }

    #[test]
    fn test_recursion_limit() {
        let mut items = chain(7);
        items[0].brand = Some("Root".into());
        let leaf = items[6].base.id;
        let graph = SeriesGraph::new(items);

        let resolved = graph.resolve_field(leaf, SeriesField::Brand);
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.comment, "Достигнут максимальный уровень рекурсии (5)");
    }

    #[test]
    fn test_value_at_level_four_is_reachable() {
        let mut items = chain(5);
        items[0].brand = Some("Root".into());
        let leaf = items[4].base.id;
        let graph = SeriesGraph::new(items);

        let resolved = graph.resolve_field(leaf, SeriesField::Brand);
        assert_eq!(resolved.value, Some(Value::String("Root".into())));
        assert!(resolved.comment.ends_with("(уровень 4)"));
    }

    #[test]
    fn test_cycles_terminate() {
        let mut a = series("A", "A", None);
        let mut b = series("B", "B", None);
        a.original_series_id = Some(b.base.id);
        b.original_series_id = Some(a.base.id);
        let a_id = a.base.id;
        let graph = SeriesGraph::new(vec![a, b]);

        assert_eq!(graph.resolve_field(a_id, SeriesField::Brand).value, None);
        assert_eq!(graph.ancestors(a_id).len(), 1);
        assert!(!graph.will_inherit(a_id, SeriesField::Brand));
        assert_eq!(graph.inheritance_depth(a_id), MAX_CHAIN_DEPTH);
    }

    #[test]
    fn test_depth_and_ancestors() {
        let items = chain(4);
        let ids: Vec<ProductSeriesId> = items.iter().map(|s| s.base.id).collect();
        let graph = SeriesGraph::new(items);

        assert_eq!(graph.inheritance_depth(ids[0]), 0);
        assert_eq!(graph.inheritance_depth(ids[3]), 3);
        assert_eq!(graph.ancestors(ids[3]), vec![ids[2], ids[1], ids[0]]);
        assert_eq!(graph.lookup_chain(ids[1]), vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut root = series("BV", "Базовая", None);
        root.brand = Some("Tecofi".into());
        let child = series("", "Дочерняя", Some(&root));
        let child_id = child.base.id;
        let root_id = root.base.id;
        let graph = SeriesGraph::new(vec![root, child]);

        assert_eq!(graph.missing_required_fields(child_id), vec![SeriesField::Producer]);
        assert_eq!(graph.missing_required_fields(root_id), vec![SeriesField::Producer]);
        assert!(graph.will_inherit(child_id, SeriesField::Code));
    }

    #[test]
    fn test_would_create_cycle() {
        let items = chain(3);
        let ids: Vec<ProductSeriesId> = items.iter().map(|s| s.base.id).collect();
        let graph = SeriesGraph::new(items);

        assert!(graph.would_create_cycle(ids[0], ids[2]));
        assert!(graph.would_create_cycle(ids[1], ids[1]));
        assert!(!graph.would_create_cycle(ids[2], ids[0]));
    }

    #[test]
    fn test_effective_lists_every_field() {
        let dto = ProductSeriesDto {
            brand: Some("Tecofi".into()),
            ..ProductSeriesDto::new("BV", "Кран")
        };
        let root = ProductSeries::from_dto(&dto);
        let id = root.base.id;
        let graph = SeriesGraph::new(vec![root]);

        let effective = graph.effective(id).unwrap();
        assert_eq!(effective.fields.len(), SeriesField::ALL.len());
        assert_eq!(effective.inheritance_depth, 0);
        assert!(graph.effective(ProductSeriesId::new_v4()).is_none());
    }
}
