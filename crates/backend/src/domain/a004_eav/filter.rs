//! Фильтрация и поиск сущностей по значениям EAV

use contracts::domain::a004_eav::{EavFilter, EavFilterOperation};
use std::collections::{BTreeSet, HashMap};

/// Сохраненное значение: (entity_id, value_text)
pub type StoredValue = (String, String);

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Удовлетворяет ли значение условию
///
/// Для gt/lt нечисловые сохраненные значения не подходят.
pub fn value_matches(operation: EavFilterOperation, expected: &str, stored: &str) -> bool {
    match operation {
        EavFilterOperation::Exact => stored == expected,
        EavFilterOperation::Icontains => stored.to_lowercase().contains(&expected.to_lowercase()),
        EavFilterOperation::Gt | EavFilterOperation::Lt => {
            match (parse_number(stored), parse_number(expected)) {
                (Some(value), Some(bound)) if operation == EavFilterOperation::Gt => value > bound,
                (Some(value), Some(bound)) => value < bound,
                _ => false,
            }
        }
    }
}

/// Сущности, удовлетворяющие всем условиям
///
/// `values_by_attribute` - значения по коду атрибута; отсутствие атрибута дает пустой результат.
/// Условие gt/lt с нечисловой границей пропускается.
pub fn apply_filters(
    candidates: BTreeSet<String>,
    filters: &[EavFilter],
    values_by_attribute: &HashMap<String, Vec<StoredValue>>,
) -> Vec<String> {
    let mut result = candidates;
    for filter in filters {
        let Some(values) = values_by_attribute.get(&filter.attribute) else {
            return Vec::new();
        };
        let numeric = matches!(
            filter.operation,
            EavFilterOperation::Gt | EavFilterOperation::Lt
        );
        if numeric && parse_number(&filter.value).is_none() {
            continue;
        }
        let matched: BTreeSet<&str> = values
            .iter()
            .filter(|(_, stored)| value_matches(filter.operation, &filter.value, stored))
            .map(|(entity_id, _)| entity_id.as_str())
            .collect();
        result.retain(|entity_id| matched.contains(entity_id.as_str()));
    }
    result.into_iter().collect()
}

/// Сущности, у которых хотя бы одно значение содержит текст (без учета регистра)
pub fn search_text(values: &[StoredValue], text: &str) -> Vec<String> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    values
        .iter()
        .filter(|(_, stored)| stored.to_lowercase().contains(&needle))
        .map(|(entity_id, _)| entity_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(pairs: &[(&str, &str)]) -> Vec<StoredValue> {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect()
    }

    fn sample() -> (BTreeSet<String>, HashMap<String, Vec<StoredValue>>) {
        let mut values = HashMap::new();
        values.insert(
            "weight".to_string(),
            stored(&[("s1", "12.5"), ("s2", "40"), ("s3", "тяжелый")]),
        );
        values.insert(
            "material".to_string(),
            stored(&[("s1", "Нержавеющая сталь"), ("s2", "Чугун"), ("s3", "Сталь")]),
        );
        let candidates = ["s1", "s2", "s3"].iter().map(|s| s.to_string()).collect();
        (candidates, values)
    }

    fn filter(key: &str, value: &str) -> EavFilter {
        EavFilter::parse(key, value).unwrap()
    }

    #[test]
    fn test_numeric_filters_skip_non_numeric_values() {
        let (candidates, values) = sample();
        assert_eq!(
            apply_filters(candidates.clone(), &[filter("weight__gt", "20")], &values),
            vec!["s2".to_string()]
        );
        assert_eq!(
            apply_filters(candidates, &[filter("weight__lt", "20")], &values),
            vec!["s1".to_string()]
        );
    }

    #[test]
    fn test_filters_are_combined() {
        let (candidates, values) = sample();
        let result = apply_filters(
            candidates,
            &[filter("material__icontains", "СТАЛЬ"), filter("weight__lt", "100")],
            &values,
        );
        assert_eq!(result, vec!["s1".to_string()]);
    }

    #[test]
    fn test_unknown_attribute_gives_empty_result() {
        let (candidates, values) = sample();
        assert!(apply_filters(candidates, &[filter("color", "red")], &values).is_empty());
    }

    #[test]
    fn test_non_numeric_bound_is_ignored() {
        let (candidates, values) = sample();
        let result = apply_filters(candidates, &[filter("weight__gt", "много")], &values);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_exact_and_search() {
        let (candidates, values) = sample();
        assert_eq!(
            apply_filters(candidates, &[filter("material", "Чугун")], &values),
            vec!["s2".to_string()]
        );
        assert_eq!(
            search_text(&values["material"], "сталь"),
            vec!["s1".to_string(), "s3".to_string()]
        );
        assert!(search_text(&values["material"], "  ").is_empty());
    }
}
