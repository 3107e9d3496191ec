use super::filter::{self, StoredValue};
use super::typed_value::{detect_value_type, encode_value, typed_value};
use super::{attribute_repository, value_repository};
use crate::domain::a003_product_series;
use crate::shared::error::DomainError;
use contracts::domain::a003_product_series::ProductSeriesId;
use contracts::domain::a004_eav::{
    EavAttribute, EavAttributeDto, EavAttributeId, EavEntityData, EavFilter, EavValue,
    SetEavValueRequest,
};
use contracts::domain::common::AggregateId;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

/// Тип сущности для серий изделий
pub const SERIES_ENTITY_TYPE: &str = "product_series";

// ============================================================================
// Чистые функции
// ============================================================================

/// Текст сохраненного значения; пустая строка означает очищенное значение
fn stored_text(value: &EavValue) -> Option<&str> {
    let text = value.value_text.as_str();
    (!text.trim().is_empty()).then_some(text)
}

/// Код атрибута -> типизированное значение; очищенные значения пропускаются
pub fn typed_values(attributes: &[EavAttribute], values: &[EavValue]) -> BTreeMap<String, Value> {
    let by_id: HashMap<EavAttributeId, &EavAttribute> =
        attributes.iter().map(|a| (a.base.id, a)).collect();
    values
        .iter()
        .filter_map(|value| {
            let attribute = by_id.get(&value.attribute_id)?;
            let text = stored_text(value)?;
            Some((attribute.base.code.clone(), typed_value(attribute.value_type, text)))
        })
        .collect()
}

/// Типизированное сохраненное значение или `default`
pub fn value_or_default(
    attribute: &EavAttribute,
    stored: Option<&EavValue>,
    default: Option<Value>,
) -> Option<Value> {
    match stored.and_then(stored_text) {
        Some(text) => Some(typed_value(attribute.value_type, text)),
        None => default,
    }
}

/// Обязательные атрибуты, применимые к типу сущности, без значения
pub fn missing_required_in(
    attributes: &[EavAttribute],
    values: &[EavValue],
    entity_type: &str,
) -> Vec<String> {
    let filled: BTreeSet<EavAttributeId> = values
        .iter()
        .filter(|v| stored_text(v).is_some())
        .map(|v| v.attribute_id)
        .collect();
    attributes
        .iter()
        .filter(|a| a.is_required && a.applies_to(entity_type))
        .filter(|a| !filled.contains(&a.base.id))
        .map(|a| a.base.code.clone())
        .collect()
}

/// Значение атрибута по цепочке серий: своя серия, ближайший предок, значение по умолчанию
pub fn resolve_in_chain(
    attribute: &EavAttribute,
    chain: &[ProductSeriesId],
    values: &[EavValue],
) -> Option<Value> {
    let own: HashMap<&str, &str> = values
        .iter()
        .filter(|v| v.attribute_id == attribute.base.id)
        .filter_map(|v| Some((v.entity_id.as_str(), stored_text(v)?)))
        .collect();

    chain
        .iter()
        .find_map(|series_id| own.get(series_id.as_string().as_str()).copied())
        .or(attribute
            .default_value
            .as_deref()
            .filter(|d| !d.trim().is_empty()))
        .map(|raw| typed_value(attribute.value_type, raw))
}

fn stored_values_by_code(
    attributes: &[EavAttribute],
    values: &[EavValue],
) -> HashMap<String, Vec<StoredValue>> {
    let codes: HashMap<EavAttributeId, &str> = attributes
        .iter()
        .map(|a| (a.base.id, a.base.code.as_str()))
        .collect();
    let mut result: HashMap<String, Vec<StoredValue>> = HashMap::new();
    for value in values {
        if let Some(code) = codes.get(&value.attribute_id) {
            result
                .entry(code.to_string())
                .or_default()
                .push((value.entity_id.clone(), value.value_text.clone()));
        }
    }
    result
}

// ============================================================================
// Атрибуты
// ============================================================================

async fn ensure_code_unique(code: &str, exclude: Option<EavAttributeId>) -> anyhow::Result<()> {
    if let Some(existing) = attribute_repository::get_by_code(code).await? {
        if Some(existing.base.id) != exclude {
            return Err(DomainError::conflict(format!(
                "Атрибут '{}' уже существует",
                code
            )));
        }
    }
    Ok(())
}

pub async fn create_attribute(dto: EavAttributeDto) -> anyhow::Result<Uuid> {
    let mut aggregate = EavAttribute::from_dto(&dto);
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate.base.code, None).await?;
    aggregate.before_write();
    attribute_repository::insert(&aggregate).await
}

pub async fn update_attribute(dto: EavAttributeDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))?;
    let mut aggregate = attribute_repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Атрибут не найден"))?;

    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate.base.code, Some(aggregate.base.id)).await?;
    aggregate.before_write();
    attribute_repository::update(&aggregate).await
}

pub async fn delete_attribute(id: Uuid) -> anyhow::Result<bool> {
    attribute_repository::soft_delete(id).await
}

pub async fn get_attribute(id: Uuid) -> anyhow::Result<Option<EavAttribute>> {
    attribute_repository::get_by_id(id).await
}

pub async fn list_attributes() -> anyhow::Result<Vec<EavAttribute>> {
    attribute_repository::list_all().await
}

// ============================================================================
// Значения
// ============================================================================

/// Установить значение атрибута сущности
///
/// Атрибут создается при первом использовании с типом по JSON-значению.
pub async fn set_value(
    entity_type: &str,
    entity_id: &str,
    code: &str,
    value: &Value,
) -> anyhow::Result<EavValue> {
    let code = code.trim();
    let attribute = match attribute_repository::get_by_code(code).await? {
        Some(attribute) => attribute,
        None => {
            let mut attribute =
                EavAttribute::new_for_insert(code.to_string(), detect_value_type(value));
            attribute.validate().map_err(DomainError::validation)?;
            attribute.before_write();
            attribute_repository::insert(&attribute).await?;
            tracing::info!(
                "a004: создан атрибут '{}' ({})",
                code,
                attribute.value_type.as_str()
            );
            attribute
        }
    };

    if !attribute.applies_to(entity_type) {
        return Err(DomainError::validation(format!(
            "Атрибут '{}' не применим к типу сущности '{}'",
            code, entity_type
        )));
    }

    let value_text = encode_value(&attribute, value).map_err(DomainError::validation)?;
    let mut record =
        EavValue::new_for_insert(attribute.base.id, entity_type, entity_id, value_text);
    record.before_write();
    value_repository::upsert(&record).await
}

/// Типизированное значение или `default`, если значения нет
pub async fn get_value(
    entity_type: &str,
    entity_id: &str,
    code: &str,
    default: Option<Value>,
) -> anyhow::Result<Option<Value>> {
    let Some(attribute) = attribute_repository::get_by_code(code).await? else {
        return Ok(default);
    };
    let stored = value_repository::find(attribute.base.id, entity_type, entity_id).await?;
    Ok(value_or_default(&attribute, stored.as_ref(), default))
}

pub async fn delete_value(entity_type: &str, entity_id: &str, code: &str) -> anyhow::Result<bool> {
    let Some(attribute) = attribute_repository::get_by_code(code).await? else {
        return Ok(false);
    };
    value_repository::delete(attribute.base.id, entity_type, entity_id).await
}

/// Все EAV-данные сущности
pub async fn eav_data(entity_type: &str, entity_id: &str) -> anyhow::Result<EavEntityData> {
    let attributes = attribute_repository::list_all().await?;
    let values = value_repository::list_for_entity(entity_type, entity_id).await?;
    Ok(EavEntityData {
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
        values: typed_values(&attributes, &values),
        missing_required: missing_required_in(&attributes, &values, entity_type),
    })
}

/// Установить несколько значений и вернуть итоговые данные сущности
pub async fn set_values(
    entity_type: &str,
    entity_id: &str,
    requests: &[SetEavValueRequest],
) -> anyhow::Result<EavEntityData> {
    for request in requests {
        set_value(entity_type, entity_id, &request.attribute, &request.value).await?;
    }
    eav_data(entity_type, entity_id).await
}

pub async fn missing_required(entity_type: &str, entity_id: &str) -> anyhow::Result<Vec<String>> {
    let attributes = attribute_repository::list_all().await?;
    let values = value_repository::list_for_entity(entity_type, entity_id).await?;
    Ok(missing_required_in(&attributes, &values, entity_type))
}

/// Значение атрибута серии с учетом наследования
pub async fn resolve_for_series(
    series_id: ProductSeriesId,
    code: &str,
) -> anyhow::Result<Option<Value>> {
    let Some(attribute) = attribute_repository::get_by_code(code).await? else {
        return Ok(None);
    };
    let chain = a003_product_series::service::lookup_chain(series_id).await?;
    let values = value_repository::list_for_entity_type(SERIES_ENTITY_TYPE).await?;
    Ok(resolve_in_chain(&attribute, &chain, &values))
}

/// Идентификаторы сущностей, удовлетворяющих всем фильтрам
pub async fn filter_entities(
    entity_type: &str,
    filters: &[EavFilter],
) -> anyhow::Result<Vec<String>> {
    let attributes = attribute_repository::list_all().await?;
    let values = value_repository::list_for_entity_type(entity_type).await?;
    let candidates: BTreeSet<String> = values.iter().map(|v| v.entity_id.clone()).collect();
    let by_code = stored_values_by_code(&attributes, &values);
    Ok(filter::apply_filters(candidates, filters, &by_code))
}

/// Поиск сущностей по тексту в любом значении
pub async fn search_text(entity_type: &str, text: &str) -> anyhow::Result<Vec<String>> {
    let values: Vec<StoredValue> = value_repository::list_for_entity_type(entity_type)
        .await?
        .into_iter()
        .map(|v| (v.entity_id, v.value_text))
        .collect();
    Ok(filter::search_text(&values, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_eav::EavValueType;
    use serde_json::json;

    fn attribute(code: &str, value_type: EavValueType) -> EavAttribute {
        EavAttribute::new_for_insert(code.into(), value_type)
    }

    fn value(attribute: &EavAttribute, entity_id: &str, text: &str) -> EavValue {
        EavValue::new_for_insert(attribute.base.id, SERIES_ENTITY_TYPE, entity_id, text.into())
    }

    #[test]
    fn test_typed_values_by_code() {
        let weight = attribute("weight", EavValueType::Float);
        let sealed = attribute("sealed", EavValueType::Boolean);
        let values = vec![value(&weight, "s1", "12.5"), value(&sealed, "s1", "yes")];

        let typed = typed_values(&[weight, sealed], &values);
        assert_eq!(typed.get("weight"), Some(&json!(12.5)));
        assert_eq!(typed.get("sealed"), Some(&json!(true)));
    }

    #[test]
    fn test_cleared_value_reads_as_absent() {
        let mut weight = attribute("weight", EavValueType::Integer);
        weight.is_required = true;
        let sealed = attribute("sealed", EavValueType::Boolean);
        let cleared = encode_value(&weight, &Value::Null).unwrap();
        let values = vec![value(&weight, "s1", &cleared), value(&sealed, "s1", "")];

        let attributes = [weight.clone(), sealed];
        assert!(typed_values(&attributes, &values).is_empty());
        assert_eq!(
            missing_required_in(&attributes, &values, SERIES_ENTITY_TYPE),
            vec!["weight".to_string()]
        );

        assert_eq!(
            value_or_default(&weight, Some(&values[0]), Some(json!(7))),
            Some(json!(7))
        );
        assert_eq!(value_or_default(&weight, Some(&values[0]), None), None);
        let filled = value(&weight, "s1", "12");
        assert_eq!(
            value_or_default(&weight, Some(&filled), Some(json!(7))),
            Some(json!(12))
        );
    }

    #[test]
    fn test_missing_required_respects_scope() {
        let mut weight = attribute("weight", EavValueType::Float);
        weight.is_required = true;
        let mut torque = attribute("torque", EavValueType::Integer);
        torque.is_required = true;
        torque.is_global = false;
        torque.entity_type = Some("dimension_table".into());
        let mut color = attribute("color", EavValueType::String);
        color.is_required = true;

        let values = vec![value(&color, "s1", "red"), value(&weight, "s1", "  ")];
        let missing = missing_required_in(&[weight, torque, color], &values, SERIES_ENTITY_TYPE);
        assert_eq!(missing, vec!["weight".to_string()]);
    }

    #[test]
    fn test_resolve_in_chain_prefers_nearest_series() {
        let parent = ProductSeriesId::new_v4();
        let child = ProductSeriesId::new_v4();
        let mut material = attribute("material", EavValueType::String);
        material.default_value = Some("Сталь".into());

        let values = vec![value(&material, &parent.as_string(), "Чугун")];
        assert_eq!(
            resolve_in_chain(&material, &[child, parent], &values),
            Some(json!("Чугун"))
        );

        let values = vec![
            value(&material, &parent.as_string(), "Чугун"),
            value(&material, &child.as_string(), "Латунь"),
        ];
        assert_eq!(
            resolve_in_chain(&material, &[child, parent], &values),
            Some(json!("Латунь"))
        );

        assert_eq!(
            resolve_in_chain(&material, &[child, parent], &[]),
            Some(json!("Сталь"))
        );
        material.default_value = None;
        assert_eq!(resolve_in_chain(&material, &[child], &[]), None);
    }

    #[test]
    fn test_stored_values_grouped_by_code() {
        let weight = attribute("weight", EavValueType::Float);
        let values = vec![value(&weight, "s1", "1"), value(&weight, "s2", "2")];
        let grouped = stored_values_by_code(&[weight], &values);
        assert_eq!(grouped["weight"].len(), 2);
    }
}
