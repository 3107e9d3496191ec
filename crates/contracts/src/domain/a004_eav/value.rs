use super::attribute::EavAttributeId;
use crate::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

crate::uuid_aggregate_id!(EavValueId);

/// Значение EAV-атрибута конкретной сущности
///
/// Хранится строкой; типизация выполняется по типу атрибута при чтении.
/// Уникально по (attribute_id, entity_type, entity_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EavValue {
    pub id: EavValueId,
    pub attribute_id: EavAttributeId,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default)]
    pub value_text: String,
    #[serde(default)]
    pub display_order: i32,
    pub metadata: EntityMetadata,
}

impl EavValue {
    pub fn new_for_insert(
        attribute_id: EavAttributeId,
        entity_type: &str,
        entity_id: &str,
        value_text: String,
    ) -> Self {
        Self {
            id: EavValueId::new_v4(),
            attribute_id,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            value_text,
            display_order: 0,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

/// Запрос на установку значения атрибута
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEavValueRequest {
    /// Код атрибута; атрибут создается при первом использовании
    pub attribute: String,
    pub value: Value,
}

/// Операция фильтрации по EAV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EavFilterOperation {
    Exact,
    Icontains,
    Gt,
    Lt,
}

/// Условие фильтра: `attribute__operation=value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EavFilter {
    pub attribute: String,
    pub operation: EavFilterOperation,
    pub value: String,
}

impl EavFilter {
    /// Разбор ключа вида `weight__gt`; без суффикса операция `exact`
    pub fn parse(key: &str, value: &str) -> Result<Self, String> {
        let (attribute, operation) = match key.split_once("__") {
            Some((attribute, op)) => {
                let operation = match op {
                    "exact" => EavFilterOperation::Exact,
                    "icontains" => EavFilterOperation::Icontains,
                    "gt" => EavFilterOperation::Gt,
                    "lt" => EavFilterOperation::Lt,
                    other => return Err(format!("Неизвестная операция фильтра: {}", other)),
                };
                (attribute, operation)
            }
            None => (key, EavFilterOperation::Exact),
        };
        if attribute.trim().is_empty() {
            return Err("Не указан атрибут фильтра".into());
        }
        Ok(Self {
            attribute: attribute.to_string(),
            operation,
            value: value.to_string(),
        })
    }
}

/// Поиск сущностей по тексту значений
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EavSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Значение по умолчанию для запроса одного атрибута
///
/// Строка разбирается как JSON, иначе используется как есть.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EavValueQuery {
    pub default: Option<String>,
}

impl EavValueQuery {
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|raw| {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        })
    }
}

/// EAV-данные сущности: код атрибута -> типизированное значение
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EavEntityData {
    pub entity_type: String,
    pub entity_id: String,
    pub values: BTreeMap<String, Value>,
    pub missing_required: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_key_parsing() {
        let filter = EavFilter::parse("weight__gt", "10").unwrap();
        assert_eq!(filter.attribute, "weight");
        assert_eq!(filter.operation, EavFilterOperation::Gt);

        let filter = EavFilter::parse("color", "red").unwrap();
        assert_eq!(filter.operation, EavFilterOperation::Exact);

        assert!(EavFilter::parse("color__regex", "r.*").is_err());
        assert!(EavFilter::parse("__gt", "1").is_err());
    }

    #[test]
    fn test_value_query_default() {
        let query = EavValueQuery { default: Some("10".into()) };
        assert_eq!(query.default_value(), Some(Value::from(10)));
        let query = EavValueQuery { default: Some("red".into()) };
        assert_eq!(query.default_value(), Some(Value::from("red")));
        assert_eq!(EavValueQuery::default().default_value(), None);
    }
}
