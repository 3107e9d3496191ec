//! Core metadata types for aggregates
//!
//! All types use 'static lifetimes for zero-cost compile-time constants.

use super::field_type::{FieldSource, FieldType};
use super::validation::ValidationRules;

// ============================================================================
// Field-level metadata
// ============================================================================

/// Metadata for a single field
/// Copy trait enabled for efficient passing by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMetadata {
    /// Имя поля в JSON (как его видит фронтенд)
    pub name: &'static str,
    pub rust_type: &'static str,
    pub field_type: FieldType,
    pub source: FieldSource,
    pub ui: FieldUiMetadata,
    pub validation: ValidationRules,
    pub ref_aggregate: Option<&'static str>,
    pub enum_values: Option<&'static [&'static str]>,
}

impl FieldMetadata {
    /// Примитивное поле, специфичное для агрегата
    pub const fn new(name: &'static str, rust_type: &'static str, label: &'static str) -> Self {
        Self {
            name,
            rust_type,
            field_type: FieldType::Primitive,
            source: FieldSource::Specific,
            ui: FieldUiMetadata {
                label,
                hint: None,
                visible_in_list: true,
                visible_in_form: true,
            },
            validation: ValidationRules::none(),
            ref_aggregate: None,
            enum_values: None,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            validation: ValidationRules {
                required: true,
                ..self.validation
            },
            ..self
        }
    }

    pub const fn max_length(self, max: usize) -> Self {
        Self {
            validation: ValidationRules {
                max_length: Some(max),
                ..self.validation
            },
            ..self
        }
    }

    /// Нижняя граница числового поля
    pub const fn min(self, min: f64) -> Self {
        Self {
            validation: ValidationRules {
                min: Some(min),
                ..self.validation
            },
            ..self
        }
    }

    pub const fn hint(self, hint: &'static str) -> Self {
        Self {
            ui: FieldUiMetadata {
                hint: Some(hint),
                ..self.ui
            },
            ..self
        }
    }

    pub const fn hidden_in_list(self) -> Self {
        Self {
            ui: FieldUiMetadata {
                visible_in_list: false,
                ..self.ui
            },
            ..self
        }
    }

    /// Поле-перечисление с фиксированным набором значений
    pub const fn enumeration(self, values: &'static [&'static str]) -> Self {
        Self {
            field_type: FieldType::Enum,
            enum_values: Some(values),
            ..self
        }
    }

    /// Ссылка на другой агрегат (по индексу, например "a003")
    pub const fn reference(self, aggregate: &'static str) -> Self {
        Self {
            field_type: FieldType::AggregateRef,
            ref_aggregate: Some(aggregate),
            ..self
        }
    }

    pub const fn table(self) -> Self {
        Self {
            field_type: FieldType::NestedTable,
            ..self
        }
    }

    pub const fn json(self) -> Self {
        Self {
            field_type: FieldType::Json,
            ..self
        }
    }

    pub const fn from_base(self) -> Self {
        Self {
            source: FieldSource::Base,
            ..self
        }
    }

    pub const fn from_metadata(self) -> Self {
        Self {
            source: FieldSource::Metadata,
            ..self
        }
    }

    /// Check if field is optional
    pub fn is_optional(&self) -> bool {
        !self.validation.required
    }

    /// Get referenced aggregate index (for AggregateRef)
    pub fn referenced_aggregate(&self) -> Option<&'static str> {
        self.ref_aggregate
    }
}

/// UI metadata for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUiMetadata {
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub visible_in_list: bool,
    pub visible_in_form: bool,
}

/// Default values for FieldUiMetadata
impl Default for FieldUiMetadata {
    fn default() -> Self {
        Self {
            label: "",
            hint: None,
            visible_in_list: true,
            visible_in_form: true,
        }
    }
}

/// Поля BaseAggregate, одинаковые для всех агрегатов (serde flatten)
pub const BASE_FIELDS: [FieldMetadata; 5] = [
    FieldMetadata::new("id", "Uuid", "ID").required().from_base(),
    FieldMetadata::new("code", "String", "Код").required().from_base(),
    FieldMetadata::new("description", "String", "Наименование").required().from_base(),
    FieldMetadata::new("comment", "Option<String>", "Комментарий").from_base().hidden_in_list(),
    FieldMetadata::new("metadata", "EntityMetadata", "Метаданные").required().from_base(),
];

/// Поля EntityMetadata
pub const ENTITY_METADATA_FIELDS: [FieldMetadata; 4] = [
    FieldMetadata::new("createdAt", "DateTime<Utc>", "Создано").required().from_metadata(),
    FieldMetadata::new("updatedAt", "DateTime<Utc>", "Обновлено").required().from_metadata(),
    FieldMetadata::new("isDeleted", "bool", "Удалено").required().from_metadata(),
    FieldMetadata::new("version", "i32", "Версия").required().from_metadata(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        const FIELD: FieldMetadata = FieldMetadata::new("kind", "OptionKind", "Вид")
            .required()
            .enumeration(&["ip", "exd"]);
        assert_eq!(FIELD.field_type, FieldType::Enum);
        assert!(!FIELD.is_optional());
        assert_eq!(FIELD.enum_values.unwrap().len(), 2);
        assert_eq!(FIELD.source, FieldSource::Specific);
    }
}
