use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(EavAttributeId);

// ============================================================================
// Value type
// ============================================================================

/// Тип значения EAV-атрибута
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EavValueType {
    String,
    Integer,
    Float,
    Boolean,
    Json,
    Choice,
    MultiChoice,
}

impl EavValueType {
    pub const VALUES: [&'static str; 7] = [
        "string",
        "integer",
        "float",
        "boolean",
        "json",
        "choice",
        "multi_choice",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EavValueType::String => "string",
            EavValueType::Integer => "integer",
            EavValueType::Float => "float",
            EavValueType::Boolean => "boolean",
            EavValueType::Json => "json",
            EavValueType::Choice => "choice",
            EavValueType::MultiChoice => "multi_choice",
        }
    }

    pub fn has_choices(&self) -> bool {
        matches!(self, EavValueType::Choice | EavValueType::MultiChoice)
    }
}

impl FromStr for EavValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "string" => Ok(EavValueType::String),
            "integer" => Ok(EavValueType::Integer),
            "float" => Ok(EavValueType::Float),
            "boolean" => Ok(EavValueType::Boolean),
            "json" => Ok(EavValueType::Json),
            "choice" => Ok(EavValueType::Choice),
            "multi_choice" => Ok(EavValueType::MultiChoice),
            other => Err(format!("Неизвестный тип значения: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Атрибут EAV
///
/// `base.code` - уникальное имя атрибута, по которому задаются значения.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EavAttribute {
    #[serde(flatten)]
    pub base: BaseAggregate<EavAttributeId>,

    pub value_type: EavValueType,

    /// Варианты выбора, по одному на строку
    #[serde(default)]
    pub choices: String,

    #[serde(default)]
    pub default_value: Option<String>,

    #[serde(default)]
    pub is_required: bool,

    /// Доступен для всех типов сущностей
    #[serde(default = "default_true")]
    pub is_global: bool,

    /// Тип сущности для неглобальных атрибутов (например, "product_series")
    #[serde(default)]
    pub entity_type: Option<String>,
}

fn default_true() -> bool {
    true
}

impl EavAttribute {
    pub fn new_for_insert(code: String, value_type: EavValueType) -> Self {
        Self {
            base: BaseAggregate::new(EavAttributeId::new_v4(), code, String::new()),
            value_type,
            choices: String::new(),
            default_value: None,
            is_required: false,
            is_global: true,
            entity_type: None,
        }
    }

    pub fn from_dto(dto: &EavAttributeDto) -> Self {
        let mut attribute = Self::new_for_insert(dto.code.clone(), dto.value_type);
        attribute.update(dto);
        attribute
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &EavAttributeDto) {
        self.base.code = dto.code.trim().to_string();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.value_type = dto.value_type;
        self.choices = dto.choices.clone().unwrap_or_default();
        self.default_value = dto.default_value.clone();
        self.is_required = dto.is_required.unwrap_or(false);
        self.is_global = dto.is_global.unwrap_or(true);
        self.entity_type = dto
            .entity_type
            .as_ref()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    /// Варианты выбора (для choice / multi_choice)
    pub fn choices_list(&self) -> Vec<String> {
        if !self.value_type.has_choices() {
            return Vec::new();
        }
        self.choices
            .lines()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Атрибут применим к данному типу сущности
    pub fn applies_to(&self, entity_type: &str) -> bool {
        self.is_global || self.entity_type.as_deref() == Some(entity_type)
    }

    pub fn validate(&self) -> Result<(), String> {
        for field in FIELDS.iter() {
            if field.name == "code" {
                field.validation.validate_string(&self.base.code, field.ui.label)?;
            }
        }
        if self.base.code.contains(char::is_whitespace) {
            return Err("Код атрибута не должен содержать пробелов".into());
        }
        if self.value_type.has_choices() && self.choices_list().is_empty() {
            return Err("Для атрибута с выбором из списка необходимо указать варианты".into());
        }
        if !self.is_global && self.entity_type.is_none() {
            return Err("Для неглобального атрибута необходимо указать тип сущности".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for EavAttribute {
    type Id = EavAttributeId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "eav_attribute"
    }

    fn element_name() -> &'static str {
        "Атрибут EAV"
    }

    fn list_name() -> &'static str {
        "Атрибуты EAV"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Название атрибута")
        .required()
        .max_length(100)
        .from_base(),
    FieldMetadata::new("valueType", "EavValueType", "Тип значения")
        .required()
        .enumeration(&EavValueType::VALUES),
    FieldMetadata::new("choices", "String", "Варианты выбора")
        .hint("Разделите варианты переносом строки")
        .hidden_in_list(),
    FieldMetadata::new("defaultValue", "Option<String>", "Значение по умолчанию"),
    FieldMetadata::new("isRequired", "bool", "Обязательный").required(),
    FieldMetadata::new("isGlobal", "bool", "Глобальный атрибут")
        .required()
        .hint("Доступен для всех сущностей"),
    FieldMetadata::new("entityType", "Option<String>", "Тип сущности").max_length(100),
];

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EavAttributeDto {
    pub id: Option<String>,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub comment: Option<String>,
    pub value_type: EavValueType,
    pub choices: Option<String>,
    pub default_value: Option<String>,
    pub is_required: Option<bool>,
    pub is_global: Option<bool>,
    pub entity_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_attribute(choices: &str) -> EavAttribute {
        let mut attribute = EavAttribute::new_for_insert("color".into(), EavValueType::Choice);
        attribute.choices = choices.into();
        attribute
    }

    #[test]
    fn test_choices_list_skips_blank_lines() {
        let attribute = choice_attribute("red\n\n  green \r\nblue\n");
        assert_eq!(attribute.choices_list(), vec!["red", "green", "blue"]);
    }

    #[test]
    fn test_choices_ignored_for_plain_types() {
        let mut attribute = choice_attribute("a\nb");
        attribute.value_type = EavValueType::String;
        assert!(attribute.choices_list().is_empty());
    }

    #[test]
    fn test_validate_scope_and_choices() {
        assert!(choice_attribute("").validate().is_err());
        assert!(choice_attribute("a").validate().is_ok());

        let mut scoped = EavAttribute::new_for_insert("weight".into(), EavValueType::Float);
        scoped.is_global = false;
        assert!(scoped.validate().is_err());
        scoped.entity_type = Some("product_series".into());
        assert!(scoped.validate().is_ok());
        assert!(scoped.applies_to("product_series"));
        assert!(!scoped.applies_to("dimension_table"));
    }
}
