use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(DimensionTableId);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Таблица ВГХ (весогабаритные характеристики)
///
/// К таблице привязаны параметры, значения по осям DN/PN и чертежи.
/// `base.code` - код шаблона (уникальный), `base.description` - описание.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionTable {
    #[serde(flatten)]
    pub base: BaseAggregate<DimensionTableId>,

    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub valve_variety: Option<String>,
}

impl DimensionTable {
    pub fn new_for_insert(code: String, name: String) -> Self {
        Self {
            base: BaseAggregate::new(DimensionTableId::new_v4(), code, String::new()),
            name,
            brand: None,
            valve_variety: None,
        }
    }

    pub fn from_dto(dto: &DimensionTableDto) -> Self {
        let mut table = Self::new_for_insert(dto.code.clone(), dto.name.clone());
        table.update(dto);
        table
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &DimensionTableDto) {
        self.base.code = dto.code.trim().to_string();
        self.base.description = dto.description.clone().unwrap_or_default();
        self.base.comment = dto.comment.clone();
        self.name = dto.name.trim().to_string();
        self.brand = dto.brand.clone();
        self.valve_variety = dto.valve_variety.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        for field in FIELDS.iter() {
            match field.name {
                "code" => field.validation.validate_string(&self.base.code, field.ui.label)?,
                "name" => field.validation.validate_string(&self.name, field.ui.label)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Копия шапки таблицы; имя и код по умолчанию "<name> (Копия)" / "<code>_copy"
    pub fn duplicate(&self, new_name: Option<&str>, new_code: Option<&str>) -> Self {
        let name = new_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} (Копия)", self.name));
        let code = new_code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_copy", self.base.code));

        let mut copy = Self::new_for_insert(code, name);
        copy.base.description = self.base.description.clone();
        copy.brand = self.brand.clone();
        copy.valve_variety = self.valve_variety.clone();
        copy
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for DimensionTable {
    type Id = DimensionTableId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "dimension_table"
    }

    fn element_name() -> &'static str {
        "Таблица ВГХ"
    }

    fn list_name() -> &'static str {
        "Таблицы ВГХ"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Код шаблона")
        .required()
        .max_length(50)
        .from_base(),
    FieldMetadata::new("name", "String", "Название таблицы")
        .required()
        .max_length(100),
    FieldMetadata::new("description", "String", "Описание")
        .from_base()
        .hidden_in_list(),
    FieldMetadata::new("brand", "Option<String>", "Бренд").max_length(100),
    FieldMetadata::new("valveVariety", "Option<String>", "Тип арматуры").max_length(100),
];

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionTableDto {
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub brand: Option<String>,
    pub valve_variety: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_defaults() {
        let mut table = DimensionTable::new_for_insert("VGH-01".into(), "Затворы DN50-300".into());
        table.brand = Some("Tecofi".into());

        let copy = table.duplicate(None, Some("  "));
        assert_eq!(copy.name, "Затворы DN50-300 (Копия)");
        assert_eq!(copy.base.code, "VGH-01_copy");
        assert_eq!(copy.brand.as_deref(), Some("Tecofi"));
        assert_ne!(copy.base.id, table.base.id);

        let named = table.duplicate(Some("Новая"), Some("VGH-02"));
        assert_eq!(named.name, "Новая");
        assert_eq!(named.base.code, "VGH-02");
    }
}
