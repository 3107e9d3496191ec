//! Строки таблицы ВГХ: параметры, значения и чертежи

use super::aggregate::DimensionTableId;
use crate::domain::a001_catalog_option::CatalogOptionId;
use crate::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(DimensionParameterId);
crate::uuid_aggregate_id!(DimensionCellId);
crate::uuid_aggregate_id!(TableDrawingId);

/// Параметр таблицы (строка матрицы)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionParameter {
    pub id: DimensionParameterId,
    pub table_id: DimensionTableId,
    pub name: String,
    /// Обозначение на схеме (L, H, D1...)
    #[serde(default)]
    pub legend: String,
    /// Код системного параметра
    #[serde(default)]
    pub parameter_code: Option<String>,
    #[serde(default)]
    pub sorting_order: i32,
    pub metadata: EntityMetadata,
}

impl DimensionParameter {
    pub fn from_dto(table_id: DimensionTableId, dto: &DimensionParameterDto) -> Self {
        Self {
            id: DimensionParameterId::new_v4(),
            table_id,
            name: dto.name.trim().to_string(),
            legend: dto.legend.clone().unwrap_or_default(),
            parameter_code: dto.parameter_code.clone().filter(|c| !c.trim().is_empty()),
            sorting_order: dto.sorting_order.unwrap_or(0),
            metadata: EntityMetadata::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Название параметра не может быть пустым".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionParameterDto {
    pub id: Option<String>,
    pub name: String,
    pub legend: Option<String>,
    pub parameter_code: Option<String>,
    pub sorting_order: Option<i32>,
}

/// Значение параметра для пары DN/PN
///
/// Пара (parameter_id, dn_id, pn_id) уникальна, запись выполняется через upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionCell {
    pub id: DimensionCellId,
    pub parameter_id: DimensionParameterId,
    pub dn_id: CatalogOptionId,
    pub pn_id: CatalogOptionId,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub text_value: Option<String>,
}

impl DimensionCell {
    pub fn from_dto(dto: &DimensionCellDto) -> Self {
        Self {
            id: DimensionCellId::new_v4(),
            parameter_id: dto.parameter_id,
            dn_id: dto.dn_id,
            pn_id: dto.pn_id,
            value: dto.value,
            text_value: dto.text_value.clone().filter(|t| !t.trim().is_empty()),
        }
    }

    /// Числовое значение, если задано, иначе текстовое
    pub fn display_value(&self) -> serde_json::Value {
        match (self.value, &self.text_value) {
            (Some(value), _) => serde_json::Value::from(value),
            (None, Some(text)) => serde_json::Value::String(text.clone()),
            (None, None) => serde_json::Value::Null,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.value.is_none() && self.text_value.is_none() {
            return Err("Необходимо указать числовое или текстовое значение".into());
        }
        if matches!(self.value, Some(v) if !v.is_finite()) {
            return Err("Недопустимое числовое значение".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionCellDto {
    pub parameter_id: DimensionParameterId,
    pub dn_id: CatalogOptionId,
    pub pn_id: CatalogOptionId,
    pub value: Option<f64>,
    pub text_value: Option<String>,
}

/// Чертеж таблицы с допустимыми DN
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDrawing {
    pub id: TableDrawingId,
    pub table_id: DimensionTableId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    /// Коды DN, для которых подходит чертеж
    #[serde(default)]
    pub allowed_dn: Vec<String>,
    pub metadata: EntityMetadata,
}

impl TableDrawing {
    pub fn from_dto(table_id: DimensionTableId, dto: &TableDrawingDto) -> Self {
        Self {
            id: TableDrawingId::new_v4(),
            table_id,
            title: dto.title.trim().to_string(),
            description: dto.description.clone().unwrap_or_default(),
            media_url: dto.media_url.clone(),
            display_order: dto.display_order.unwrap_or(0),
            allowed_dn: dto
                .allowed_dn
                .iter()
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
            metadata: EntityMetadata::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Название чертежа не может быть пустым".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDrawingDto {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub allowed_dn: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_prefers_number() {
        let dto = DimensionCellDto {
            parameter_id: DimensionParameterId::new_v4(),
            dn_id: CatalogOptionId::new_v4(),
            pn_id: CatalogOptionId::new_v4(),
            value: Some(120.5),
            text_value: Some("по запросу".into()),
        };
        assert_eq!(DimensionCell::from_dto(&dto).display_value(), serde_json::json!(120.5));

        let text_only = DimensionCellDto { value: None, ..dto };
        assert_eq!(
            DimensionCell::from_dto(&text_only).display_value(),
            serde_json::json!("по запросу")
        );
    }

    #[test]
    fn test_empty_cell_is_invalid() {
        let dto = DimensionCellDto {
            parameter_id: DimensionParameterId::new_v4(),
            dn_id: CatalogOptionId::new_v4(),
            pn_id: CatalogOptionId::new_v4(),
            value: None,
            text_value: Some("  ".into()),
        };
        assert!(DimensionCell::from_dto(&dto).validate().is_err());
    }
}
