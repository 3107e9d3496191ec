use crate::domain::a005_dimension_table::DimensionTableId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(ProductSeriesId);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Серия (модельный ряд) арматуры
///
/// `base.code` - код серии, `base.description` - наименование.
/// Незаполненные поля наследуются от `original_series_id` по цепочке.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeries {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductSeriesId>,

    /// Родительская серия в цепочке наследования
    #[serde(default)]
    pub original_series_id: Option<ProductSeriesId>,

    #[serde(default)]
    pub producer: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub valve_variety: Option<String>,
    #[serde(default)]
    pub body_material: Option<String>,
    #[serde(default)]
    pub sealing_class: Option<String>,
    #[serde(default)]
    pub features_text: Option<String>,
    #[serde(default)]
    pub application_text: Option<String>,
    #[serde(default)]
    pub work_temp_min: Option<i32>,
    #[serde(default)]
    pub work_temp_max: Option<i32>,
    #[serde(default)]
    pub port_qty: Option<i32>,
    #[serde(default)]
    pub dimension_table_id: Option<DimensionTableId>,
}

impl ProductSeries {
    pub fn new_for_insert(code: String, name: String) -> Self {
        Self {
            base: BaseAggregate::new(ProductSeriesId::new_v4(), code, name),
            original_series_id: None,
            producer: None,
            brand: None,
            valve_variety: None,
            body_material: None,
            sealing_class: None,
            features_text: None,
            application_text: None,
            work_temp_min: None,
            work_temp_max: None,
            port_qty: None,
            dimension_table_id: None,
        }
    }

    pub fn from_dto(dto: &ProductSeriesDto) -> Self {
        let mut series = Self::new_for_insert(dto.code.clone(), dto.name.clone());
        series.update(dto);
        series
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn name(&self) -> &str {
        &self.base.description
    }

    pub fn update(&mut self, dto: &ProductSeriesDto) {
        self.base.code = dto.code.trim().to_string();
        self.base.description = dto.name.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.original_series_id = dto.original_series_id;
        self.producer = dto.producer.clone();
        self.brand = dto.brand.clone();
        self.valve_variety = dto.valve_variety.clone();
        self.body_material = dto.body_material.clone();
        self.sealing_class = dto.sealing_class.clone();
        self.features_text = dto.features_text.clone();
        self.application_text = dto.application_text.clone();
        self.work_temp_min = dto.work_temp_min;
        self.work_temp_max = dto.work_temp_max;
        self.port_qty = dto.port_qty;
        self.dimension_table_id = dto.dimension_table_id;
    }

    /// Проверки одной записи; циклы в цепочке проверяет сервис
    pub fn validate(&self) -> Result<(), String> {
        if self.base.code.trim().is_empty() && self.original_series_id.is_none() {
            return Err("Код серии не может быть пустым".into());
        }
        // Пустые значения допустимы: они могут наследоваться от базовой серии
        for field in FIELDS.iter().filter(|f| f.validation.max_length.is_some()) {
            let value = match field.name {
                "code" => Some(self.base.code.as_str()),
                "description" => Some(self.base.description.as_str()),
                "producer" => self.producer.as_deref(),
                "brand" => self.brand.as_deref(),
                "valveVariety" => self.valve_variety.as_deref(),
                "bodyMaterial" => self.body_material.as_deref(),
                "sealingClass" => self.sealing_class.as_deref(),
                _ => None,
            };
            if let (Some(value), Some(max)) = (value, field.validation.max_length) {
                if value.chars().count() > max {
                    return Err(format!(
                        "{} не должен превышать {} символов",
                        field.ui.label, max
                    ));
                }
            }
        }
        if self.original_series_id == Some(self.base.id) {
            return Err("Серия не может наследоваться сама от себя".into());
        }
        if let (Some(min), Some(max)) = (self.work_temp_min, self.work_temp_max) {
            if min >= max {
                return Err("Максимальная температура должна быть больше минимальной".into());
            }
        }
        if matches!(self.port_qty, Some(qty) if qty <= 0) {
            return Err("Количество портов должно быть положительным".into());
        }
        Ok(())
    }

    /// Собственное значение поля; пустые строки считаются отсутствующими
    pub fn own_value(&self, field: SeriesField) -> Option<Value> {
        fn text(value: &str) -> Option<Value> {
            if value.trim().is_empty() {
                None
            } else {
                Some(Value::String(value.to_string()))
            }
        }
        fn opt_text(value: &Option<String>) -> Option<Value> {
            value.as_deref().and_then(text)
        }

        match field {
            SeriesField::Name => text(&self.base.description),
            SeriesField::Code => text(&self.base.code),
            SeriesField::Producer => opt_text(&self.producer),
            SeriesField::Brand => opt_text(&self.brand),
            SeriesField::ValveVariety => opt_text(&self.valve_variety),
            SeriesField::BodyMaterial => opt_text(&self.body_material),
            SeriesField::SealingClass => opt_text(&self.sealing_class),
            SeriesField::FeaturesText => opt_text(&self.features_text),
            SeriesField::ApplicationText => opt_text(&self.application_text),
            SeriesField::WorkTempMin => self.work_temp_min.map(Value::from),
            SeriesField::WorkTempMax => self.work_temp_max.map(Value::from),
            SeriesField::PortQty => self.port_qty.map(Value::from),
            SeriesField::DimensionTableId => self
                .dimension_table_id
                .map(|id| Value::String(id.as_string())),
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for ProductSeries {
    type Id = ProductSeriesId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "product_series"
    }

    fn element_name() -> &'static str {
        "Серия"
    }

    fn list_name() -> &'static str {
        "Серии"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Код серии")
        .required()
        .max_length(50)
        .from_base(),
    FieldMetadata::new("description", "String", "Наименование")
        .required()
        .max_length(200)
        .from_base(),
    FieldMetadata::new("originalSeriesId", "Option<ProductSeriesId>", "Базовая серия")
        .reference("a003")
        .hint("Незаполненные поля наследуются от базовой серии"),
    FieldMetadata::new("producer", "Option<String>", "Производитель").max_length(100),
    FieldMetadata::new("brand", "Option<String>", "Бренд").max_length(100),
    FieldMetadata::new("valveVariety", "Option<String>", "Тип арматуры").max_length(100),
    FieldMetadata::new("bodyMaterial", "Option<String>", "Материал корпуса")
        .max_length(100)
        .hidden_in_list(),
    FieldMetadata::new("sealingClass", "Option<String>", "Класс герметичности")
        .max_length(50)
        .hidden_in_list(),
    FieldMetadata::new("featuresText", "Option<String>", "Особенности").hidden_in_list(),
    FieldMetadata::new("applicationText", "Option<String>", "Применение").hidden_in_list(),
    FieldMetadata::new("workTempMin", "Option<i32>", "Т мин, °С"),
    FieldMetadata::new("workTempMax", "Option<i32>", "Т макс, °С"),
    FieldMetadata::new("portQty", "Option<i32>", "Количество портов").hidden_in_list(),
    FieldMetadata::new("dimensionTableId", "Option<DimensionTableId>", "Таблица ВГХ")
        .reference("a005")
        .hidden_in_list(),
];

// ============================================================================
// Inheritable fields
// ============================================================================

/// Поля серии, участвующие в наследовании
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesField {
    Name,
    Code,
    Producer,
    Brand,
    ValveVariety,
    BodyMaterial,
    SealingClass,
    FeaturesText,
    ApplicationText,
    WorkTempMin,
    WorkTempMax,
    PortQty,
    DimensionTableId,
}

impl SeriesField {
    pub const ALL: [SeriesField; 13] = [
        SeriesField::Name,
        SeriesField::Code,
        SeriesField::Producer,
        SeriesField::Brand,
        SeriesField::ValveVariety,
        SeriesField::BodyMaterial,
        SeriesField::SealingClass,
        SeriesField::FeaturesText,
        SeriesField::ApplicationText,
        SeriesField::WorkTempMin,
        SeriesField::WorkTempMax,
        SeriesField::PortQty,
        SeriesField::DimensionTableId,
    ];

    /// Обязательные поля серии
    pub const REQUIRED: [SeriesField; 4] = [
        SeriesField::Name,
        SeriesField::Code,
        SeriesField::Brand,
        SeriesField::Producer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesField::Name => "name",
            SeriesField::Code => "code",
            SeriesField::Producer => "producer",
            SeriesField::Brand => "brand",
            SeriesField::ValveVariety => "valve_variety",
            SeriesField::BodyMaterial => "body_material",
            SeriesField::SealingClass => "sealing_class",
            SeriesField::FeaturesText => "features_text",
            SeriesField::ApplicationText => "application_text",
            SeriesField::WorkTempMin => "work_temp_min",
            SeriesField::WorkTempMax => "work_temp_max",
            SeriesField::PortQty => "port_qty",
            SeriesField::DimensionTableId => "dimension_table_id",
        }
    }
}

impl FromStr for SeriesField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| format!("Неизвестное поле серии: {}", s))
    }
}

/// Значение поля с указанием источника
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedValue {
    pub field: SeriesField,
    pub value: Option<Value>,
    /// Серия, из которой взято значение
    pub source_series_id: Option<String>,
    pub comment: String,
}

/// Серия со всеми наследуемыми полями, вычисленными по цепочке
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSeries {
    pub id: String,
    pub inheritance_depth: usize,
    pub fields: Vec<ResolvedValue>,
    pub missing_required_fields: Vec<SeriesField>,
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeriesDto {
    pub id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub comment: Option<String>,
    pub original_series_id: Option<ProductSeriesId>,
    pub producer: Option<String>,
    pub brand: Option<String>,
    pub valve_variety: Option<String>,
    pub body_material: Option<String>,
    pub sealing_class: Option<String>,
    pub features_text: Option<String>,
    pub application_text: Option<String>,
    pub work_temp_min: Option<i32>,
    pub work_temp_max: Option<i32>,
    pub port_qty: Option<i32>,
    pub dimension_table_id: Option<DimensionTableId>,
}

impl ProductSeriesDto {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_strings_are_not_own_values() {
        let mut series = ProductSeries::new_for_insert("VL-100".into(), "  ".into());
        series.brand = Some("   ".into());
        series.port_qty = Some(2);

        assert_eq!(series.own_value(SeriesField::Name), None);
        assert_eq!(series.own_value(SeriesField::Brand), None);
        assert_eq!(series.own_value(SeriesField::Code), Some(Value::from("VL-100")));
        assert_eq!(series.own_value(SeriesField::PortQty), Some(Value::from(2)));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut series = ProductSeries::new_for_insert("VL-100".into(), "Затвор".into());
        series.original_series_id = Some(series.base.id);
        assert!(series.validate().is_err());
    }

    #[test]
    fn test_field_names_parse() {
        for field in SeriesField::ALL {
            assert_eq!(field.as_str().parse::<SeriesField>().unwrap(), field);
        }
        assert!("weight".parse::<SeriesField>().is_err());
    }
}
