use crate::domain::a001_catalog_option::{CatalogOptionId, OptionKind};
use crate::domain::a003_product_series::ProductSeriesId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(SeriesOptionId);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Сквозная опция серии (IP, Exd, покрытие, температура и т.д.)
///
/// `base.code` - кодировка, подставляемая в артикул (может быть пустой),
/// `base.description` - описание опции.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOption {
    #[serde(flatten)]
    pub base: BaseAggregate<SeriesOptionId>,

    pub series_id: ProductSeriesId,
    pub kind: OptionKind,

    /// Ссылка на справочник (отсутствует для чистых температурных диапазонов)
    #[serde(default)]
    pub option_id: Option<CatalogOptionId>,

    #[serde(default)]
    pub sorting_order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_default: bool,

    /// Доплата за опцию
    #[serde(default)]
    pub additional_cost: f64,

    /// Дополнительный срок поставки, дней
    #[serde(default)]
    pub lead_time_days: i32,

    #[serde(default)]
    pub work_temp_min: Option<i32>,

    #[serde(default)]
    pub work_temp_max: Option<i32>,
}

fn default_true() -> bool {
    true
}

impl SeriesOption {
    pub fn new_for_insert(
        series_id: ProductSeriesId,
        kind: OptionKind,
        encoding: String,
        description: String,
    ) -> Self {
        Self {
            base: BaseAggregate::new(SeriesOptionId::new_v4(), encoding, description),
            series_id,
            kind,
            option_id: None,
            sorting_order: 0,
            is_active: true,
            is_default: false,
            additional_cost: 0.0,
            lead_time_days: 0,
            work_temp_min: None,
            work_temp_max: None,
        }
    }

    pub fn from_dto(dto: &SeriesOptionDto) -> Self {
        let mut option = Self::new_for_insert(
            dto.series_id,
            dto.kind,
            dto.encoding.clone(),
            dto.description.clone(),
        );
        option.update(dto);
        option
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn encoding(&self) -> &str {
        &self.base.code
    }

    pub fn has_encoding(&self) -> bool {
        !self.base.code.trim().is_empty()
    }

    pub fn update(&mut self, dto: &SeriesOptionDto) {
        self.base.code = dto.encoding.trim().to_string();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.series_id = dto.series_id;
        self.kind = dto.kind;
        self.option_id = dto.option_id;
        self.sorting_order = dto.sorting_order.unwrap_or(self.sorting_order);
        self.is_active = dto.is_active.unwrap_or(self.is_active);
        self.is_default = dto.is_default.unwrap_or(self.is_default);
        self.additional_cost = dto.additional_cost.unwrap_or(self.additional_cost);
        self.lead_time_days = dto.lead_time_days.unwrap_or(self.lead_time_days);
        self.work_temp_min = dto.work_temp_min;
        self.work_temp_max = dto.work_temp_max;
    }

    /// Проверки, не требующие соседних записей
    ///
    /// Единственность дефолта и кодировки проверяет сервис.
    pub fn validate(&self) -> Result<(), String> {
        for field in FIELDS.iter() {
            match field.name {
                "code" => field.validation.validate_string(&self.base.code, field.ui.label)?,
                "additionalCost" => field
                    .validation
                    .validate_number(self.additional_cost, field.ui.label)?,
                "leadTimeDays" => field
                    .validation
                    .validate_number(f64::from(self.lead_time_days), field.ui.label)?,
                _ => {}
            }
        }

        if self.kind == OptionKind::Temperature {
            let min = self.work_temp_min.unwrap_or(0);
            let max = self.work_temp_max.unwrap_or(0);
            if min != 0 && max != 0 && min >= max {
                return Err("Максимальная температура должна быть больше минимальной".into());
            }
        } else if self.option_id.is_none() {
            return Err(format!(
                "Для опции вида '{}' необходимо выбрать значение справочника",
                self.kind.label()
            ));
        }

        Ok(())
    }

    /// Отображаемое имя опции
    ///
    /// Температура: "T1 (-60...40°C)" или "-20...80°C" без кодировки.
    pub fn display_name(&self) -> String {
        if self.kind == OptionKind::Temperature {
            let range = format!(
                "{}...{}°C",
                self.work_temp_min.unwrap_or(0),
                self.work_temp_max.unwrap_or(0)
            );
            if self.has_encoding() {
                format!("{} ({})", self.base.code.trim(), range)
            } else {
                range
            }
        } else if self.has_encoding() {
            self.base.code.clone()
        } else {
            "Option".to_string()
        }
    }

    pub fn option_info(&self) -> OptionInfo {
        let temperature_range = (self.kind == OptionKind::Temperature).then(|| {
            format!(
                "{}...{}°C",
                self.work_temp_min.unwrap_or(0),
                self.work_temp_max.unwrap_or(0)
            )
        });
        OptionInfo {
            id: self.to_string_id(),
            kind: self.kind,
            encoding: self.base.code.clone(),
            description: self.base.description.clone(),
            display_name: self.display_name(),
            is_default: self.is_default,
            is_active: self.is_active,
            sorting_order: self.sorting_order,
            has_encoding: self.has_encoding(),
            additional_cost: self.additional_cost,
            lead_time_days: self.lead_time_days,
            temperature_range,
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for SeriesOption {
    type Id = SeriesOptionId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "series_option"
    }

    fn element_name() -> &'static str {
        "Опция серии"
    }

    fn list_name() -> &'static str {
        "Опции серии"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Кодировка")
        .max_length(50)
        .hint("Код опции для подстановки в артикул")
        .from_base(),
    FieldMetadata::new("seriesId", "ProductSeriesId", "Серия")
        .required()
        .reference("a003"),
    FieldMetadata::new("kind", "OptionKind", "Вид опции")
        .required()
        .enumeration(&OptionKind::VALUES),
    FieldMetadata::new("optionId", "Option<CatalogOptionId>", "Значение справочника")
        .reference("a001"),
    FieldMetadata::new("sortingOrder", "i32", "Порядок сортировки").required(),
    FieldMetadata::new("isActive", "bool", "Активно").required(),
    FieldMetadata::new("isDefault", "bool", "Стандартная опция")
        .required()
        .hint("Является ли эта опция стандартной для серии"),
    FieldMetadata::new("additionalCost", "f64", "Доплата").required().min(0.0),
    FieldMetadata::new("leadTimeDays", "i32", "Доп. срок, дней").required().min(0.0),
    FieldMetadata::new("workTempMin", "Option<i32>", "Т мин, °С").hidden_in_list(),
    FieldMetadata::new("workTempMax", "Option<i32>", "Т макс, °С").hidden_in_list(),
];

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptionDto {
    pub id: Option<String>,
    pub series_id: ProductSeriesId,
    pub kind: OptionKind,
    pub option_id: Option<CatalogOptionId>,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub description: String,
    pub comment: Option<String>,
    pub sorting_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
    pub additional_cost: Option<f64>,
    pub lead_time_days: Option<i32>,
    pub work_temp_min: Option<i32>,
    pub work_temp_max: Option<i32>,
}

/// Полная информация об опции для конфигуратора
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInfo {
    pub id: String,
    pub kind: OptionKind,
    pub encoding: String,
    pub description: String,
    pub display_name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub sorting_order: i32,
    pub has_encoding: bool,
    pub additional_cost: f64,
    pub lead_time_days: i32,
    pub temperature_range: Option<String>,
}

/// Опции серии с учетом наследования
///
/// `source_series_id` - серия, у которой нашлись опции (сама серия или предок).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveOptions {
    pub series_id: String,
    pub kind: OptionKind,
    pub source_series_id: Option<String>,
    pub options: Vec<OptionInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature(encoding: &str, min: i32, max: i32) -> SeriesOption {
        let mut option = SeriesOption::new_for_insert(
            ProductSeriesId::new_v4(),
            OptionKind::Temperature,
            encoding.to_string(),
            String::new(),
        );
        option.work_temp_min = Some(min);
        option.work_temp_max = Some(max);
        option
    }

    #[test]
    fn test_temperature_display_name() {
        assert_eq!(temperature("", -20, 80).display_name(), "-20...80°C");
        assert_eq!(temperature("T1", -60, 40).display_name(), "T1 (-60...40°C)");
    }

    #[test]
    fn test_plain_display_name_falls_back_to_option() {
        let mut option = SeriesOption::new_for_insert(
            ProductSeriesId::new_v4(),
            OptionKind::Ip,
            String::new(),
            String::new(),
        );
        assert_eq!(option.display_name(), "Option");
        option.base.code = "IP67".into();
        assert_eq!(option.display_name(), "IP67");
    }

    #[test]
    fn test_temperature_range_validation_ignores_zero_bounds() {
        assert!(temperature("", -20, 80).validate().is_ok());
        assert!(temperature("", 80, -20).validate().is_err());
        assert!(temperature("", 0, -20).validate().is_ok());
    }

    #[test]
    fn test_catalog_kind_requires_option_reference() {
        let mut option = SeriesOption::new_for_insert(
            ProductSeriesId::new_v4(),
            OptionKind::Exd,
            "STD".into(),
            String::new(),
        );
        assert!(option.validate().is_err());
        option.option_id = Some(CatalogOptionId::new_v4());
        assert!(option.validate().is_ok());
    }

    #[test]
    fn test_negative_cost_and_lead_time_rejected() {
        let mut option = temperature("", -20, 80);
        option.lead_time_days = -3;
        assert_eq!(option.validate().unwrap_err(), "Доп. срок, дней: значение меньше 0");

        option.lead_time_days = 10;
        option.additional_cost = -0.5;
        assert_eq!(option.validate().unwrap_err(), "Доплата: значение меньше 0");

        option.additional_cost = 1500.0;
        assert!(option.validate().is_ok());
    }
}
