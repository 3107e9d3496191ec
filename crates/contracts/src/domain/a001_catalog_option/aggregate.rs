use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(CatalogOptionId);

// ============================================================================
// Option kind
// ============================================================================

/// Вид справочника опций
///
/// Каждый вид - отдельный плоский справочник (IP, Exd, покрытие и т.д.).
/// DN и PN тоже хранятся как справочники: это оси таблиц ВГХ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Ip,
    Exd,
    BodyCoating,
    Switches,
    Temperature,
    PowerSupply,
    Blinker,
    Dn,
    Pn,
}

impl OptionKind {
    pub const ALL: [OptionKind; 9] = [
        OptionKind::Ip,
        OptionKind::Exd,
        OptionKind::BodyCoating,
        OptionKind::Switches,
        OptionKind::Temperature,
        OptionKind::PowerSupply,
        OptionKind::Blinker,
        OptionKind::Dn,
        OptionKind::Pn,
    ];

    pub const VALUES: [&'static str; 9] = [
        "ip",
        "exd",
        "body_coating",
        "switches",
        "temperature",
        "power_supply",
        "blinker",
        "dn",
        "pn",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Ip => "ip",
            OptionKind::Exd => "exd",
            OptionKind::BodyCoating => "body_coating",
            OptionKind::Switches => "switches",
            OptionKind::Temperature => "temperature",
            OptionKind::PowerSupply => "power_supply",
            OptionKind::Blinker => "blinker",
            OptionKind::Dn => "dn",
            OptionKind::Pn => "pn",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionKind::Ip => "Степень защиты IP",
            OptionKind::Exd => "Взрывозащита",
            OptionKind::BodyCoating => "Покрытие корпуса",
            OptionKind::Switches => "Выключатели",
            OptionKind::Temperature => "Температурное исполнение",
            OptionKind::PowerSupply => "Напряжение питания",
            OptionKind::Blinker => "Блинкер",
            OptionKind::Dn => "Dn",
            OptionKind::Pn => "Pn",
        }
    }
}

impl FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        OptionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Неизвестный вид опции: {}", s))
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Элемент справочника опций
///
/// `base.code` - символьное обозначение (IP54, STD, DN50),
/// `base.description` - текстовое описание.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOption {
    #[serde(flatten)]
    pub base: BaseAggregate<CatalogOptionId>,

    pub kind: OptionKind,

    /// Полная маркировка (для взрывозащиты)
    #[serde(default)]
    pub full_code: Option<String>,

    /// Ранг исполнения IP (выше - лучше)
    #[serde(default)]
    pub rank: Option<i32>,

    #[serde(default)]
    pub temp_min: Option<i32>,

    #[serde(default)]
    pub temp_max: Option<i32>,

    #[serde(default)]
    pub voltage_value: Option<i32>,

    /// AC / DC
    #[serde(default)]
    pub voltage_type: Option<String>,

    #[serde(default)]
    pub sorting_order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CatalogOption {
    pub fn new_for_insert(kind: OptionKind, code: String, description: String) -> Self {
        Self {
            base: BaseAggregate::new(CatalogOptionId::new_v4(), code, description),
            kind,
            full_code: None,
            rank: None,
            temp_min: None,
            temp_max: None,
            voltage_value: None,
            voltage_type: None,
            sorting_order: 0,
            is_active: true,
        }
    }

    pub fn from_dto(dto: &CatalogOptionDto) -> Self {
        let mut option = Self::new_for_insert(dto.kind, dto.code.clone(), dto.description.clone());
        option.update(dto);
        option
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &CatalogOptionDto) {
        self.base.code = dto.code.trim().to_string();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.kind = dto.kind;
        self.full_code = dto.full_code.clone();
        self.rank = dto.rank;
        self.temp_min = dto.temp_min;
        self.temp_max = dto.temp_max;
        self.voltage_value = dto.voltage_value;
        self.voltage_type = dto.voltage_type.clone();
        if let Some(order) = dto.sorting_order {
            self.sorting_order = order;
        }
        if let Some(active) = dto.is_active {
            self.is_active = active;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for field in FIELDS.iter() {
            match field.name {
                "code" => field.validation.validate_string(&self.base.code, field.ui.label)?,
                "fullCode" => field
                    .validation
                    .validate_string(self.full_code.as_deref().unwrap_or(""), field.ui.label)?,
                _ => {}
            }
        }

        if let (Some(min), Some(max)) = (self.temp_min, self.temp_max) {
            if min >= max {
                return Err(
                    "Максимальная температура должна быть больше минимальной".into(),
                );
            }
        }

        if let Some(voltage_type) = &self.voltage_type {
            if !matches!(voltage_type.as_str(), "AC" | "DC") {
                return Err(format!("Недопустимый тип напряжения: {}", voltage_type));
            }
        }

        Ok(())
    }

    /// Отображаемое имя: "IP54 - Пылевлагозащищенное"
    pub fn display_name(&self) -> String {
        if self.base.description.trim().is_empty() {
            self.base.code.clone()
        } else {
            format!("{} - {}", self.base.code, self.base.description)
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for CatalogOption {
    type Id = CatalogOptionId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "catalog_option"
    }

    fn element_name() -> &'static str {
        "Опция справочника"
    }

    fn list_name() -> &'static str {
        "Справочники опций"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Символьное обозначение")
        .required()
        .max_length(50)
        .from_base(),
    FieldMetadata::new("kind", "OptionKind", "Вид справочника")
        .required()
        .enumeration(&OptionKind::VALUES),
    FieldMetadata::new("fullCode", "Option<String>", "Полный код").max_length(200),
    FieldMetadata::new("rank", "Option<i32>", "Ранг IP").hint("Выше - лучше"),
    FieldMetadata::new("tempMin", "Option<i32>", "Т мин, °С"),
    FieldMetadata::new("tempMax", "Option<i32>", "Т макс, °С"),
    FieldMetadata::new("voltageValue", "Option<i32>", "Напряжение, В"),
    FieldMetadata::new("voltageType", "Option<String>", "Род тока").enumeration(&["AC", "DC"]),
    FieldMetadata::new("sortingOrder", "i32", "Порядок сортировки").required(),
    FieldMetadata::new("isActive", "bool", "Активно").required(),
];

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptionDto {
    pub id: Option<String>,
    pub kind: OptionKind,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub comment: Option<String>,
    pub full_code: Option<String>,
    pub rank: Option<i32>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub voltage_value: Option<i32>,
    pub voltage_type: Option<String>,
    pub sorting_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Фильтр списка опций
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogOptionQuery {
    pub kind: Option<OptionKind>,
    #[serde(default)]
    pub active_only: bool,
}

impl CatalogOptionDto {
    pub fn new(kind: OptionKind, code: &str, description: &str) -> Self {
        Self {
            id: None,
            kind,
            code: code.to_string(),
            description: description.to_string(),
            comment: None,
            full_code: None,
            rank: None,
            temp_min: None,
            temp_max: None,
            voltage_value: None,
            voltage_type: None,
            sorting_order: None,
            is_active: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("body_coating".parse::<OptionKind>().unwrap(), OptionKind::BodyCoating);
        assert_eq!(" IP ".parse::<OptionKind>().unwrap(), OptionKind::Ip);
        assert!("valve".parse::<OptionKind>().is_err());
        for (kind, value) in OptionKind::ALL.iter().zip(OptionKind::VALUES.iter()) {
            assert_eq!(kind.as_str(), *value);
        }
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut dto = CatalogOptionDto::new(OptionKind::Temperature, "T1", "Арктическое");
        dto.temp_min = Some(-60);
        dto.temp_max = Some(40);
        assert!(CatalogOption::from_dto(&dto).validate().is_ok());

        dto.temp_max = Some(-60);
        assert!(CatalogOption::from_dto(&dto).validate().is_err());
    }

    #[test]
    fn test_validate_requires_code() {
        let option = CatalogOption::from_dto(&CatalogOptionDto::new(OptionKind::Ip, "  ", ""));
        assert!(option.validate().is_err());
    }

    #[test]
    fn test_display_name() {
        let option =
            CatalogOption::from_dto(&CatalogOptionDto::new(OptionKind::Ip, "IP67", "Герметичное"));
        assert_eq!(option.display_name(), "IP67 - Герметичное");
    }
}
