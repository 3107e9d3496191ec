use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(ProcurementId);

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementStatus {
    #[default]
    Active,
    Canceled,
    Completed,
    Draft,
    Rejected,
    NotActual,
}

impl ProcurementStatus {
    pub const VALUES: [&'static str; 6] = [
        "active",
        "canceled",
        "completed",
        "draft",
        "rejected",
        "not_actual",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementStatus::Active => "active",
            ProcurementStatus::Canceled => "canceled",
            ProcurementStatus::Completed => "completed",
            ProcurementStatus::Draft => "draft",
            ProcurementStatus::Rejected => "rejected",
            ProcurementStatus::NotActual => "not_actual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcurementStatus::Active => "Активная",
            ProcurementStatus::Canceled => "Отменена",
            ProcurementStatus::Completed => "Завершена",
            ProcurementStatus::Draft => "Черновик",
            ProcurementStatus::Rejected => "Отсев",
            ProcurementStatus::NotActual => "Не актуально",
        }
    }
}

impl FromStr for ProcurementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(ProcurementStatus::Active),
            "canceled" => Ok(ProcurementStatus::Canceled),
            "completed" => Ok(ProcurementStatus::Completed),
            "draft" => Ok(ProcurementStatus::Draft),
            "rejected" => Ok(ProcurementStatus::Rejected),
            "not_actual" => Ok(ProcurementStatus::NotActual),
            other => Err(format!("Неизвестный статус закупки: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementType {
    SingleLot,
    PriceRequest,
    ProposalRequest,
    Auction,
    Competition,
    Other,
}

impl ProcurementType {
    pub const VALUES: [&'static str; 6] = [
        "single_lot",
        "price_request",
        "proposal_request",
        "auction",
        "competition",
        "other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementType::SingleLot => "single_lot",
            ProcurementType::PriceRequest => "price_request",
            ProcurementType::ProposalRequest => "proposal_request",
            ProcurementType::Auction => "auction",
            ProcurementType::Competition => "competition",
            ProcurementType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcurementType::SingleLot => "Иной однолотовый способ",
            ProcurementType::PriceRequest => "Запрос цен",
            ProcurementType::ProposalRequest => "Запрос предложений",
            ProcurementType::Auction => "Аукцион",
            ProcurementType::Competition => "Конкурс",
            ProcurementType::Other => "Другой",
        }
    }
}

impl FromStr for ProcurementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single_lot" => Ok(ProcurementType::SingleLot),
            "price_request" => Ok(ProcurementType::PriceRequest),
            "proposal_request" => Ok(ProcurementType::ProposalRequest),
            "auction" => Ok(ProcurementType::Auction),
            "competition" => Ok(ProcurementType::Competition),
            "other" => Ok(ProcurementType::Other),
            other => Err(format!("Неизвестный тип проведения: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Закупка (тендер)
///
/// `base.code` - номер закупки, `base.description` - предмет закупки.
/// Естественный ключ: (предмет, номер, дата окончания).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procurement {
    #[serde(flatten)]
    pub base: BaseAggregate<ProcurementId>,

    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub specification_link: Option<String>,
    #[serde(default)]
    pub status: ProcurementStatus,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub rejection_reason: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub procurement_type: Option<ProcurementType>,

    /// Начальная максимальная цена
    #[serde(default)]
    pub nmc: Option<f64>,
    #[serde(default)]
    pub application_guarantee: Option<f64>,
    #[serde(default)]
    pub contract_guarantee: Option<f64>,
    #[serde(default)]
    pub currency: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Procurement {
    pub fn new_for_insert(subject: String, number: String, end_date: DateTime<Utc>) -> Self {
        Self {
            base: BaseAggregate::new(ProcurementId::new_v4(), number, subject),
            end_date,
            link: None,
            specification_link: None,
            status: ProcurementStatus::Active,
            manager: String::new(),
            rejection_reason: String::new(),
            platform: String::new(),
            customer: String::new(),
            procurement_type: None,
            nmc: None,
            application_guarantee: None,
            contract_guarantee: None,
            currency: String::new(),
            is_active: true,
        }
    }

    pub fn from_dto(dto: &ProcurementDto) -> Self {
        let mut procurement = Self::new_for_insert(
            dto.subject.clone(),
            dto.procurement_number.clone(),
            dto.end_date,
        );
        procurement.update(dto);
        procurement
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn subject(&self) -> &str {
        &self.base.description
    }

    pub fn procurement_number(&self) -> &str {
        &self.base.code
    }

    pub fn update(&mut self, dto: &ProcurementDto) {
        self.base.description = dto.subject.trim().to_string();
        self.base.code = dto.procurement_number.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.end_date = dto.end_date;
        self.link = dto.link.clone();
        self.specification_link = dto.specification_link.clone();
        self.status = dto.status.unwrap_or(self.status);
        self.manager = dto.manager.clone().unwrap_or_default();
        self.rejection_reason = dto.rejection_reason.clone().unwrap_or_default();
        self.platform = dto.platform.clone().unwrap_or_default();
        self.customer = dto.customer.clone().unwrap_or_default();
        self.procurement_type = dto.procurement_type;
        self.nmc = dto.nmc;
        self.application_guarantee = dto.application_guarantee;
        self.contract_guarantee = dto.contract_guarantee;
        self.currency = dto.currency.clone().unwrap_or_default();
        self.is_active = dto.is_active.unwrap_or(self.is_active);
    }

    pub fn validate(&self) -> Result<(), String> {
        for field in FIELDS.iter() {
            match field.name {
                "description" => field
                    .validation
                    .validate_string(&self.base.description, field.ui.label)?,
                "code" => field.validation.validate_string(&self.base.code, field.ui.label)?,
                "currency" => field.validation.validate_string(&self.currency, field.ui.label)?,
                _ => {}
            }
        }
        for (label, amount) in [
            ("НМЦ", self.nmc),
            ("Обеспечение заявки", self.application_guarantee),
            ("Обеспечение контракта", self.contract_guarantee),
        ] {
            if matches!(amount, Some(v) if v < 0.0 || !v.is_finite()) {
                return Err(format!("{}: недопустимая сумма", label));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl std::fmt::Display for Procurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subject: String = self.base.description.chars().take(50).collect();
        write!(f, "{}: {}...", self.base.code, subject)
    }
}

impl AggregateRoot for Procurement {
    type Id = ProcurementId;

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
        "a006"
    }

    fn collection_name() -> &'static str {
        "procurement"
    }

    fn element_name() -> &'static str {
        "Закупка"
    }

    fn list_name() -> &'static str {
        "Закупки"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("description", "String", "Предмет закупки")
        .required()
        .from_base(),
    FieldMetadata::new("code", "String", "№ Закупки")
        .required()
        .max_length(100)
        .from_base(),
    FieldMetadata::new("endDate", "DateTime<Utc>", "Дата окончания").required(),
    FieldMetadata::new("link", "Option<String>", "Ссылка").hidden_in_list(),
    FieldMetadata::new(
        "specificationLink",
        "Option<String>",
        "ТЗ (если недоступно по основной ссылке)",
    )
    .hidden_in_list(),
    FieldMetadata::new("status", "ProcurementStatus", "Статус")
        .required()
        .enumeration(&ProcurementStatus::VALUES),
    FieldMetadata::new("manager", "String", "Менеджер").max_length(100),
    FieldMetadata::new("rejectionReason", "String", "Причина отсева").hidden_in_list(),
    FieldMetadata::new("platform", "String", "Закон или комм.площадка").max_length(200),
    FieldMetadata::new("customer", "String", "Заказчик").max_length(300),
    FieldMetadata::new("procurementType", "Option<ProcurementType>", "Тип проведения")
        .enumeration(&ProcurementType::VALUES),
    FieldMetadata::new("nmc", "Option<f64>", "НМЦ"),
    FieldMetadata::new("applicationGuarantee", "Option<f64>", "Обеспечение заявки")
        .hidden_in_list(),
    FieldMetadata::new("contractGuarantee", "Option<f64>", "Обеспечение контракта")
        .hidden_in_list(),
    FieldMetadata::new("currency", "String", "Валюта").max_length(10),
    FieldMetadata::new("isActive", "bool", "Активна").required(),
];

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementDto {
    pub id: Option<String>,
    pub subject: String,
    pub procurement_number: String,
    pub end_date: DateTime<Utc>,
    pub comment: Option<String>,
    pub link: Option<String>,
    pub specification_link: Option<String>,
    pub status: Option<ProcurementStatus>,
    pub manager: Option<String>,
    pub rejection_reason: Option<String>,
    pub platform: Option<String>,
    pub customer: Option<String>,
    pub procurement_type: Option<ProcurementType>,
    pub nmc: Option<f64>,
    pub application_guarantee: Option<f64>,
    pub contract_guarantee: Option<f64>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

impl ProcurementDto {
    pub fn new(subject: &str, number: &str, end_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            subject: subject.to_string(),
            procurement_number: number.to_string(),
            end_date,
            comment: None,
            link: None,
            specification_link: None,
            status: None,
            manager: None,
            rejection_reason: None,
            platform: None,
            customer: None,
            procurement_type: None,
            nmc: None,
            application_guarantee: None,
            contract_guarantee: None,
            currency: None,
            is_active: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn end_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_default_status_is_active() {
        let procurement = Procurement::from_dto(&ProcurementDto::new("Затворы", "0373", end_date()));
        assert_eq!(procurement.status, ProcurementStatus::Active);
        assert!(procurement.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut dto = ProcurementDto::new("Затворы", "0373", end_date());
        dto.nmc = Some(-1.0);
        assert!(Procurement::from_dto(&dto).validate().is_err());
    }

    #[test]
    fn test_validate_requires_number() {
        let procurement = Procurement::from_dto(&ProcurementDto::new("Затворы", " ", end_date()));
        assert!(procurement.validate().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ProcurementStatus::NotActual).unwrap();
        assert_eq!(json, "\"not_actual\"");
        assert_eq!("not_actual".parse::<ProcurementStatus>().unwrap(), ProcurementStatus::NotActual);
    }
}
