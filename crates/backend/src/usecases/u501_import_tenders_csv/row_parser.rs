//! Разбор строк CSV реестра закупок

use chrono::{DateTime, NaiveDateTime, Utc};
use contracts::domain::a006_procurement::{Procurement, ProcurementStatus, ProcurementType};
use maplit::hashmap;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Поле закупки, в которое попадает колонка CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Subject,
    ProcurementNumber,
    Link,
    SpecificationLink,
    Status,
    Manager,
    RejectionReason,
    EndDate,
    Platform,
    Customer,
    ProcurementType,
    Nmc,
    ApplicationGuarantee,
    ContractGuarantee,
    Currency,
}

/// Заголовок CSV -> поле; пустой заголовок - колонка валюты
pub static COLUMNS: Lazy<HashMap<&'static str, Column>> = Lazy::new(|| {
    hashmap! {
        "Предмет закупки" => Column::Subject,
        "№ Закупки" => Column::ProcurementNumber,
        "Ссылка" => Column::Link,
        "ТЗ (если недоступно по основной ссылке)" => Column::SpecificationLink,
        "Статус" => Column::Status,
        "Менеджер" => Column::Manager,
        "Причина отсева" => Column::RejectionReason,
        "Дата окончания" => Column::EndDate,
        "Закон или комм.площадка" => Column::Platform,
        "Заказчик" => Column::Customer,
        "Тип проведения" => Column::ProcurementType,
        "НМЦ" => Column::Nmc,
        "Обеспечение заявки" => Column::ApplicationGuarantee,
        "Обеспечение контракта" => Column::ContractGuarantee,
        "" => Column::Currency,
    }
});

/// Статусы из выгрузки; ключи в нижнем регистре
static STATUSES: Lazy<HashMap<&'static str, ProcurementStatus>> = Lazy::new(|| {
    hashmap! {
        "активная" => ProcurementStatus::Active,
        "отменена" => ProcurementStatus::Canceled,
        "завершена" => ProcurementStatus::Completed,
        "черновик" => ProcurementStatus::Draft,
        "отсев" => ProcurementStatus::Rejected,
        "не актуально" => ProcurementStatus::NotActual,
    }
});

static TYPES: Lazy<HashMap<&'static str, ProcurementType>> = Lazy::new(|| {
    hashmap! {
        "Иной однолотовый способ" => ProcurementType::SingleLot,
        "Запрос цен" => ProcurementType::PriceRequest,
        "Запрос предложений" => ProcurementType::ProposalRequest,
        "Аукцион" => ProcurementType::Auction,
        "Конкурс" => ProcurementType::Competition,
    }
});

/// Значение ячейки; пустое или "-" отбрасывается
pub fn clean_value(raw: &str) -> Option<&str> {
    let value = raw.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

/// Дата окончания: ISO (через `T` или пробел, секунды и смещение необязательны),
/// затем `dd.mm.yyyy HH:MM`. Время без смещения считается UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    let normalized = match value.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    const WITH_OFFSET: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%z",
    ];
    for format in WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    const NAIVE: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%d.%m.%Y %H:%M",
    ];
    NAIVE
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Сумма: пробелы удаляются, запятая - десятичный разделитель
pub fn parse_money(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_status(raw: &str) -> Option<ProcurementStatus> {
    STATUSES.get(raw.trim().to_lowercase().as_str()).copied()
}

pub fn parse_type(raw: &str) -> Option<ProcurementType> {
    TYPES.get(raw.trim()).copied()
}

/// Очищенные поля одной строки; отсутствующие значения - None
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRow {
    pub subject: Option<String>,
    pub procurement_number: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
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
}

impl ParsedRow {
    /// Разбор строки по заголовкам; неизвестные колонки игнорируются
    pub fn parse<'a>(headers: impl IntoIterator<Item = &'a str>, cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut row = ParsedRow::default();
        for (header, cell) in headers.into_iter().zip(cells) {
            let Some(column) = COLUMNS.get(header.trim()) else {
                continue;
            };
            if let Some(value) = clean_value(cell) {
                row.set(*column, value);
            }
        }
        row
    }

    fn set(&mut self, column: Column, value: &str) {
        let text = Some(value.to_string());
        match column {
            Column::Subject => self.subject = text,
            Column::ProcurementNumber => self.procurement_number = text,
            Column::Link => self.link = text,
            Column::SpecificationLink => self.specification_link = text,
            Column::Manager => self.manager = text,
            Column::RejectionReason => self.rejection_reason = text,
            Column::Platform => self.platform = text,
            Column::Customer => self.customer = text,
            Column::Currency => self.currency = text,
            Column::EndDate => self.end_date = parse_date(value),
            Column::Status => self.status = parse_status(value),
            Column::ProcurementType => self.procurement_type = parse_type(value),
            Column::Nmc => self.nmc = parse_money(value),
            Column::ApplicationGuarantee => self.application_guarantee = parse_money(value),
            Column::ContractGuarantee => self.contract_guarantee = parse_money(value),
        }
    }

    /// Ключ записи: предмет, номер и дата окончания
    pub fn key(&self) -> Option<(&str, &str, DateTime<Utc>)> {
        Some((
            self.subject.as_deref()?,
            self.procurement_number.as_deref()?,
            self.end_date?,
        ))
    }

    /// Перенос заполненных полей в закупку; пустые поля не затирают существующие
    pub fn apply_to(&self, procurement: &mut Procurement) {
        fn put<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn put_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        put(&mut procurement.base.description, &self.subject);
        put(&mut procurement.base.code, &self.procurement_number);
        put(&mut procurement.end_date, &self.end_date);
        put_opt(&mut procurement.link, &self.link);
        put_opt(&mut procurement.specification_link, &self.specification_link);
        put(&mut procurement.status, &self.status);
        put(&mut procurement.manager, &self.manager);
        put(&mut procurement.rejection_reason, &self.rejection_reason);
        put(&mut procurement.platform, &self.platform);
        put(&mut procurement.customer, &self.customer);
        put_opt(&mut procurement.procurement_type, &self.procurement_type);
        put_opt(&mut procurement.nmc, &self.nmc);
        put_opt(&mut procurement.application_guarantee, &self.application_guarantee);
        put_opt(&mut procurement.contract_guarantee, &self.contract_guarantee);
        put(&mut procurement.currency, &self.currency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  Аукцион "), Some("Аукцион"));
        assert_eq!(clean_value(" - "), None);
        assert_eq!(clean_value(""), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap();
        assert_eq!(parse_date("2025-03-14T10:30:00"), Some(expected));
        assert_eq!(parse_date("2025-03-14 10:30"), Some(expected));
        assert_eq!(parse_date("14.03.2025 10:30"), Some(expected));
        assert_eq!(parse_date("2025-03-14T13:30:00+03:00"), Some(expected));
        assert_eq!(parse_date("2025-03-14T10:30:00Z"), Some(expected));
        assert_eq!(parse_date("14 марта"), None);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1 250 000,50"), Some(1_250_000.5));
        assert_eq!(parse_money("12500"), Some(12500.0));
        assert_eq!(parse_money("по запросу"), None);
    }

    #[test]
    fn test_status_is_case_insensitive_and_unknown_is_ignored() {
        assert_eq!(parse_status("Отсев"), Some(ProcurementStatus::Rejected));
        assert_eq!(parse_status("НЕ АКТУАЛЬНО"), Some(ProcurementStatus::NotActual));
        assert_eq!(parse_status("в работе"), None);
        assert_eq!(parse_type("Запрос цен"), Some(ProcurementType::PriceRequest));
        assert_eq!(parse_type("Тендер"), None);
    }

    #[test]
    fn test_parse_row_maps_columns() {
        let headers = ["Предмет закупки", "№ Закупки", "Дата окончания", "НМЦ", "Статус", "Лишняя", ""];
        let cells = ["Поставка задвижек", "0173100", "01.04.2025 09:00", "99 000", "-", "x", "RUB"];
        let row = ParsedRow::parse(headers, cells);

        assert_eq!(row.subject.as_deref(), Some("Поставка задвижек"));
        assert_eq!(row.nmc, Some(99_000.0));
        assert_eq!(row.status, None);
        assert_eq!(row.currency.as_deref(), Some("RUB"));
        let (_, number, end_date) = row.key().unwrap();
        assert_eq!(number, "0173100");
        assert_eq!(end_date, Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_apply_keeps_existing_values_for_missing_cells() {
        let end = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let mut procurement = Procurement::new_for_insert("Задвижки".into(), "1".into(), end);
        procurement.manager = "Иванов".into();
        procurement.nmc = Some(10.0);

        let row = ParsedRow {
            customer: Some("ООО Вода".into()),
            status: Some(ProcurementStatus::Completed),
            ..Default::default()
        };
        row.apply_to(&mut procurement);

        assert_eq!(procurement.manager, "Иванов");
        assert_eq!(procurement.nmc, Some(10.0));
        assert_eq!(procurement.customer, "ООО Вода");
        assert_eq!(procurement.status, ProcurementStatus::Completed);
    }
}
