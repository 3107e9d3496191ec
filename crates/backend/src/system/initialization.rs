use anyhow::Result;
use contracts::domain::a001_catalog_option::{CatalogOptionDto, OptionKind};

use crate::domain::a001_catalog_option;

fn option(kind: OptionKind, code: &str, description: &str, sorting_order: i32) -> CatalogOptionDto {
    CatalogOptionDto {
        sorting_order: Some(sorting_order),
        ..CatalogOptionDto::new(kind, code, description)
    }
}

fn ip(code: &str, rank: i32, description: &str, sorting_order: i32) -> CatalogOptionDto {
    CatalogOptionDto {
        rank: Some(rank),
        ..option(OptionKind::Ip, code, description, sorting_order)
    }
}

fn temperature(code: &str, min: i32, max: i32, description: &str, sorting_order: i32) -> CatalogOptionDto {
    CatalogOptionDto {
        temp_min: Some(min),
        temp_max: Some(max),
        ..option(OptionKind::Temperature, code, description, sorting_order)
    }
}

fn power(code: &str, voltage: i32, current: &str, description: &str, sorting_order: i32) -> CatalogOptionDto {
    CatalogOptionDto {
        voltage_value: Some(voltage),
        voltage_type: Some(current.to_string()),
        ..option(OptionKind::PowerSupply, code, description, sorting_order)
    }
}

fn exd(code: &str, full_code: &str, sorting_order: i32) -> CatalogOptionDto {
    CatalogOptionDto {
        full_code: Some(full_code.to_string()),
        ..option(OptionKind::Exd, code, full_code, sorting_order)
    }
}

/// Начальное наполнение справочников опций
pub fn initial_options() -> Vec<CatalogOptionDto> {
    vec![
        ip("IP54", 54, "IP54", 10),
        ip("IP65", 65, "IP65", 20),
        ip("IP67", 67, "IP67", 30),
        ip("IP68", 68, "IP68 *(до 2м. в течение не более 60 мин.)", 40),
        exd("NONE", "Общепромышленное", 10),
        exd("Exd", "1 Exd IIC T5 Gb X", 20),
        exd("Extc", "Ex tc IIIC T95°C  Dc", 30),
        option(OptionKind::BodyCoating, "STD", "Стандарт, аналог AUMA KN", 10),
        option(OptionKind::BodyCoating, "KS", "Аналог AUMA KS (агрессивная среда)", 20),
        option(
            OptionKind::BodyCoating,
            "KX",
            "Аналог AUMA KX (экстремально агрессивная среда)",
            30,
        ),
        option(OptionKind::Blinker, "NONE", "Нет", 10),
        option(OptionKind::Blinker, "blinker_int", "Блинкер на блоке управления", 20),
        option(OptionKind::Switches, "NONE", "нет", 10),
        option(OptionKind::Switches, "SPDT", "одиночные (стандарт)", 20),
        option(OptionKind::Switches, "DPDT", "сдвоенные", 30),
        temperature("NONE", -20, 70, "Стандарт (от -20 °C до +70 °C)", 10),
        temperature("LT", -40, 70, "LT (от -40 °C до +70 °C)", 20),
        temperature("VLT", -60, 70, "VLT (от -60 °C до +70 °C)", 30),
        power("220/50", 220, "AC", "220В/50Гц/1ф", 10),
        power("380/50", 380, "AC", "380В/50Гц/3ф", 20),
        power("24DC", 24, "DC", "24В пост. Ток", 30),
    ]
}

/// Заполнить справочник опций, если он пуст
pub async fn seed_catalog() -> Result<()> {
    let existing = a001_catalog_option::service::list_all().await?;
    if !existing.is_empty() {
        return Ok(());
    }

    tracing::info!("Catalog is empty. Creating initial options...");
    let options = initial_options();
    let total = options.len();
    for dto in options {
        let (kind, code) = (dto.kind, dto.code.clone());
        if let Err(e) = a001_catalog_option::service::create(dto).await {
            tracing::warn!("Seed option {} {} skipped: {}", kind, code, e);
        }
    }
    tracing::info!("Initial catalog options created: {}", total);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_initial_codes_unique_per_kind() {
        let options = initial_options();
        let keys: HashSet<(OptionKind, &str)> =
            options.iter().map(|o| (o.kind, o.code.as_str())).collect();
        assert_eq!(keys.len(), options.len());
    }

    #[test]
    fn test_ip_options_carry_rank() {
        let ranks: Vec<i32> = initial_options()
            .iter()
            .filter(|o| o.kind == OptionKind::Ip)
            .filter_map(|o| o.rank)
            .collect();
        assert_eq!(ranks, vec![54, 65, 67, 68]);
    }
}
