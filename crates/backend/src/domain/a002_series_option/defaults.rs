//! Политики стандартных (дефолтных) опций серии

use contracts::domain::a001_catalog_option::{CatalogOption, OptionKind};
use contracts::domain::a002_series_option::SeriesOption;
use contracts::domain::a003_product_series::ProductSeriesId;

use super::store::SeriesOptionStore;
use crate::shared::error::DomainError;

/// Результат `ensure_default_exists`
#[derive(Debug, Clone)]
pub enum DefaultOutcome {
    /// Активная стандартная опция уже была
    AlreadyPresent(SeriesOption),
    /// Опций не было, создана стандартная
    Created(SeriesOption),
    /// Первая активная (или возвращенная в работу) опция назначена стандартной
    Promoted(SeriesOption),
    /// В справочнике нет подходящих значений
    NothingAvailable,
}

impl DefaultOutcome {
    pub fn default_option(&self) -> Option<&SeriesOption> {
        match self {
            DefaultOutcome::AlreadyPresent(option)
            | DefaultOutcome::Created(option)
            | DefaultOutcome::Promoted(option) => Some(option),
            DefaultOutcome::NothingAvailable => None,
        }
    }
}

/// Проверка записи относительно соседних опций той же серии и вида
pub fn check_write_invariants(option: &SeriesOption, siblings: &[SeriesOption]) -> Result<(), String> {
    let others = siblings.iter().filter(|other| {
        other.base.id != option.base.id
            && other.series_id == option.series_id
            && other.kind == option.kind
    });
    for other in others {
        if option.is_default && other.is_default {
            return Err("Может быть только одна стандартная опция".into());
        }
        if option.has_encoding() && other.encoding().trim() == option.encoding().trim() {
            return Err("Опция с такой кодировкой уже существует".into());
        }
    }
    Ok(())
}

/// Стандартная опция вида для серии, собранная из справочника
pub fn standard_option(
    series_id: ProductSeriesId,
    kind: OptionKind,
    catalog: &[CatalogOption],
) -> Option<SeriesOption> {
    if kind == OptionKind::Temperature {
        let mut option = SeriesOption::new_for_insert(
            series_id,
            kind,
            String::new(),
            "Стандартный температурный диапазон".into(),
        );
        option.work_temp_min = Some(-20);
        option.work_temp_max = Some(80);
        option.is_default = true;
        return Some(option);
    }

    let active: Vec<&CatalogOption> = catalog
        .iter()
        .filter(|c| c.kind == kind && c.is_active)
        .collect();
    let by_code = |code: &str| {
        active
            .iter()
            .copied()
            .find(|c| c.base.code.trim().eq_ignore_ascii_case(code))
    };
    let first = active.first().copied();

    let (source, encoding, description) = match kind {
        OptionKind::Ip => {
            let source = by_code("IP54").or(first)?;
            let description = format!("Стандартная степень защиты {}", source.base.code);
            (source, source.base.code.clone(), description)
        }
        OptionKind::Exd => {
            let source = by_code("STD").or(first)?;
            (
                source,
                "STD".to_string(),
                "Стандартное исполнение взрывозащиты".to_string(),
            )
        }
        OptionKind::BodyCoating => {
            let source = ["STD", "STANDARD", "DEFAULT"]
                .iter()
                .find_map(|code| by_code(*code))
                .or(first)?;
            (
                source,
                source.base.code.clone(),
                "Стандартное покрытие корпуса".to_string(),
            )
        }
        _ => {
            let source = first?;
            (source, source.base.code.clone(), "Стандартная опция".to_string())
        }
    };

    let mut option = SeriesOption::new_for_insert(series_id, kind, encoding, description);
    option.option_id = Some(source.base.id);
    option.is_default = true;
    Some(option)
}

/// Неактивная опция серии с той же кодировкой, что и стандартная
fn matching_inactive<'a>(
    options: &'a [SeriesOption],
    standard: &SeriesOption,
) -> Option<&'a SeriesOption> {
    if !standard.has_encoding() {
        return None;
    }
    options
        .iter()
        .find(|o| !o.is_active && o.encoding().trim() == standard.encoding().trim())
}

fn reactivated(existing: &SeriesOption, standard: &SeriesOption) -> SeriesOption {
    let mut option = existing.clone();
    option.is_active = true;
    if option.option_id.is_none() {
        option.option_id = standard.option_id;
    }
    option
}

/// Гарантирует наличие активной стандартной опции вида у серии
///
/// Повторный вызов ничего не меняет.
pub async fn ensure_default_exists(
    store: &dyn SeriesOptionStore,
    series_id: ProductSeriesId,
    kind: OptionKind,
) -> anyhow::Result<DefaultOutcome> {
    let options = store.options(series_id, kind).await?;

    if let Some(existing) = options.iter().find(|o| o.is_default && o.is_active) {
        return Ok(DefaultOutcome::AlreadyPresent(existing.clone()));
    }

    let (mut candidate, is_new) = match options.iter().find(|o| o.is_active) {
        Some(first) => (first.clone(), false),
        None => {
            let catalog = store.catalog(kind).await?;
            match standard_option(series_id, kind, &catalog) {
                Some(standard) => match matching_inactive(&options, &standard) {
                    Some(existing) => (reactivated(existing, &standard), false),
                    None => (standard, true),
                },
                None => return Ok(DefaultOutcome::NothingAvailable),
            }
        }
    };
    candidate.is_default = true;

    // флаги неактивных дефолтов снимаются только после проверки кандидата
    let mut cleared = Vec::new();
    let mut siblings = Vec::with_capacity(options.len());
    for option in options {
        if option.base.id == candidate.base.id {
            continue;
        }
        if option.is_default {
            let mut option = option;
            option.is_default = false;
            cleared.push(option.clone());
            siblings.push(option);
        } else {
            siblings.push(option);
        }
    }
    check_write_invariants(&candidate, &siblings).map_err(DomainError::validation)?;

    for mut option in cleared {
        option.before_write();
        store.update(&option).await?;
    }
    candidate.before_write();

    if is_new {
        store.insert(&candidate).await?;
        tracing::info!(
            "Created default {} option '{}' for series {}",
            kind,
            candidate.display_name(),
            series_id
        );
        Ok(DefaultOutcome::Created(candidate))
    } else {
        store.update(&candidate).await?;
        Ok(DefaultOutcome::Promoted(candidate))
    }
}

/// Активная IP-опция с наибольшим рангом; при равенстве - первая по порядку
pub fn highest_ip<'a>(
    options: &'a [SeriesOption],
    catalog: &[CatalogOption],
) -> Option<&'a SeriesOption> {
    let rank = |option: &SeriesOption| {
        option
            .option_id
            .and_then(|id| catalog.iter().find(|c| c.base.id == id))
            .and_then(|c| c.rank)
            .unwrap_or(0)
    };

    let mut best: Option<(&SeriesOption, i32)> = None;
    for option in options
        .iter()
        .filter(|o| o.is_active && o.kind == OptionKind::Ip)
    {
        let current = rank(option);
        if best.map_or(true, |(_, top)| current > top) {
            best = Some((option, current));
        }
    }
    best.map(|(option, _)| option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_series_option::store::memory::MemoryStore;
    use contracts::domain::a001_catalog_option::CatalogOptionDto;

    fn catalog_option(kind: OptionKind, code: &str, rank: Option<i32>) -> CatalogOption {
        let mut dto = CatalogOptionDto::new(kind, code, "");
        dto.rank = rank;
        CatalogOption::from_dto(&dto)
    }

    fn series_option(series: ProductSeriesId, kind: OptionKind, encoding: &str, order: i32) -> SeriesOption {
        let mut option = SeriesOption::new_for_insert(series, kind, encoding.into(), String::new());
        option.sorting_order = order;
        option
    }

    #[test]
    fn test_duplicate_default_rejected() {
        let series = ProductSeriesId::new_v4();
        let mut existing = series_option(series, OptionKind::Ip, "IP54", 0);
        existing.is_default = true;
        let mut candidate = series_option(series, OptionKind::Ip, "IP67", 1);
        candidate.is_default = true;

        let err = check_write_invariants(&candidate, &[existing.clone()]).unwrap_err();
        assert_eq!(err, "Может быть только одна стандартная опция");

        // другая серия не мешает
        let mut elsewhere = existing.clone();
        elsewhere.series_id = ProductSeriesId::new_v4();
        assert!(check_write_invariants(&candidate, &[elsewhere]).is_ok());
        // сама запись не считается соседом
        assert!(check_write_invariants(&existing, &[existing.clone()]).is_ok());
    }

    #[test]
    fn test_duplicate_encoding_rejected_but_empty_allowed() {
        let series = ProductSeriesId::new_v4();
        let existing = series_option(series, OptionKind::Temperature, "T1", 0);
        let candidate = series_option(series, OptionKind::Temperature, "T1", 1);
        assert_eq!(
            check_write_invariants(&candidate, &[existing]).unwrap_err(),
            "Опция с такой кодировкой уже существует"
        );

        let blank_a = series_option(series, OptionKind::Temperature, "", 0);
        let blank_b = series_option(series, OptionKind::Temperature, "", 1);
        assert!(check_write_invariants(&blank_b, &[blank_a]).is_ok());
    }

    #[test]
    fn test_standard_option_choices() {
        let series = ProductSeriesId::new_v4();
        let catalog = vec![
            catalog_option(OptionKind::Ip, "IP65", Some(65)),
            catalog_option(OptionKind::Ip, "IP54", Some(54)),
            catalog_option(OptionKind::BodyCoating, "RAL", None),
            catalog_option(OptionKind::BodyCoating, "STANDARD", None),
        ];

        let ip = standard_option(series, OptionKind::Ip, &catalog).unwrap();
        assert_eq!(ip.encoding(), "IP54");
        assert_eq!(ip.option_id, Some(catalog[1].base.id));
        assert!(ip.is_default);

        let coating = standard_option(series, OptionKind::BodyCoating, &catalog).unwrap();
        assert_eq!(coating.encoding(), "STANDARD");

        let temperature = standard_option(series, OptionKind::Temperature, &[]).unwrap();
        assert_eq!(temperature.display_name(), "-20...80°C");
        assert!(!temperature.has_encoding());

        assert!(standard_option(series, OptionKind::Exd, &catalog).is_none());
    }

    #[tokio::test]
    async fn test_creates_standard_option_and_is_idempotent() {
        let series = ProductSeriesId::new_v4();
        let store = MemoryStore::with_catalog(vec![catalog_option(OptionKind::Ip, "IP54", Some(54))]);

        let first = ensure_default_exists(&store, series, OptionKind::Ip).await.unwrap();
        assert!(matches!(first, DefaultOutcome::Created(_)));

        let second = ensure_default_exists(&store, series, OptionKind::Ip).await.unwrap();
        assert!(matches!(second, DefaultOutcome::AlreadyPresent(_)));

        let options = store.snapshot();
        assert_eq!(options.len(), 1);
        assert_eq!(options.iter().filter(|o| o.is_default).count(), 1);
    }

    #[tokio::test]
    async fn test_promotes_first_active_option() {
        let series = ProductSeriesId::new_v4();
        let store = MemoryStore::default();
        let mut inactive = series_option(series, OptionKind::Exd, "EX0", 0);
        inactive.is_active = false;
        inactive.is_default = true;
        let second = series_option(series, OptionKind::Exd, "EX2", 2);
        let first = series_option(series, OptionKind::Exd, "EX1", 1);
        for option in [&inactive, &second, &first] {
            store.insert(option).await.unwrap();
        }

        let outcome = ensure_default_exists(&store, series, OptionKind::Exd).await.unwrap();
        assert!(matches!(outcome, DefaultOutcome::Promoted(_)));
        assert_eq!(outcome.default_option().unwrap().encoding(), "EX1");

        let defaults: Vec<String> = store
            .snapshot()
            .iter()
            .filter(|o| o.is_default)
            .map(|o| o.encoding().to_string())
            .collect();
        assert_eq!(defaults, vec!["EX1".to_string()]);
    }

    #[tokio::test]
    async fn test_reactivates_deactivated_standard_option() {
        let series = ProductSeriesId::new_v4();
        let store = MemoryStore::with_catalog(vec![catalog_option(OptionKind::Ip, "IP54", Some(54))]);
        let mut deactivated = series_option(series, OptionKind::Ip, "IP54", 0);
        deactivated.is_active = false;
        deactivated.is_default = true;
        store.insert(&deactivated).await.unwrap();

        let outcome = ensure_default_exists(&store, series, OptionKind::Ip).await.unwrap();
        assert!(matches!(outcome, DefaultOutcome::Promoted(_)));
        assert_eq!(outcome.default_option().unwrap().base.id, deactivated.base.id);

        let options = store.snapshot();
        assert_eq!(options.len(), 1);
        assert!(options[0].is_active);
        assert!(options[0].is_default);
        assert_eq!(options[0].option_id, Some(store.catalog[0].base.id));

        let again = ensure_default_exists(&store, series, OptionKind::Ip).await.unwrap();
        assert!(matches!(again, DefaultOutcome::AlreadyPresent(_)));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_candidate_keeps_stored_flags() {
        let series = ProductSeriesId::new_v4();
        let store = MemoryStore::default();
        // две активные опции с одной кодировкой: кандидат не пройдет проверку
        let mut flagged = series_option(series, OptionKind::Exd, "EX0", 0);
        flagged.is_active = false;
        flagged.is_default = true;
        let first = series_option(series, OptionKind::Exd, "EX1", 1);
        let twin = series_option(series, OptionKind::Exd, "EX1", 2);
        for option in [&flagged, &first, &twin] {
            store.insert(option).await.unwrap();
        }

        let err = ensure_default_exists(&store, series, OptionKind::Exd).await.unwrap_err();
        assert_eq!(err.to_string(), "Опция с такой кодировкой уже существует");

        let defaults: Vec<String> = store
            .snapshot()
            .iter()
            .filter(|o| o.is_default)
            .map(|o| o.encoding().to_string())
            .collect();
        assert_eq!(defaults, vec!["EX0".to_string()]);
    }

    #[tokio::test]
    async fn test_nothing_available_creates_nothing() {
        let series = ProductSeriesId::new_v4();
        let store = MemoryStore::default();

        let outcome = ensure_default_exists(&store, series, OptionKind::Switches).await.unwrap();
        assert!(matches!(outcome, DefaultOutcome::NothingAvailable));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_highest_ip() {
        let series = ProductSeriesId::new_v4();
        let catalog = vec![
            catalog_option(OptionKind::Ip, "IP54", Some(54)),
            catalog_option(OptionKind::Ip, "IP67", Some(67)),
            catalog_option(OptionKind::Ip, "IP68", Some(68)),
        ];
        let mut options = Vec::new();
        for (i, catalog_entry) in catalog.iter().enumerate() {
            let mut option = series_option(series, OptionKind::Ip, &catalog_entry.base.code, i as i32);
            option.option_id = Some(catalog_entry.base.id);
            options.push(option);
        }
        options[2].is_active = false;

        assert_eq!(highest_ip(&options, &catalog).unwrap().encoding(), "IP67");
        assert!(highest_ip(&[], &catalog).is_none());
    }
}
