use super::row_parser::ParsedRow;
use crate::domain::{a006_procurement, a007_import_log};
use crate::shared::error::DomainError;
use crate::shared::logger;
use async_trait::async_trait;
use contracts::domain::a006_procurement::Procurement;
use contracts::domain::a007_import_log::ImportLog;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_tenders_csv::ImportTendersCsv;

/// Хранилище, с которым работает импорт
#[async_trait]
pub trait TenderStore: Send + Sync {
    /// Закупки с тем же предметом и номером, новые даты первыми
    async fn find_by_subject_number(&self, subject: &str, number: &str) -> anyhow::Result<Vec<Procurement>>;
    async fn insert(&self, procurement: &Procurement) -> anyhow::Result<()>;
    async fn update(&self, procurement: &Procurement) -> anyhow::Result<()>;
    async fn save_log(&self, log: &ImportLog) -> anyhow::Result<()>;
}

pub struct DbTenderStore;

#[async_trait]
impl TenderStore for DbTenderStore {
    async fn find_by_subject_number(&self, subject: &str, number: &str) -> anyhow::Result<Vec<Procurement>> {
        a006_procurement::repository::find_by_subject_number(subject, number).await
    }

    async fn insert(&self, procurement: &Procurement) -> anyhow::Result<()> {
        a006_procurement::repository::insert(procurement).await?;
        Ok(())
    }

    async fn update(&self, procurement: &Procurement) -> anyhow::Result<()> {
        a006_procurement::repository::update(procurement).await
    }

    async fn save_log(&self, log: &ImportLog) -> anyhow::Result<()> {
        a007_import_log::service::save(log).await?;
        Ok(())
    }
}

/// Результат обработки одной строки
#[derive(Debug, PartialEq)]
enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Импорт файла закупок в базу с сохранением журнала
pub async fn import_tenders_csv(filename: &str, bytes: &[u8]) -> anyhow::Result<ImportLog> {
    if !filename.to_lowercase().ends_with(".csv") {
        return Err(DomainError::validation("Файл должен быть в формате CSV"));
    }
    let log = run_import(&DbTenderStore, filename, bytes).await?;
    logger::log(
        "import",
        &format!("{} {}: {}", ImportTendersCsv::display_name(), filename, log.summary()),
    );
    Ok(log)
}

/// Импорт через произвольное хранилище; ошибка строки не прерывает загрузку
pub async fn run_import(store: &dyn TenderStore, filename: &str, bytes: &[u8]) -> anyhow::Result<ImportLog> {
    let mut log = ImportLog::new_for_insert(filename);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(strip_bom(bytes));

    match reader.headers().cloned() {
        Ok(headers) => {
            for (index, record) in reader.records().enumerate() {
                let row_num = index + 1;
                log.total_rows += 1;

                let outcome = match record {
                    Ok(record) => {
                        let row = ParsedRow::parse(headers.iter(), record.iter());
                        process_row(store, &row, row_num, &mut log.warnings).await
                    }
                    Err(e) => Err(anyhow::anyhow!(e)),
                };

                match outcome {
                    Ok(RowOutcome::Created) => log.imported_rows += 1,
                    Ok(RowOutcome::Updated) => log.updated_rows += 1,
                    Ok(RowOutcome::Skipped) => log.skipped_rows += 1,
                    Err(e) => {
                        log.error_rows += 1;
                        log.errors.push(format!("Строка {}: Ошибка - {}", row_num, e));
                    }
                }
            }
        }
        Err(e) => log.errors.push(format!("Ошибка чтения заголовка: {}", e)),
    }

    log.finalize();
    store.save_log(&log).await?;

    tracing::info!(
        "{} {}: {} ({})",
        ImportTendersCsv::full_name(),
        filename,
        log.summary(),
        log.status.as_str()
    );
    Ok(log)
}

async fn process_row(
    store: &dyn TenderStore,
    row: &ParsedRow,
    row_num: usize,
    warnings: &mut Vec<String>,
) -> anyhow::Result<RowOutcome> {
    let Some((subject, number, end_date)) = row.key() else {
        warnings.push(format!(
            "Строка {}: Пропущена - отсутствуют обязательные поля",
            row_num
        ));
        return Ok(RowOutcome::Skipped);
    };

    let candidates = store.find_by_subject_number(subject, number).await?;
    if let Some(existing) = candidates.first() {
        if existing.end_date.date_naive() == end_date.date_naive() {
            warnings.push(format!(
                "Строка {}: Пропущена - дубликат (все поля совпадают)",
                row_num
            ));
            return Ok(RowOutcome::Skipped);
        }
        warnings.push(format!(
            "Строка {}: Внимание - изменена дата окончания для закупки {}. Было: {}, Стало: {}",
            row_num,
            number,
            existing.end_date.format(DATE_FORMAT),
            end_date.format(DATE_FORMAT)
        ));
    }

    match candidates.iter().find(|p| p.end_date == end_date) {
        Some(existing) => {
            let mut procurement = existing.clone();
            row.apply_to(&mut procurement);
            procurement.validate().map_err(anyhow::Error::msg)?;
            procurement.before_write();
            store.update(&procurement).await?;
            warnings.push(format!("Строка {}: Обновлена существующая запись", row_num));
            Ok(RowOutcome::Updated)
        }
        None => {
            let mut procurement =
                Procurement::new_for_insert(subject.to_string(), number.to_string(), end_date);
            row.apply_to(&mut procurement);
            procurement.validate().map_err(anyhow::Error::msg)?;
            procurement.before_write();
            store.insert(&procurement).await?;
            Ok(RowOutcome::Created)
        }
    }
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::sync::Mutex;

    /// Хранилище в памяти для тестов импорта
    #[derive(Default)]
    pub struct MemoryTenderStore {
        pub procurements: Mutex<Vec<Procurement>>,
        pub logs: Mutex<Vec<ImportLog>>,
        /// Номер закупки, запись которой завершается ошибкой
        pub failing_number: Option<String>,
    }

    #[async_trait]
    impl TenderStore for MemoryTenderStore {
        async fn find_by_subject_number(&self, subject: &str, number: &str) -> anyhow::Result<Vec<Procurement>> {
            let mut found: Vec<Procurement> = self
                .procurements
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.subject() == subject && p.procurement_number() == number)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.end_date.cmp(&a.end_date));
            Ok(found)
        }

        async fn insert(&self, procurement: &Procurement) -> anyhow::Result<()> {
            if self.failing_number.as_deref() == Some(procurement.procurement_number()) {
                anyhow::bail!("database is locked");
            }
            self.procurements.lock().unwrap().push(procurement.clone());
            Ok(())
        }

        async fn update(&self, procurement: &Procurement) -> anyhow::Result<()> {
            let mut items = self.procurements.lock().unwrap();
            if let Some(slot) = items.iter_mut().find(|p| p.base.id == procurement.base.id) {
                *slot = procurement.clone();
            }
            Ok(())
        }

        async fn save_log(&self, log: &ImportLog) -> anyhow::Result<()> {
            self.logs.lock().unwrap().push(log.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryTenderStore;
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a007_import_log::ImportStatus;

    const HEADER: &str = "Предмет закупки,№ Закупки,Дата окончания,НМЦ,Статус,Заказчик,\n";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from("\u{feff}");
        text.push_str(HEADER);
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.into_bytes()
    }

    #[tokio::test]
    async fn test_import_counts_and_warnings() {
        let store = MemoryTenderStore::default();
        let data = csv(&[
            "Задвижки DN100,0173-1,01.04.2025 10:00,\"1 000,50\",Активная,ООО Вода,RUB",
            "Задвижки DN100,0173-1,01.04.2025 18:00,,,,",
            "Краны,,01.04.2025 10:00,,,,",
            "Затворы,0173-2,2025-04-02 12:00,-,Отсев,,",
        ]);

        let log = run_import(&store, "tenders.csv", &data).await.unwrap();

        assert_eq!(log.total_rows, 4);
        assert_eq!(log.imported_rows, 2);
        assert_eq!(log.skipped_rows, 2);
        assert_eq!(log.status, ImportStatus::Success);
        assert_eq!(
            log.warnings,
            vec![
                "Строка 2: Пропущена - дубликат (все поля совпадают)".to_string(),
                "Строка 3: Пропущена - отсутствуют обязательные поля".to_string(),
            ]
        );

        let items = store.procurements.lock().unwrap();
        assert_eq!(items[0].nmc, Some(1000.5));
        assert_eq!(items[0].currency, "RUB");
        assert_eq!(items[1].rejection_reason, "");
        assert_eq!(store.logs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_changed_end_date_creates_new_record_with_warning() {
        let store = MemoryTenderStore::default();
        let first = csv(&["Задвижки,77,01.04.2025 10:00,,,,"]);
        run_import(&store, "a.csv", &first).await.unwrap();

        let second = csv(&["Задвижки,77,05.04.2025 10:00,,,,"]);
        let log = run_import(&store, "b.csv", &second).await.unwrap();

        assert_eq!(log.imported_rows, 1);
        assert_eq!(
            log.warnings,
            vec!["Строка 1: Внимание - изменена дата окончания для закупки 77. Было: 2025-04-01 10:00:00, Стало: 2025-04-05 10:00:00".to_string()]
        );
        assert_eq!(store.procurements.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_key_is_updated() {
        let store = MemoryTenderStore::default();
        let older = Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 4, 9, 10, 0, 0).unwrap();
        store.procurements.lock().unwrap().extend([
            Procurement::new_for_insert("Задвижки".into(), "77".into(), older),
            Procurement::new_for_insert("Задвижки".into(), "77".into(), newer),
        ]);

        let data = csv(&["Задвижки,77,01.04.2025 10:00,,Завершена,,"]);
        let log = run_import(&store, "c.csv", &data).await.unwrap();

        assert_eq!(log.updated_rows, 1);
        assert_eq!(log.imported_rows, 0);
        assert_eq!(log.warnings.len(), 2);
        assert_eq!(log.warnings[1], "Строка 1: Обновлена существующая запись");
        assert_eq!(log.status, ImportStatus::Success);
    }

    #[tokio::test]
    async fn test_row_errors_do_not_abort_batch() {
        let store = MemoryTenderStore {
            failing_number: Some("13".into()),
            ..Default::default()
        };
        let data = csv(&[
            "Задвижки,13,01.04.2025 10:00,,,,",
            "Краны,14,01.04.2025 10:00,,,,",
        ]);
        let log = run_import(&store, "d.csv", &data).await.unwrap();

        assert_eq!(log.error_rows, 1);
        assert_eq!(log.imported_rows, 1);
        assert_eq!(log.status, ImportStatus::Partial);
        assert!(log.errors[0].starts_with("Строка 1: Ошибка - "));
        assert_eq!(
            log.total_rows,
            log.imported_rows + log.updated_rows + log.skipped_rows + log.error_rows
        );
    }

    #[tokio::test]
    async fn test_only_errors_means_failed() {
        let store = MemoryTenderStore {
            failing_number: Some("13".into()),
            ..Default::default()
        };
        let data = csv(&["Задвижки,13,01.04.2025 10:00,,,,"]);
        let log = run_import(&store, "e.csv", &data).await.unwrap();
        assert_eq!(log.status, ImportStatus::Failed);
    }

    #[tokio::test]
    async fn test_rejects_non_csv_filename() {
        let err = import_tenders_csv("tenders.xlsx", b"").await.unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());
    }
}
