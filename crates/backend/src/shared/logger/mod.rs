pub mod repository;

use contracts::shared::logger::LogSource;

/// Серверное событие в таблицу system_log
///
/// ```ignore
/// logger::log("import", "Импорт tenders.csv: загружено 12 строк");
/// ```
pub fn log(category: &str, message: &str) {
    repository::spawn_log(LogSource::Server, category, message);
}
