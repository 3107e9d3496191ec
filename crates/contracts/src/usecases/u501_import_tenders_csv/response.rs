use crate::domain::a007_import_log::{ImportLog, ImportStatus};
use serde::{Deserialize, Serialize};

/// Ответ на загрузку файла закупок
///
/// `success` истинно только для импорта без ошибок.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub details: ImportLog,
    pub success: bool,
}

impl ImportResponse {
    pub fn from_log(log: ImportLog) -> Self {
        Self {
            message: "Импорт завершен".to_string(),
            success: log.status == ImportStatus::Success,
            details: log,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportHistoryQuery {
    pub limit: Option<u64>,
}
