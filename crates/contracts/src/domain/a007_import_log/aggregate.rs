use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::metadata::FieldMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

crate::uuid_aggregate_id!(ImportLogId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,
    Partial,
    Failed,
}

impl ImportStatus {
    pub const VALUES: [&'static str; 3] = ["success", "partial", "failed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Success => "success",
            ImportStatus::Partial => "partial",
            ImportStatus::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportStatus::Success => "Успешно",
            ImportStatus::Partial => "Частично",
            ImportStatus::Failed => "Неудачно",
        }
    }
}

impl FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" => Ok(ImportStatus::Success),
            "partial" => Ok(ImportStatus::Partial),
            "failed" => Ok(ImportStatus::Failed),
            other => Err(format!("Неизвестный статус импорта: {}", other)),
        }
    }
}

/// Журнал импорта файла закупок
///
/// `base.code` - имя файла.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLog {
    #[serde(flatten)]
    pub base: BaseAggregate<ImportLogId>,

    pub imported_at: DateTime<Utc>,
    pub total_rows: i32,
    pub imported_rows: i32,
    pub updated_rows: i32,
    pub skipped_rows: i32,
    pub error_rows: i32,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub status: ImportStatus,
}

impl ImportLog {
    pub fn new_for_insert(filename: &str) -> Self {
        Self {
            base: BaseAggregate::new(
                ImportLogId::new_v4(),
                filename.to_string(),
                format!("Импорт {}", filename),
            ),
            imported_at: Utc::now(),
            total_rows: 0,
            imported_rows: 0,
            updated_rows: 0,
            skipped_rows: 0,
            error_rows: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            status: ImportStatus::Success,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn filename(&self) -> &str {
        &self.base.code
    }

    /// Итоговый статус: ошибки при хотя бы одной загруженной строке дают partial
    pub fn finalize(&mut self) {
        self.status = if self.errors.is_empty() {
            ImportStatus::Success
        } else if self.imported_rows > 0 || self.updated_rows > 0 {
            ImportStatus::Partial
        } else {
            ImportStatus::Failed
        };
    }

    pub fn summary(&self) -> String {
        format!(
            "Всего строк: {}, загружено: {}, обновлено: {}, пропущено: {}, ошибок: {}",
            self.total_rows, self.imported_rows, self.updated_rows, self.skipped_rows, self.error_rows
        )
    }
}

impl AggregateRoot for ImportLog {
    type Id = ImportLogId;

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
        "a007"
    }

    fn collection_name() -> &'static str {
        "import_log"
    }

    fn element_name() -> &'static str {
        "Лог импорта"
    }

    fn list_name() -> &'static str {
        "Логи импорта"
    }

    fn field_metadata() -> &'static [FieldMetadata] {
        FIELDS
    }
}

pub static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("code", "String", "Файл").required().from_base(),
    FieldMetadata::new("importedAt", "DateTime<Utc>", "Дата импорта").required(),
    FieldMetadata::new("totalRows", "i32", "Всего строк").required(),
    FieldMetadata::new("importedRows", "i32", "Загружено").required(),
    FieldMetadata::new("updatedRows", "i32", "Обновлено").required(),
    FieldMetadata::new("skippedRows", "i32", "Пропущено").required(),
    FieldMetadata::new("errorRows", "i32", "С ошибками").required(),
    FieldMetadata::new("warnings", "Vec<String>", "Предупреждения").table().hidden_in_list(),
    FieldMetadata::new("errors", "Vec<String>", "Ошибки").table().hidden_in_list(),
    FieldMetadata::new("status", "ImportStatus", "Статус")
        .required()
        .enumeration(&ImportStatus::VALUES),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_status() {
        let mut log = ImportLog::new_for_insert("tenders.csv");
        log.finalize();
        assert_eq!(log.status, ImportStatus::Success);

        log.errors.push("Строка 2: Ошибка - x".into());
        log.finalize();
        assert_eq!(log.status, ImportStatus::Failed);

        log.imported_rows = 1;
        log.finalize();
        assert_eq!(log.status, ImportStatus::Partial);
    }

    #[test]
    fn test_finalize_partial_counts_updates() {
        let mut log = ImportLog::new_for_insert("tenders.csv");
        log.errors.push("Строка 3: Ошибка - x".into());
        log.updated_rows = 2;
        log.finalize();
        assert_eq!(log.status, ImportStatus::Partial);
    }
}
