use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Общая часть всех записей каталога
///
/// `code` и `description` означают разное у разных агрегатов: символьное
/// обозначение опции, кодировку в артикуле, номер закупки или имя файла импорта.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self::with_metadata(id, code, description, None, EntityMetadata::new())
    }

    /// Восстановление из строки БД
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}
