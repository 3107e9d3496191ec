use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Жизненный цикл записи каталога
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Мягкое удаление: запись остается в БД, но не выдается в списках
    pub is_deleted: bool,
    /// Растет на каждом изменении записи
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            version: 0,
        }
    }

    /// Метаданные строки БД; пустые даты заменяются текущим временем
    pub fn from_row(
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        is_deleted: bool,
        version: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            created_at: created_at.unwrap_or(now),
            updated_at: updated_at.or(created_at).unwrap_or(now),
            is_deleted,
            version,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn increment_version(&mut self) {
        self.version += 1;
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_row_falls_back_to_created_at() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let metadata = EntityMetadata::from_row(Some(created), None, true, 3);
        assert_eq!(metadata.updated_at, created);
        assert!(metadata.is_deleted);
        assert_eq!(metadata.version, 3);
    }

    #[test]
    fn test_increment_version() {
        let mut metadata = EntityMetadata::new();
        metadata.increment_version();
        metadata.increment_version();
        assert_eq!(metadata.version, 2);
    }
}
