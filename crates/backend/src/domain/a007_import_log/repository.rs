use contracts::domain::a007_import_log::{ImportLog, ImportLogId, ImportStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a007_import_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Имя файла
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub imported_at: chrono::DateTime<chrono::Utc>,
    pub total_rows: i32,
    pub imported_rows: i32,
    pub updated_rows: i32,
    pub skipped_rows: i32,
    pub error_rows: i32,
    /// JSON-массив строк
    pub warnings: String,
    /// JSON-массив строк
    pub errors: String,
    pub status: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn decode_lines(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

impl From<Model> for ImportLog {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ImportLog {
            base: BaseAggregate::with_metadata(
                ImportLogId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            imported_at: m.imported_at,
            total_rows: m.total_rows,
            imported_rows: m.imported_rows,
            updated_rows: m.updated_rows,
            skipped_rows: m.skipped_rows,
            error_rows: m.error_rows,
            warnings: decode_lines(&m.warnings),
            errors: decode_lines(&m.errors),
            status: m.status.parse().unwrap_or(ImportStatus::Failed),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(log: &ImportLog) -> anyhow::Result<Uuid> {
    let active = ActiveModel {
        id: Set(log.to_string_id()),
        code: Set(log.base.code.clone()),
        description: Set(log.base.description.clone()),
        comment: Set(log.base.comment.clone()),
        imported_at: Set(log.imported_at),
        total_rows: Set(log.total_rows),
        imported_rows: Set(log.imported_rows),
        updated_rows: Set(log.updated_rows),
        skipped_rows: Set(log.skipped_rows),
        error_rows: Set(log.error_rows),
        warnings: Set(serde_json::to_string(&log.warnings)?),
        errors: Set(serde_json::to_string(&log.errors)?),
        status: Set(log.status.as_str().to_string()),
        is_deleted: Set(false),
        created_at: Set(Some(log.base.metadata.created_at)),
        updated_at: Set(Some(log.base.metadata.updated_at)),
        version: Set(log.base.metadata.version),
    };
    active.insert(conn()).await?;
    Ok(log.base.id.value())
}

/// Последние журналы, новые первыми
pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<ImportLog>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::ImportedAt)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ImportLog>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}
