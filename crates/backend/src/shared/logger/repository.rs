use chrono::Utc;
use contracts::shared::logger::{LogEntry, LogQuery, LogSource};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: m.id,
            timestamp: m.timestamp,
            source: m.source,
            category: m.category,
            message: m.message,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Запись в журнал в фоне; ошибка записи только логируется
pub fn spawn_log(source: LogSource, category: &str, message: &str) {
    let category = category.to_string();
    let message = message.to_string();

    tokio::spawn(async move {
        if let Err(e) = insert(source, &category, &message).await {
            tracing::warn!("system_log: запись '{}' не сохранена: {}", category, e);
        }
    });
}

pub async fn insert(source: LogSource, category: &str, message: &str) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(Utc::now().format(TIMESTAMP_FORMAT).to_string()),
        source: Set(source.as_str().to_string()),
        category: Set(category.trim().to_string()),
        message: Set(message.to_string()),
    };
    let saved = active.insert(conn()).await?;
    Ok(saved.id)
}

/// Записи журнала, новые сверху
pub async fn list(query: &LogQuery) -> anyhow::Result<Vec<LogEntry>> {
    let mut select = Entity::find().order_by_desc(Column::Id);
    if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        select = select.filter(Column::Category.eq(category));
    }
    if let Some(limit) = query.limit {
        select = select.limit(limit);
    }
    Ok(select
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Очистить журнал; возвращает число удаленных записей
pub async fn clear() -> anyhow::Result<u64> {
    let result = Entity::delete_many().exec(conn()).await?;
    Ok(result.rows_affected)
}
