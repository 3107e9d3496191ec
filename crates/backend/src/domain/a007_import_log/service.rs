use super::repository;
use crate::shared::config;
use contracts::domain::a007_import_log::ImportLog;
use uuid::Uuid;

pub async fn save(log: &ImportLog) -> anyhow::Result<Uuid> {
    repository::insert(log).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ImportLog>> {
    repository::get_by_id(id).await
}

/// История импорта; без лимита берется значение из настроек
pub async fn import_history(limit: Option<u64>) -> anyhow::Result<Vec<ImportLog>> {
    let limit = limit.unwrap_or(config::settings().import.history_limit).max(1);
    repository::list_recent(limit).await
}
