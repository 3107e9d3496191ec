use super::repository;
use crate::shared::error::DomainError;
use chrono::{DateTime, Utc};
use contracts::domain::a006_procurement::{Procurement, ProcurementDto, ProcurementId};
use uuid::Uuid;

/// Запись с тем же ключом (предмет, номер, дата окончания)
pub fn find_same_key<'a>(
    candidates: &'a [Procurement],
    end_date: DateTime<Utc>,
) -> Option<&'a Procurement> {
    candidates.iter().find(|p| p.end_date == end_date)
}

async fn ensure_key_unique(procurement: &Procurement, exclude: Option<ProcurementId>) -> anyhow::Result<()> {
    let same = repository::find_by_subject_number(procurement.subject(), procurement.procurement_number())
        .await?;
    if let Some(existing) = find_same_key(&same, procurement.end_date) {
        if Some(existing.base.id) != exclude {
            return Err(DomainError::conflict(format!(
                "Закупка {} с такой датой окончания уже существует",
                procurement.procurement_number()
            )));
        }
    }
    Ok(())
}

pub async fn create(dto: ProcurementDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Procurement::from_dto(&dto);
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_key_unique(&aggregate, None).await?;
    aggregate.before_write();
    repository::insert(&aggregate).await
}

pub async fn update(dto: ProcurementDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))?;
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Закупка не найдена"))?;

    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();
    aggregate.validate().map_err(DomainError::validation)?;
    ensure_key_unique(&aggregate, Some(aggregate.base.id)).await?;
    aggregate.before_write();
    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Procurement>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Procurement>> {
    repository::list_all().await
}

pub async fn find_by_subject_number(subject: &str, number: &str) -> anyhow::Result<Vec<Procurement>> {
    repository::find_by_subject_number(subject.trim(), number.trim()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_same_key_requires_exact_end_date() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let candidates = vec![Procurement::new_for_insert("Задвижки".into(), "0173".into(), first)];

        assert!(find_same_key(&candidates, first).is_some());
        assert!(find_same_key(&candidates, second).is_none());
    }
}
