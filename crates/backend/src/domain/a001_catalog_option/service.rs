use super::repository;
use crate::shared::error::DomainError;
use contracts::domain::a001_catalog_option::{
    CatalogOption, CatalogOptionDto, CatalogOptionId, OptionKind,
};
use uuid::Uuid;

fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Поиск опции по коду без учета регистра и пробелов
pub fn find_in<'a>(options: &'a [CatalogOption], code: &str) -> Option<&'a CatalogOption> {
    let wanted = normalize(code);
    options.iter().find(|o| normalize(&o.base.code) == wanted)
}

/// Сопоставление списка кодов со справочником
///
/// Каждый ненайденный код дает отдельную ошибку, повторы игнорируются.
pub fn match_codes(
    options: &[CatalogOption],
    kind: OptionKind,
    codes: &[String],
) -> (Vec<CatalogOption>, Vec<String>) {
    let mut found: Vec<CatalogOption> = Vec::new();
    let mut errors = Vec::new();
    for code in codes.iter().filter(|c| !c.trim().is_empty()) {
        match find_in(options, code) {
            Some(option) => {
                if !found.iter().any(|f| f.base.id == option.base.id) {
                    found.push(option.clone());
                }
            }
            None => errors.push(format!("{} '{}' не найден", kind.label(), code.trim())),
        }
    }
    (found, errors)
}

async fn ensure_code_unique(option: &CatalogOption) -> anyhow::Result<()> {
    let same_kind = repository::list_by_kind(option.kind, false).await?;
    let duplicate = same_kind.iter().any(|other| {
        other.base.id != option.base.id && normalize(&other.base.code) == normalize(&option.base.code)
    });
    if duplicate {
        return Err(DomainError::conflict(format!(
            "Опция с кодом '{}' уже существует в справочнике '{}'",
            option.base.code,
            option.kind.label()
        )));
    }
    Ok(())
}

/// Создание новой опции справочника
pub async fn create(dto: CatalogOptionDto) -> anyhow::Result<Uuid> {
    let mut aggregate = CatalogOption::from_dto(&dto);

    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate).await?;

    aggregate.before_write();
    repository::insert(&aggregate).await
}

/// Обновление существующей опции
pub async fn update(dto: CatalogOptionDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("Некорректный ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Опция не найдена"))?;

    aggregate.update(&dto);
    aggregate.base.metadata.increment_version();

    aggregate.validate().map_err(DomainError::validation)?;
    ensure_code_unique(&aggregate).await?;

    aggregate.before_write();
    repository::update(&aggregate).await
}

/// Мягкое удаление опции
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<CatalogOption>> {
    repository::get_by_id(id).await
}

pub async fn get_by_ids(ids: &[CatalogOptionId]) -> anyhow::Result<Vec<CatalogOption>> {
    repository::get_by_ids(ids).await
}

pub async fn list_all() -> anyhow::Result<Vec<CatalogOption>> {
    repository::list_all().await
}

pub async fn list_by_kind(kind: OptionKind, active_only: bool) -> anyhow::Result<Vec<CatalogOption>> {
    repository::list_by_kind(kind, active_only).await
}

/// Опция справочника по коду (регистр не важен)
pub async fn find_by_code(kind: OptionKind, code: &str) -> anyhow::Result<Option<CatalogOption>> {
    let options = repository::list_by_kind(kind, false).await?;
    Ok(find_in(&options, code).cloned())
}

/// Опции по списку кодов и ошибки для ненайденных
pub async fn resolve_codes(
    kind: OptionKind,
    codes: &[String],
) -> anyhow::Result<(Vec<CatalogOption>, Vec<String>)> {
    let options = repository::list_by_kind(kind, false).await?;
    let (found, errors) = match_codes(&options, kind, codes);
    for error in &errors {
        tracing::warn!("{}", error);
    }
    Ok((found, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(kind: OptionKind, code: &str) -> CatalogOption {
        CatalogOption::from_dto(&CatalogOptionDto::new(kind, code, ""))
    }

    #[test]
    fn test_find_in_ignores_case_and_spaces() {
        let options = vec![option(OptionKind::Ip, "IP54"), option(OptionKind::Ip, "IP67")];
        assert_eq!(find_in(&options, " ip67 ").unwrap().base.code, "IP67");
        assert!(find_in(&options, "IP68").is_none());
    }

    #[test]
    fn test_match_codes_collects_errors_without_aborting() {
        let options = vec![
            option(OptionKind::Dn, "DN50"),
            option(OptionKind::Dn, "DN80"),
            option(OptionKind::Dn, "DN100"),
        ];
        let codes = vec![
            "DN100".to_string(),
            "DN999".to_string(),
            "dn50".to_string(),
            "DN50".to_string(),
            "".to_string(),
        ];

        let (found, errors) = match_codes(&options, OptionKind::Dn, &codes);

        let found_codes: Vec<&str> = found.iter().map(|o| o.base.code.as_str()).collect();
        assert_eq!(found_codes, vec!["DN100", "DN50"]);
        assert_eq!(errors, vec!["Dn 'DN999' не найден".to_string()]);
    }
}
