use async_trait::async_trait;
use contracts::domain::a001_catalog_option::{CatalogOption, OptionKind};
use contracts::domain::a002_series_option::SeriesOption;
use contracts::domain::a003_product_series::ProductSeriesId;

use super::repository;
use crate::domain::a001_catalog_option::repository as catalog_repository;

/// Хранилище опций серии для политик дефолтов
#[async_trait]
pub trait SeriesOptionStore: Send + Sync {
    /// Опции серии одного вида по порядку сортировки, включая неактивные
    async fn options(
        &self,
        series_id: ProductSeriesId,
        kind: OptionKind,
    ) -> anyhow::Result<Vec<SeriesOption>>;

    /// Активные значения справочника по порядку сортировки
    async fn catalog(&self, kind: OptionKind) -> anyhow::Result<Vec<CatalogOption>>;

    async fn insert(&self, option: &SeriesOption) -> anyhow::Result<()>;

    async fn update(&self, option: &SeriesOption) -> anyhow::Result<()>;
}

/// Хранилище поверх SQLite
pub struct DbSeriesOptionStore;

#[async_trait]
impl SeriesOptionStore for DbSeriesOptionStore {
    async fn options(
        &self,
        series_id: ProductSeriesId,
        kind: OptionKind,
    ) -> anyhow::Result<Vec<SeriesOption>> {
        repository::list_for(series_id, kind).await
    }

    async fn catalog(&self, kind: OptionKind) -> anyhow::Result<Vec<CatalogOption>> {
        catalog_repository::list_by_kind(kind, true).await
    }

    async fn insert(&self, option: &SeriesOption) -> anyhow::Result<()> {
        repository::insert(option).await.map(|_| ())
    }

    async fn update(&self, option: &SeriesOption) -> anyhow::Result<()> {
        repository::update(option).await
    }
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::sync::Mutex;

    /// Хранилище в памяти для тестов политик
    #[derive(Default)]
    pub struct MemoryStore {
        pub options: Mutex<Vec<SeriesOption>>,
        pub catalog: Vec<CatalogOption>,
    }

    impl MemoryStore {
        pub fn with_catalog(catalog: Vec<CatalogOption>) -> Self {
            Self {
                options: Mutex::new(Vec::new()),
                catalog,
            }
        }

        pub fn snapshot(&self) -> Vec<SeriesOption> {
            self.options.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SeriesOptionStore for MemoryStore {
        async fn options(
            &self,
            series_id: ProductSeriesId,
            kind: OptionKind,
        ) -> anyhow::Result<Vec<SeriesOption>> {
            let mut items: Vec<SeriesOption> = self
                .options
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.series_id == series_id && o.kind == kind)
                .cloned()
                .collect();
            items.sort_by_key(|o| o.sorting_order);
            Ok(items)
        }

        async fn catalog(&self, kind: OptionKind) -> anyhow::Result<Vec<CatalogOption>> {
            Ok(self
                .catalog
                .iter()
                .filter(|c| c.kind == kind && c.is_active)
                .cloned()
                .collect())
        }

        async fn insert(&self, option: &SeriesOption) -> anyhow::Result<()> {
            self.options.lock().unwrap().push(option.clone());
            Ok(())
        }

        async fn update(&self, option: &SeriesOption) -> anyhow::Result<()> {
            let mut options = self.options.lock().unwrap();
            match options.iter_mut().find(|o| o.base.id == option.base.id) {
                Some(existing) => {
                    *existing = option.clone();
                    Ok(())
                }
                None => Err(anyhow::anyhow!("option {} not found", option.base.id)),
            }
        }
    }
}
