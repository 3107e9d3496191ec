use contracts::domain::a001_catalog_option::CatalogOption;
use contracts::domain::a002_series_option::SeriesOption;
use contracts::domain::a003_product_series::ProductSeries;
use contracts::domain::a004_eav::EavAttribute;
use contracts::domain::a005_dimension_table::DimensionTable;
use contracts::domain::a006_procurement::Procurement;
use contracts::domain::a007_import_log::ImportLog;
use contracts::domain::common::AggregateRoot;
use contracts::shared::metadata::FieldMetadata;

/// Описание агрегата для генератора
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub index: &'static str,
    pub collection: &'static str,
    pub element_name: &'static str,
    /// Имя Rust-типа без пути, например `CatalogOption`
    pub type_name: &'static str,
    pub fields: &'static [FieldMetadata],
}

impl EntityDescriptor {
    pub fn of<A: AggregateRoot>() -> Self {
        let full = std::any::type_name::<A>();
        Self {
            index: A::aggregate_index(),
            collection: A::collection_name(),
            element_name: A::element_name(),
            type_name: full.rsplit("::").next().unwrap_or(full),
            fields: A::field_metadata(),
        }
    }

    pub fn interface_name(&self) -> String {
        format!("I{}", self.type_name)
    }
}

/// Все агрегаты каталога в порядке индексов
pub fn entities() -> Vec<EntityDescriptor> {
    vec![
        EntityDescriptor::of::<CatalogOption>(),
        EntityDescriptor::of::<SeriesOption>(),
        EntityDescriptor::of::<ProductSeries>(),
        EntityDescriptor::of::<EavAttribute>(),
        EntityDescriptor::of::<DimensionTable>(),
        EntityDescriptor::of::<Procurement>(),
        EntityDescriptor::of::<ImportLog>(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_aggregates() {
        let all = entities();
        let indexes: Vec<&str> = all.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec!["a001", "a002", "a003", "a004", "a005", "a006", "a007"]);
        assert_eq!(all[0].type_name, "CatalogOption");
        assert_eq!(all[0].interface_name(), "ICatalogOption");
        assert!(all.iter().all(|e| !e.fields.is_empty()));
    }
}
