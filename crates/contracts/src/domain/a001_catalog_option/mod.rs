pub mod aggregate;

pub use aggregate::{
    CatalogOption, CatalogOptionDto, CatalogOptionId, CatalogOptionQuery, OptionKind,
};
