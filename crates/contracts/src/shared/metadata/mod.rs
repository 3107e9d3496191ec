//! Metadata types for describing aggregates
//!
//! Every aggregate exposes a static slice of [`FieldMetadata`]. The slices are
//! used for validation and by the TypeScript generator in the backend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::domain::common::AggregateRoot;
//!
//! for field in CatalogOption::field_metadata() {
//!     println!("{}: {}", field.name, field.ui.label);
//! }
//! ```

mod field_type;
mod types;
mod validation;

pub use field_type::{FieldSource, FieldType};
pub use types::{FieldMetadata, FieldUiMetadata, BASE_FIELDS, ENTITY_METADATA_FIELDS};
pub use validation::ValidationRules;
