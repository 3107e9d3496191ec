pub mod attribute_repository;
pub mod filter;
pub mod service;
pub mod typed_value;
pub mod value_repository;
