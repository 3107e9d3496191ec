pub mod cell_repository;
pub mod drawing_repository;
pub mod matrix_builder;
pub mod parameter_repository;
pub mod repository;
pub mod service;
