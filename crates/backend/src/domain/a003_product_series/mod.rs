pub mod inheritance;
pub mod repository;
pub mod service;
