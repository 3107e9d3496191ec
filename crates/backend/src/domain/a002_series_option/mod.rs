pub mod defaults;
pub mod repository;
pub mod service;
pub mod store;
