//! Backend of the valve catalog: axum HTTP API over SQLite (sea-orm),
//! the tender CSV import and the TypeScript interface generator.

pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod tools;
pub mod usecases;
