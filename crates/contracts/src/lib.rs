//! Shared contracts of the valve catalog: aggregates, DTOs and field metadata.
//!
//! The crate has no I/O; the backend persists these types and the frontend
//! receives them as JSON (and as generated TypeScript interfaces).

pub mod domain;
pub mod shared;
pub mod usecases;
