pub mod api;
pub mod logger;
pub mod metadata;
