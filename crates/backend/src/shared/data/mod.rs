pub mod db;
pub mod migration_runner;
