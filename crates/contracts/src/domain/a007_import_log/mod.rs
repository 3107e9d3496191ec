pub mod aggregate;

pub use aggregate::{ImportLog, ImportLogId, ImportStatus};
