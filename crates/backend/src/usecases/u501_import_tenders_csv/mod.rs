pub mod executor;
pub mod row_parser;

pub use executor::{import_tenders_csv, DbTenderStore, TenderStore};
