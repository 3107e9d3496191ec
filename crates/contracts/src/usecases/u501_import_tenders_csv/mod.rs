pub mod response;

pub use response::{ImportHistoryQuery, ImportResponse};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportTendersCsv;

impl UseCaseMetadata for ImportTendersCsv {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_tenders_csv"
    }

    fn display_name() -> &'static str {
        "Импорт закупок из CSV"
    }

    fn description() -> &'static str {
        "Загрузка реестра закупок из выгрузки CSV с журналом импорта"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(ImportTendersCsv::full_name(), "u501_import_tenders_csv");
    }
}
