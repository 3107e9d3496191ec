pub mod a001_catalog_option;
pub mod a002_series_option;
pub mod a003_product_series;
pub mod a004_eav;
pub mod a005_dimension_table;
pub mod a006_procurement;
pub mod a007_import_log;
pub mod common;
