use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 Catalog options
        // ========================================
        .route(
            "/api/catalog_option",
            get(handlers::a001_catalog_option::list_all).post(handlers::a001_catalog_option::upsert),
        )
        .route(
            "/api/catalog_option/:id",
            get(handlers::a001_catalog_option::get_by_id)
                .delete(handlers::a001_catalog_option::delete),
        )
        // ========================================
        // A002 Series options
        // ========================================
        .route(
            "/api/series_option",
            post(handlers::a002_series_option::upsert),
        )
        .route(
            "/api/series_option/:id",
            get(handlers::a002_series_option::get_by_id)
                .delete(handlers::a002_series_option::delete),
        )
        .route(
            "/api/series/:id/options",
            get(handlers::a002_series_option::list_for_series),
        )
        .route(
            "/api/series/:id/options/:kind",
            get(handlers::a002_series_option::effective_options),
        )
        .route(
            "/api/series/:id/options/:kind/default",
            get(handlers::a002_series_option::default_option),
        )
        .route(
            "/api/series/:id/options/:kind/ensure-default",
            post(handlers::a002_series_option::ensure_default),
        )
        .route(
            "/api/series/:id/highest-ip",
            get(handlers::a002_series_option::highest_ip),
        )
        // ========================================
        // A003 Product series
        // ========================================
        .route(
            "/api/product_series",
            get(handlers::a003_product_series::list_all).post(handlers::a003_product_series::upsert),
        )
        .route(
            "/api/product_series/:id",
            get(handlers::a003_product_series::get_by_id)
                .delete(handlers::a003_product_series::delete),
        )
        .route(
            "/api/series/:id/effective",
            get(handlers::a003_product_series::effective),
        )
        .route(
            "/api/series/:id/resolve/:field",
            get(handlers::a003_product_series::resolve_field),
        )
        .route(
            "/api/series/:id/missing-fields",
            get(handlers::a003_product_series::missing_fields),
        )
        .route(
            "/api/series/:id/dimensions",
            get(handlers::a003_product_series::dimensions),
        )
        .route(
            "/api/series/:id/eav/:code",
            get(handlers::a003_product_series::eav_value),
        )
        // ========================================
        // A004 EAV
        // ========================================
        .route(
            "/api/eav_attribute",
            get(handlers::a004_eav::list_attributes).post(handlers::a004_eav::upsert_attribute),
        )
        .route(
            "/api/eav_attribute/:id",
            get(handlers::a004_eav::get_attribute).delete(handlers::a004_eav::delete_attribute),
        )
        .route(
            "/api/eav/:entity_type/filter",
            get(handlers::a004_eav::filter),
        )
        .route(
            "/api/eav/:entity_type/search",
            get(handlers::a004_eav::search),
        )
        .route(
            "/api/eav/:entity_type/:entity_id",
            get(handlers::a004_eav::get_entity_data).put(handlers::a004_eav::set_entity_data),
        )
        .route(
            "/api/eav/:entity_type/:entity_id/missing-required",
            get(handlers::a004_eav::missing_required),
        )
        .route(
            "/api/eav/:entity_type/:entity_id/:code",
            get(handlers::a004_eav::get_value).delete(handlers::a004_eav::delete_value),
        )
        // ========================================
        // A005 Dimension tables
        // ========================================
        .route(
            "/api/dimension_table",
            get(handlers::a005_dimension_table::list_all)
                .post(handlers::a005_dimension_table::upsert),
        )
        .route(
            "/api/dimension_table/:id",
            get(handlers::a005_dimension_table::get_by_id)
                .delete(handlers::a005_dimension_table::delete),
        )
        .route(
            "/api/dimension-tables/:id/data",
            get(handlers::a005_dimension_table::dimension_data),
        )
        .route(
            "/api/dimension-tables/:id/duplicate",
            post(handlers::a005_dimension_table::duplicate),
        )
        .route(
            "/api/dimension-tables/:id/pn/:pn_code",
            delete(handlers::a005_dimension_table::delete_pn_data),
        )
        .route(
            "/api/dimension-tables/:id/parameters",
            get(handlers::a005_dimension_table::list_parameters)
                .post(handlers::a005_dimension_table::create_parameter),
        )
        .route(
            "/api/dimension-tables/:id/drawings",
            get(handlers::a005_dimension_table::list_drawings)
                .post(handlers::a005_dimension_table::create_drawing),
        )
        .route(
            "/api/dimension-tables/:id/cells",
            get(handlers::a005_dimension_table::list_cells),
        )
        .route(
            "/api/dimension-parameters",
            put(handlers::a005_dimension_table::update_parameter),
        )
        .route(
            "/api/dimension-parameters/:id",
            delete(handlers::a005_dimension_table::delete_parameter),
        )
        .route(
            "/api/dimension-drawings",
            put(handlers::a005_dimension_table::update_drawing),
        )
        .route(
            "/api/dimension-drawings/:id",
            delete(handlers::a005_dimension_table::delete_drawing),
        )
        .route(
            "/api/dimension-cells",
            put(handlers::a005_dimension_table::upsert_cell),
        )
        // ========================================
        // A006 Procurement
        // ========================================
        .route(
            "/api/procurement",
            get(handlers::a006_procurement::list_all).post(handlers::a006_procurement::upsert),
        )
        .route(
            "/api/procurement/:id",
            get(handlers::a006_procurement::get_by_id).delete(handlers::a006_procurement::delete),
        )
        // ========================================
        // UseCase u501: Import tenders from CSV
        // ========================================
        .route(
            "/api/tenders/import",
            post(handlers::u501_import_tenders_csv::import),
        )
        .route(
            "/api/tenders/import-history",
            get(handlers::u501_import_tenders_csv::import_history),
        )
        // Logs handlers
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
}
