use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::middleware;
use catalog_backend::shared::config;
use catalog_backend::shared::data::{db, migration_runner};
use catalog_backend::shared::logger;
use catalog_backend::{routes, system};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let settings = config::settings();
    let db_path = config::get_database_path(settings)?;

    migration_runner::run_migrations(&db_path).await?;
    db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::seed_catalog().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let port = settings.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    logger::log("startup", &format!("Сервер запущен на порту {}", port));
    axum::serve(listener, app).await?;

    Ok(())
}
