use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// URL подключения к SQLite с созданием файла при отсутствии
pub fn build_sqlite_url(path: &Path) -> String {
    // Windows: C:/... требует ведущий слэш
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Открыть глобальное подключение к БД
///
/// Схема создается заранее через `migration_runner::run_migrations`.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    let db_url = build_sqlite_url(&absolute_path);

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;
    tracing::info!("Database connected: {}", absolute_path.display());

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_forms() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/db/catalog.db")),
            "sqlite:///var/db/catalog.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\catalog.db")),
            "sqlite:///C:/data/catalog.db?mode=rwc"
        );
    }
}
