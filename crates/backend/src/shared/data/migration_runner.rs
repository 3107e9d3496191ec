use super::db::build_sqlite_url;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

fn candidate_migrations_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.join("migrations"));
        }
    }

    dirs.push(PathBuf::from("migrations"));
    dirs.push(PathBuf::from("../../migrations"));
    dirs.push(PathBuf::from("../../../migrations"));

    dirs
}

/// Применить миграции из каталога `migrations/`
///
/// Каталог ищется рядом с exe, затем относительно текущей директории.
pub async fn run_migrations(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(db_path);
    let pool = SqlitePool::connect(&db_url).await?;

    let migrations_dir = candidate_migrations_dirs()
        .into_iter()
        .find(|p| p.exists() && p.is_dir())
        .ok_or_else(|| anyhow::anyhow!("migrations directory not found"))?;

    tracing::info!("Using migrations directory: {}", migrations_dir.display());

    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}
