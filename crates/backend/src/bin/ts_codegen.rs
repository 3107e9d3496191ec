//! Генератор TypeScript-интерфейсов для фронтенда
//!
//! Usage: ts-codegen [--out-dir <dir>]

use std::path::PathBuf;

use catalog_backend::shared::config;
use catalog_backend::tools::ts_codegen::TypeScriptGenerator;
use clap::Parser;

#[derive(Parser)]
#[command(name = "ts-codegen")]
#[command(about = "Генерация TypeScript-интерфейсов по метаданным агрегатов")]
struct Cli {
    /// Каталог для .ts файлов (по умолчанию codegen.output_dir из config.toml)
    #[arg(long, env = "TS_CODEGEN_OUT_DIR")]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            catalog_backend::system::tracing::DEFAULT_LOG_FILTER,
        ))
        .init();

    let cli = Cli::parse();
    let out_dir = cli
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config::settings().codegen.output_dir));

    let written = TypeScriptGenerator::new(out_dir).generate_all()?;
    for path in &written {
        println!("✓ {}", path.display());
    }
    Ok(())
}
