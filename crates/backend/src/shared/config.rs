use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub codegen: CodegenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Сколько последних импортов отдавать в истории
    #[serde(default = "default_history_limit")]
    pub history_limit: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CodegenConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_history_limit() -> u64 {
    10
}

fn default_output_dir() -> String {
    "frontend/src/types/auto-generated".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/catalog.db"

[server]
port = 3000

[import]
history_limit = 10

[codegen]
output_dir = "frontend/src/types/auto-generated"
"#;

static SETTINGS: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Конфигурация процесса, загружается один раз
///
/// Если config.toml не читается, используются встроенные значения.
pub fn settings() -> &'static Config {
    SETTINGS.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config.toml, using defaults: {}", e);
            Config {
                database: DatabaseConfig {
                    path: "target/db/catalog.db".to_string(),
                },
                server: ServerConfig::default(),
                import: ImportConfig::default(),
                codegen: CodegenConfig::default(),
            }
        })
    })
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = default_config().unwrap();
        assert_eq!(config.database.path, "target/db/catalog.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.history_limit, 10);
        assert_eq!(config.codegen.output_dir, "frontend/src/types/auto-generated");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"/tmp/catalog.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.history_limit, 10);
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/catalog.db")
        );
    }
}
