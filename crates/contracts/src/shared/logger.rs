use serde::{Deserialize, Serialize};

const MAX_CATEGORY_LEN: usize = 50;

/// Откуда пришла запись журнала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Server,
    #[default]
    Client,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Server => "server",
            LogSource::Client => "client",
        }
    }
}

/// Запись системного журнала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
}

/// Запись журнала от клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default)]
    pub source: LogSource,
    pub category: String,
    pub message: String,
}

impl CreateLogRequest {
    pub fn validate(&self) -> Result<(), String> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err("Категория журнала не указана".into());
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(format!(
                "Категория журнала длиннее {} символов",
                MAX_CATEGORY_LEN
            ));
        }
        if self.message.trim().is_empty() {
            return Err("Пустое сообщение журнала".into());
        }
        Ok(())
    }
}

/// Фильтр журнала: категория ("import", "catalog", ...) и лимит строк
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    pub category: Option<String>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_defaults_to_client() {
        let request: CreateLogRequest =
            serde_json::from_str(r#"{"category":"ui","message":"открыта форма"}"#).unwrap();
        assert_eq!(request.source, LogSource::Client);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let request = CreateLogRequest {
            source: LogSource::Server,
            category: " ".into(),
            message: "x".into(),
        };
        assert!(request.validate().is_err());

        let request = CreateLogRequest {
            category: "import".into(),
            message: String::new(),
            ..request
        };
        assert!(request.validate().is_err());
    }
}
