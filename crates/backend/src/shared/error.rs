use axum::http::StatusCode;
use axum::Json;
use contracts::domain::common::AggregateId;
use contracts::shared::api::ApiError;

/// Ошибки предметной области, которые показываются пользователю
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> anyhow::Error {
        DomainError::Validation(message.into()).into()
    }

    pub fn not_found(message: impl Into<String>) -> anyhow::Error {
        DomainError::NotFound(message.into()).into()
    }

    pub fn conflict(message: impl Into<String>) -> anyhow::Error {
        DomainError::Conflict(message.into()).into()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

/// HTTP-ответ с телом `{"error": ...}`
pub type ErrorResponse = (StatusCode, Json<ApiError>);

pub type ApiResult<T> = Result<Json<T>, ErrorResponse>;

/// Преобразование ошибки сервиса в HTTP-ответ
///
/// Ошибки `DomainError` отдаются клиенту как есть, остальные логируются и
/// превращаются в 500.
pub fn error_response(context: &str, err: anyhow::Error) -> ErrorResponse {
    if let Some(domain) = err.downcast_ref::<DomainError>() {
        tracing::warn!("{}: {}", context, domain);
        return (domain.status_code(), Json(ApiError::new(domain.to_string())));
    }
    tracing::error!("{}: {:#}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("Внутренняя ошибка сервера")),
    )
}

/// Разбор идентификатора из пути запроса
pub fn parse_id<Id: AggregateId>(raw: &str) -> Result<Id, ErrorResponse> {
    Id::from_string(raw).map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::new(e))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_product_series::ProductSeriesId;

    #[test]
    fn test_domain_errors_keep_status_and_message() {
        let (status, body) = error_response("test", DomainError::validation("Неверная кодировка"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.error, "Неверная кодировка");

        let (status, _) = error_response("test", DomainError::not_found("Серия не найдена"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_hidden() {
        let (status, body) = error_response("test", anyhow::anyhow!("disk I/O error"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.0.error.contains("disk"));
    }

    #[test]
    fn test_parse_id() {
        let id = ProductSeriesId::new_v4();
        assert_eq!(parse_id::<ProductSeriesId>(&id.to_string()).unwrap(), id);
        assert!(parse_id::<ProductSeriesId>("42").is_err());
    }
}
