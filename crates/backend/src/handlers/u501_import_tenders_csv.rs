use anyhow::Context;
use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a007_import_log::{ImportLog, ImportStatus};
use contracts::usecases::u501_import_tenders_csv::{ImportHistoryQuery, ImportResponse};

use crate::domain::a007_import_log;
use crate::shared::error::{error_response, ApiResult, DomainError, ErrorResponse};
use crate::usecases::u501_import_tenders_csv;

const FILE_FIELD: &str = "csv_file";

/// Имя и содержимое поля `csv_file`
async fn read_csv_field(multipart: &mut Multipart) -> anyhow::Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::validation(format!("Некорректный multipart: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.context("чтение файла")?;
        return Ok((filename, data.to_vec()));
    }
    Err(DomainError::validation("Файл не был загружен"))
}

/// POST /api/tenders/import
///
/// 400 с журналом в `details`, если импорт завершился статусом `failed`.
pub async fn import(
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResponse>), ErrorResponse> {
    let (filename, bytes) = read_csv_field(&mut multipart)
        .await
        .map_err(|e| error_response("u501 upload", e))?;

    let log = u501_import_tenders_csv::import_tenders_csv(&filename, &bytes)
        .await
        .map_err(|e| error_response("u501 import", e))?;

    let status = if log.status == ImportStatus::Failed {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ImportResponse::from_log(log))))
}

/// GET /api/tenders/import-history?limit=10
pub async fn import_history(Query(query): Query<ImportHistoryQuery>) -> ApiResult<Vec<ImportLog>> {
    a007_import_log::service::import_history(query.limit)
        .await
        .map(Json)
        .map_err(|e| error_response("u501 history", e))
}
