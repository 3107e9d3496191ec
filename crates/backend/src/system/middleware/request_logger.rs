use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};

use crate::shared::format::format_size;

/// Голубой для 2xx, коричневый для остальных
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else {
        "33"
    }
}

/// Строка консольного лога запроса (время по МСК)
fn request_line(
    at: DateTime<Utc>,
    elapsed_ms: u128,
    size: &str,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let msk = at + Duration::hours(3);
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        status_color(status),
        msk.format("%H:%M:%S"),
        elapsed_ms,
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Middleware для логирования HTTP запросов
///
/// Пишет в консоль время, длительность, размер ответа, статус, метод и путь.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // размер известен только после чтения тела
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            println!(
                "{}",
                request_line(Utc::now(), start.elapsed().as_millis(), "error", parts.status, &method, &path)
            );
            tracing::warn!("Failed to read response body for {} {}: {}", method, path, e);
            return Response::from_parts(parts, Body::default());
        }
    };

    println!(
        "{}",
        request_line(
            Utc::now(),
            start.elapsed().as_millis(),
            &format_size(bytes.len()),
            parts.status,
            &method,
            &path
        )
    );
    if parts.status.is_server_error() {
        tracing::error!("{} {} -> {}", method, path, parts.status);
    }

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(StatusCode::OK), "36");
        assert_eq!(status_color(StatusCode::CREATED), "36");
        assert_eq!(status_color(StatusCode::BAD_REQUEST), "33");
    }

    #[test]
    fn test_request_line_uses_moscow_time() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 0).unwrap();
        let line = request_line(at, 12, "1.024 B", StatusCode::OK, &Method::GET, "/api/procurement");
        assert!(line.contains("12:15:00"));
        assert!(line.contains("1.024 B"));
        assert!(line.ends_with("200    GET /api/procurement"));
    }
}
