//! HTTP Middleware
//!
//! 请求耗时与 HTTP 状态码错误日志

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 请求日志中间件
///
/// 状态码为 4xx 或 5xx 时按级别记录，其余请求仅在 debug 级别记录耗时。
/// 业务错误（errno != 0）在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn unavailable_handler() -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/speak", post(ok_handler))
            .route("/unavailable", get(unavailable_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        assert_eq!(status_of("GET", "/ok").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_passes_through_client_errors() {
        assert_eq!(status_of("GET", "/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of("GET", "/speak").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_passes_through_server_errors() {
        assert_eq!(
            status_of("GET", "/unavailable").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
