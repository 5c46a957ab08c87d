//! HTTP Middleware
//!
//! HTTP 层错误日志：4xx 记 warn、5xx 记 error，并带上请求耗时。
//! 业务错误走统一 errno 信封（HTTP 200），由 `ApiError::into_response` 记录。

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 响应状态码日志中间件
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Request rejected"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::util::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route("/healthy", get(|| async { "pong" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_for(path: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_success_response_passes_through() {
        assert_eq!(status_for("/healthy").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_error_passes_through() {
        assert_eq!(status_for("/missing").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        assert_eq!(status_for("/broken").await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
