//! Request logging and subscriber setup.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Level, event, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "storage/logs";

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Logs one line per request and echoes the request id back to the client.
///
/// An incoming `x-request-id` is reused so a front end can correlate its own
/// logs; otherwise a fresh UUID is generated.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 64)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut response = next.run(req).await;
    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    macro_rules! completed {
        ($level:expr, $message:literal) => {
            event!(
                $level,
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                latency_ms,
                $message
            )
        };
    }
    match status {
        500..=599 => completed!(Level::ERROR, "Server error"),
        400..=499 => completed!(Level::WARN, "Client error"),
        _ => completed!(Level::INFO, "Request completed"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,rentree_roster=info,tower_http=warn,sqlx=warn",
            env!("CARGO_CRATE_NAME")
        ))
    })
}

fn daily(file: &str) -> RollingFileAppender {
    RollingFileAppender::new(Rotation::DAILY, LOG_DIR, file)
}

/// Console output plus daily rolling files under [`LOG_DIR`]: `rentree.log`
/// keeps errors as plain text, `rentree.json` keeps everything from `info` up.
pub fn init_tracing() -> std::io::Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;

    let console = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(default_filter());

    let errors = fmt::layer()
        .with_writer(daily("rentree.log"))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("error"));

    let json = fmt::layer()
        .json()
        .with_writer(daily("rentree.json"))
        .with_current_span(true)
        .with_span_list(false)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console)
        .with(errors)
        .with(json)
        .init();

    info!(log_dir = LOG_DIR, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(logging_middleware))
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = HttpRequest::builder()
            .uri("/ping")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let request = HttpRequest::builder()
            .uri("/ping")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        let id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}
