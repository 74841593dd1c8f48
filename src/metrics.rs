use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use rentree_models::{ImportOutcome, PromotionOutcome};

/// Seconds. Uploads of large class lists land in the upper buckets.
const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
/// Returns `Ok(None)` if observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Label used for the `path` of HTTP metrics.
///
/// Requests that matched no route share one label so probing clients cannot
/// grow the number of series.
fn path_label(matched: Option<&MatchedPath>, raw: &str, status: u16) -> String {
    match matched {
        Some(path) => path.as_str().to_owned(),
        None if status == 404 || status == 405 => "unmatched".to_owned(),
        None => raw.to_owned(),
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let raw_path = req.uri().path().to_owned();
    let matched = req.extensions().get::<MatchedPath>().cloned();

    gauge!("http_requests_active").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_active").decrement(1.0);

    let status = response.status().as_u16();
    let path = path_label(matched.as_ref(), &raw_path, status);

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Serves the Prometheus exposition at `/metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// `source` is `json`, `csv` or `preinscrits`.
pub fn track_import(source: &'static str, outcome: &ImportOutcome) {
    if !is_observability_enabled() {
        return;
    }
    counter!("students_imported_total", "source" => source).increment(outcome.created.len() as u64);
    counter!("students_import_duplicates_total", "source" => source)
        .increment(outcome.duplicates.len() as u64);
    counter!("students_import_failures_total", "source" => source)
        .increment(outcome.failed.len() as u64);
}

pub fn track_promotion(outcome: &PromotionOutcome) {
    if !is_observability_enabled() {
        return;
    }
    counter!("students_promoted_total").increment(outcome.promoted.len() as u64);
    counter!("students_retained_total").increment(outcome.retained.len() as u64);
    counter!("students_graduated_total").increment(outcome.graduated.len() as u64);
    counter!("promotion_failures_total", "kind" => "failed").increment(outcome.failed.len() as u64);
    counter!("promotion_failures_total", "kind" => "indeterminate")
        .increment(outcome.indeterminate.len() as u64);
}

pub fn track_user_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_requests_share_a_label() {
        assert_eq!(path_label(None, "/wp-admin/setup.php", 404), "unmatched");
        assert_eq!(path_label(None, "/api/classes", 405), "unmatched");
        assert_eq!(path_label(None, "/api/classes/CP", 200), "/api/classes/CP");
    }

    #[test]
    fn test_buckets_are_sorted() {
        assert!(DURATION_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }
}
