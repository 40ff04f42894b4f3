use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::config::Config;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub upstream: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    fn healthy() -> Self {
        Self {
            ok: true,
            detail: None,
        }
    }

    fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: Some(detail.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state expected by the handler
// ---------------------------------------------------------------------------

/// Minimal subset of `AppState` required by the health-check handler.
#[derive(Clone)]
pub struct HealthState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

async fn check_upstream(client: &reqwest::Client, api_url: &str) -> CheckResult {
    match client.head(api_url).send().await {
        Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
            CheckResult::healthy()
        }
        Ok(resp) => CheckResult::unhealthy(format!("HEAD {} returned {}", api_url, resp.status())),
        Err(e) => CheckResult::unhealthy(format!("HEAD {} failed: {e}", api_url)),
    }
}

fn aggregate_status(checks: &HealthChecks) -> HealthStatus {
    if checks.upstream.ok {
        HealthStatus::Ok
    } else {
        HealthStatus::Degraded
    }
}

// ---------------------------------------------------------------------------
// Axum handler
// ---------------------------------------------------------------------------

/// `GET /healthz` handler.
///
/// The service itself stays up while upstream is unreachable, so a failing
/// upstream check reports `degraded` with a 200 rather than failing the probe.
pub async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let upstream = check_upstream(&state.http_client, &state.config.upstream.api_url).await;
    let checks = HealthChecks { upstream };
    let status = aggregate_status(&checks);

    Json(HealthResponse { status, checks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_upstream_aggregates_to_ok() {
        let checks = HealthChecks {
            upstream: CheckResult::healthy(),
        };
        assert_eq!(aggregate_status(&checks), HealthStatus::Ok);
    }

    #[test]
    fn failing_upstream_aggregates_to_degraded() {
        let checks = HealthChecks {
            upstream: CheckResult::unhealthy("HEAD failed"),
        };
        assert_eq!(aggregate_status(&checks), HealthStatus::Degraded);
    }

    #[test]
    fn healthy_check_omits_detail() {
        let body = serde_json::to_value(CheckResult::healthy()).unwrap();
        assert_eq!(body, serde_json::json!({"ok": true}));
    }

    #[test]
    fn status_serialises_lowercase() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Degraded).unwrap(),
            serde_json::json!("degraded")
        );
    }
}
