//! Axum router and HTTP request handlers for the aggregation service.
//!
//! Routes:
//! - `GET /users/{username}/repositories` - non-fork repositories with branches
//! - `GET /healthz`                       - health check
//! - `GET /metrics`                       - Prometheus metrics

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::forge::ForgeError;
use crate::metrics::{Outcome, OutcomeLabels};
use crate::model::ErrorResponse;
use crate::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the axum [`Router`] with all HTTP routes and shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/users/{username}/repositories",
            get(handle_user_repositories),
        )
        .route("/healthz", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /users/{username}/repositories`
///
/// Returns the aggregated repository list in upstream listing order.  An
/// upstream 404 maps to our own 404 with a fixed error envelope; every other
/// upstream failure maps to 502.
#[instrument(skip(state), fields(%username))]
async fn handle_user_repositories(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let result = state.aggregator.user_repositories(&username).await;

    let outcome = match &result {
        Ok(_) => Outcome::Ok,
        Err(ForgeError::NotFound { .. }) => Outcome::NotFound,
        Err(_) => Outcome::UpstreamFailure,
    };
    state
        .metrics
        .metrics
        .requests
        .get_or_create(&OutcomeLabels { outcome })
        .inc();

    let repositories = result?;
    Ok(Json(repositories).into_response())
}

/// `GET /healthz`
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health_state = crate::health::HealthState {
        config: Arc::clone(&state.config),
        http_client: state.http_client.clone(),
    };
    crate::health::health_handler(axum::extract::State(health_state)).await
}

/// `GET /metrics`
///
/// Returns Prometheus metrics collected by the service.
async fn handle_metrics(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let mut buf = String::new();
    prometheus_client::encoding::text::encode(&mut buf, &state.metrics.registry)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("metrics encoding failed: {e}")))?;

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buf,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Application-level error type that maps cleanly to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The username does not exist upstream.
    UserNotFound,
    /// Upstream answered with an error or an undecodable body.
    Upstream(ForgeError),
    /// An unexpected internal error.
    Internal(anyhow::Error),
}

impl From<ForgeError> for AppError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::NotFound { .. } => AppError::UserNotFound,
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(404, "User not found")),
            )
                .into_response(),
            AppError::Upstream(err) => {
                error!(error = %err, "upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse::new(502, "Upstream request failed")),
                )
                    .into_response()
            }
            AppError::Internal(err) => {
                error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(500, "Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
