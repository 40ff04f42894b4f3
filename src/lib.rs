//! Aggregation service over an upstream forge API: given a username, list the
//! user's non-fork repositories together with each repository's branches and
//! latest commit SHAs.

pub mod config;
pub mod forge;
pub mod health;
pub mod http;
pub mod metrics;
pub mod model;
pub mod service;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::forge::UpstreamClient;
use crate::metrics::MetricsRegistry;
use crate::service::RepoAggregator;

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Global state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
    pub metrics: MetricsRegistry,
    pub aggregator: RepoAggregator,
}

impl AppState {
    /// Wire up the upstream client, metrics, and aggregator from a validated
    /// config and a shared HTTP client.
    pub fn new(config: Arc<Config>, http_client: reqwest::Client) -> Result<Self> {
        let metrics = MetricsRegistry::new();
        let upstream = UpstreamClient::new(http_client.clone(), &config.upstream.api_url)?;
        let aggregator = RepoAggregator::new(upstream, metrics.clone());

        Ok(Self {
            config,
            http_client,
            metrics,
            aggregator,
        })
    }
}
