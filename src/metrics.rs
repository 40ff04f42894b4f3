use std::sync::Arc;

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

// ---------------------------------------------------------------------------
// Label types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    pub endpoint: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Ok,
    NotFound,
    UpstreamFailure,
}

// ---------------------------------------------------------------------------
// Metrics struct
// ---------------------------------------------------------------------------

/// Central container for every Prometheus metric exposed by the service.
pub struct Metrics {
    /// Aggregation requests served, by outcome.
    pub requests: Family<OutcomeLabels, Counter>,
    /// Outbound upstream API calls, by logical endpoint.
    pub upstream_api_calls: Family<EndpointLabels, Counter>,
    /// End-to-end latency of one aggregation (listing plus branch fetches).
    pub aggregation_duration_seconds: Histogram,
}

impl Metrics {
    /// Create a new [`Metrics`] instance and register every metric with the
    /// supplied `registry`.
    pub fn new(registry: &mut Registry) -> Self {
        let requests = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "forgeinfo_requests",
            "Aggregation requests by outcome",
            requests.clone(),
        );

        let upstream_api_calls = Family::<EndpointLabels, Counter>::default();
        registry.register(
            "forgeinfo_upstream_api_calls",
            "Upstream API call count by endpoint",
            upstream_api_calls.clone(),
        );

        let aggregation_duration_seconds = Histogram::new(exponential_buckets(0.01, 2.0, 12));
        registry.register(
            "forgeinfo_aggregation_duration_seconds",
            "Aggregation latency in seconds",
            aggregation_duration_seconds.clone(),
        );

        Self {
            requests,
            upstream_api_calls,
            aggregation_duration_seconds,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Thread-safe wrapper for the metrics registry, used in [`crate::AppState`].
#[derive(Clone)]
pub struct MetricsRegistry {
    pub registry: Arc<Registry>,
    pub metrics: Arc<Metrics>,
}

impl MetricsRegistry {
    /// Build a fresh registry and pre-register all service metrics.
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let metrics = Metrics::new(&mut registry);
        Self {
            registry: Arc::new(registry),
            metrics: Arc::new(metrics),
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_metrics_appear_in_exposition() {
        let registry = MetricsRegistry::new();
        registry
            .metrics
            .requests
            .get_or_create(&OutcomeLabels {
                outcome: Outcome::Ok,
            })
            .inc();

        let mut buf = String::new();
        prometheus_client::encoding::text::encode(&mut buf, &registry.registry).unwrap();
        assert!(buf.contains("forgeinfo_requests_total{outcome=\"Ok\"} 1"));
        assert!(buf.contains("forgeinfo_aggregation_duration_seconds"));
    }
}
