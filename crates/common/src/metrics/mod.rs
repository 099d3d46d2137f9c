//! Metrics and observability utilities
//!
//! Counters and histograms for remote lookups, cache efficiency and
//! pipeline runs, with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all AuthorMaps metrics
pub const METRICS_PREFIX: &str = "authormaps";

/// Buckets for whole pipeline runs; cold runs are dominated by request delays
pub const PIPELINE_BUCKETS: &[f64] = &[
    0.1,    // warm cache
    0.5,
    1.0,
    5.0,
    15.0,
    30.0,
    60.0,
    120.0,
    300.0,  // hundreds of co-authors, cold cache
    600.0,
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Remote metrics
    describe_counter!(
        format!("{}_remote_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of PubMed requests"
    );

    describe_histogram!(
        format!("{}_remote_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "PubMed request latency in seconds"
    );

    // Cache metrics
    describe_counter!(
        format!("{}_cache_hits_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache hits"
    );

    describe_counter!(
        format!("{}_cache_misses_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache misses"
    );

    // Pipeline metrics
    describe_counter!(
        format!("{}_pipeline_runs_total", METRICS_PREFIX),
        Unit::Count,
        "Total co-author network builds by outcome"
    );

    describe_histogram!(
        format!("{}_pipeline_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Co-author network build latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Nodes in the last built graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Edges in the last built graph"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record a PubMed request
pub fn record_remote(endpoint: &str, status: u16, duration_secs: f64) {
    counter!(
        format!("{}_remote_requests_total", METRICS_PREFIX),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_remote_request_duration_seconds", METRICS_PREFIX),
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);
}

/// Helper to record cache metrics
pub fn record_cache(hit: bool, cache_name: &str) {
    if hit {
        counter!(
            format!("{}_cache_hits_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_cache_misses_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    }
}

/// Helper to record a finished pipeline run
pub fn record_pipeline(duration_secs: f64, outcome: &str) {
    counter!(
        format!("{}_pipeline_runs_total", METRICS_PREFIX),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(format!("{}_pipeline_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record the size of a built graph
pub fn record_graph(nodes: usize, edges: usize) {
    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edges as f64);
}
