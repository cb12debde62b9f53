// Metrics and observability module
// Prometheus counters for committed swaps and reverted transactions,
// plus the size of each quote's candidate set
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, CounterVec, Histogram,
};

pub static SWAPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_swaps_total",
        "committed swaps by entry point",
        &["entry"]
    )
    .unwrap()
});

pub static REVERTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_reverts_total",
        "reverted transactions by error code",
        &["code"]
    )
    .unwrap()
});

pub static QUOTE_CANDIDATES: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "router_quote_candidates",
        "candidate paths evaluated per quote",
        vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0]
    )
    .unwrap()
});
