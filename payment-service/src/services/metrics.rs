//! Prometheus metrics for payment-service.

use axum::http::{Method, StatusCode};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// HTTP request counter by method and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payment_http_requests_total",
        "Total number of HTTP requests",
        &["method", "status"]
    )
    .expect("Failed to register http_requests_total")
});

/// Payment counter by status.
pub static PAYMENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payment_payments_total",
        "Total number of payments by status",
        &["status"] // pending, paid, cancelled
    )
    .expect("Failed to register payments_total")
});

/// Checkout-link counter by outcome.
pub static CHECKOUT_LINKS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payment_checkout_links_total",
        "Total number of hosted checkout links by outcome",
        &["outcome"] // created, failed
    )
    .expect("Failed to register checkout_links_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payment_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "payment_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Remote directory lookup duration histogram.
pub static DIRECTORY_LOOKUP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "payment_directory_lookup_duration_seconds",
        "Remote directory lookup duration in seconds",
        &["dependency"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register directory_lookup_duration")
});

/// Record one finished HTTP request; server errors also count towards
/// the alerting counter.
pub fn record_http_request(method: &Method, status: StatusCode) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), status.as_str()])
        .inc();
    if status.is_server_error() {
        ERRORS_TOTAL.with_label_values(&["http"]).inc();
    }
}

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&PAYMENTS_TOTAL);
    Lazy::force(&CHECKOUT_LINKS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&DIRECTORY_LOOKUP_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_and_server_errors_are_counted() {
        init_metrics();

        let ok_before = HTTP_REQUESTS_TOTAL.with_label_values(&["GET", "200"]).get();
        let err_before = ERRORS_TOTAL.with_label_values(&["http"]).get();

        record_http_request(&Method::GET, StatusCode::OK);
        record_http_request(&Method::POST, StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            HTTP_REQUESTS_TOTAL.with_label_values(&["GET", "200"]).get(),
            ok_before + 1.0
        );
        // Only the 5xx response feeds the error counter.
        assert_eq!(
            ERRORS_TOTAL.with_label_values(&["http"]).get(),
            err_before + 1.0
        );
    }
}
