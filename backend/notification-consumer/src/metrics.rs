use std::time::Duration;

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, TextEncoder};

static SEND_ATTEMPTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "notification_consumer_send_attempts_total",
            "Delivery attempts to the notification service, by outcome",
        ),
        &["outcome"],
    )
    .expect("failed to create notification_consumer_send_attempts_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register notification_consumer_send_attempts_total");
    counter
});

static SEND_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    let histogram = Histogram::with_opts(
        HistogramOpts::new(
            "notification_consumer_send_duration_seconds",
            "Latency of forwarding one request to the notification service",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
    )
    .expect("failed to create notification_consumer_send_duration_seconds");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("failed to register notification_consumer_send_duration_seconds");
    histogram
});

pub fn observe_send(outcome: &str, elapsed: Duration) {
    SEND_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
    SEND_DURATION_SECONDS.observe(elapsed.as_secs_f64());
}

pub fn send_attempts_total(outcome: &str) -> u64 {
    SEND_ATTEMPTS_TOTAL.with_label_values(&[outcome]).get()
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
