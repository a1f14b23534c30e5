//! Metrics collection for observability

use prometheus::{
    CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Assessment pipeline metrics
    pub assessment_requests: CounterVec,
    pub assessment_duration: Histogram,
    pub estimated_total_cost: Histogram,

    // Upstream model metrics
    pub model_requests: CounterVec,
    pub model_request_duration: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let assessment_requests = register_counter_vec_with_registry!(
            Opts::new("damage_assessment_requests_total", "Total damage assessment requests"),
            &["outcome"],
            registry
        )?;

        let assessment_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "damage_assessment_duration_seconds",
                "Damage assessment duration in seconds"
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0, 300.0]),
            registry
        )?;

        let estimated_total_cost = register_histogram_with_registry!(
            HistogramOpts::new(
                "damage_estimate_total_cost",
                "Total cost of returned estimates"
            )
            .buckets(vec![0.0, 200.0, 800.0, 2500.0, 5000.0, 10000.0, 25000.0]),
            registry
        )?;

        let model_requests = register_counter_vec_with_registry!(
            Opts::new("vision_model_requests_total", "Total upstream vision model calls"),
            &["status"],
            registry
        )?;

        let model_request_duration = register_histogram_vec_with_registry!(
            "vision_model_request_duration_seconds",
            "Upstream vision model call duration in seconds",
            &["status"],
            registry
        )?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            assessment_requests,
            assessment_duration,
            estimated_total_cost,
            model_requests,
            model_request_duration,
        })
    }

    /// Record a finished assessment
    pub fn record_assessment(&self, outcome: &str, duration_secs: f64) {
        self.assessment_requests.with_label_values(&[outcome]).inc();
        self.assessment_duration.observe(duration_secs);
    }

    /// Record the total cost of a returned estimate
    pub fn record_estimate_cost(&self, total_cost: f64) {
        self.estimated_total_cost.observe(total_cost);
    }

    /// Record one upstream model call
    pub fn record_model_call(&self, status: &str, duration_secs: f64) {
        self.model_requests.with_label_values(&[status]).inc();
        self.model_request_duration
            .with_label_values(&[status])
            .observe(duration_secs);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
