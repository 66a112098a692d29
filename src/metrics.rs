/// Resolution outcomes per delegate
///
/// Tracks success rates, failure kinds and latency for each delegate

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::error::ResolveError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateMetrics {
    pub delegate: String,
    pub total_resolutions: u64,
    pub successful_resolutions: u64,
    pub failed_resolutions: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub average_response_time_ms: f64,
    pub total_response_time_ms: u64,
    /// Failure counts keyed by `ResolveError::kind`
    pub failures_by_kind: HashMap<String, u64>,
}

impl DelegateMetrics {
    pub fn new(delegate: String) -> Self {
        Self {
            delegate,
            total_resolutions: 0,
            successful_resolutions: 0,
            failed_resolutions: 0,
            last_success: None,
            last_failure: None,
            last_error: None,
            average_response_time_ms: 0.0,
            total_response_time_ms: 0,
            failures_by_kind: HashMap::new(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_resolutions == 0 {
            0.0
        } else {
            (self.successful_resolutions as f64 / self.total_resolutions as f64) * 100.0
        }
    }

    pub fn record_success(&mut self, response_time: Duration) {
        self.total_resolutions += 1;
        self.successful_resolutions += 1;
        self.last_success = Some(Utc::now());

        let response_ms = response_time.as_millis() as u64;
        self.total_response_time_ms += response_ms;
        self.average_response_time_ms =
            self.total_response_time_ms as f64 / self.successful_resolutions as f64;
    }

    pub fn record_failure(&mut self, error: &ResolveError) {
        self.total_resolutions += 1;
        self.failed_resolutions += 1;
        self.last_failure = Some(Utc::now());
        self.last_error = Some(error.to_string());
        *self.failures_by_kind.entry(error.kind().to_string()).or_insert(0) += 1;
    }
}

/// Shared tracker, one entry per delegate domain
pub struct MetricsTracker {
    metrics: Arc<Mutex<HashMap<String, DelegateMetrics>>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn record_success(&self, delegate: &str, response_time: Duration) {
        let Ok(mut metrics) = self.metrics.lock() else { return };
        let entry = metrics
            .entry(delegate.to_string())
            .or_insert_with(|| DelegateMetrics::new(delegate.to_string()));
        entry.record_success(response_time);

        log::info!(
            "[{}] Resolved in {}ms - Success rate: {:.2}%",
            delegate,
            response_time.as_millis(),
            entry.success_rate()
        );
    }

    pub fn record_failure(&self, delegate: &str, error: &ResolveError) {
        let Ok(mut metrics) = self.metrics.lock() else { return };
        let entry = metrics
            .entry(delegate.to_string())
            .or_insert_with(|| DelegateMetrics::new(delegate.to_string()));
        entry.record_failure(error);

        log::warn!(
            "[{}] Resolution failed - {} - Success rate: {:.2}%",
            delegate,
            error,
            entry.success_rate()
        );
    }

    pub fn get_metrics(&self, delegate: &str) -> Option<DelegateMetrics> {
        self.metrics.lock().ok()?.get(delegate).cloned()
    }

    pub fn get_all_metrics(&self) -> Vec<DelegateMetrics> {
        self.metrics
            .lock()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn export_json(&self) -> String {
        match self.metrics.lock() {
            Ok(metrics) => serde_json::to_string_pretty(&*metrics).unwrap_or_else(|_| "{}".to_string()),
            Err(_) => "{}".to_string(),
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Time a resolution and record its outcome
pub async fn track_resolution<F, T>(
    tracker: &MetricsTracker,
    delegate: &str,
    operation: F,
) -> Result<T, ResolveError>
where
    F: std::future::Future<Output = Result<T, ResolveError>>,
{
    let start = Instant::now();
    let result = operation.await;
    let duration = start.elapsed();

    match &result {
        Ok(_) => tracker.record_success(delegate, duration),
        Err(e) => tracker.record_failure(delegate, e),
    }

    result
}
