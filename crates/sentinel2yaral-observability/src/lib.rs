//! Observability (health/metrics) abstractions and Axum routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Metrics for the conversion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionMetrics {
    pub timestamp: DateTime<Utc>,
    pub total_conversions: u64,
    pub failed_conversions: u64,
    pub error_rate_percent: f64,
    pub uptime_seconds: u64,
}

#[async_trait::async_trait]
pub trait HealthMonitor: Send + Sync + 'static {
    async fn get_overall_health(&self) -> HealthStatus;
    async fn run_health_checks(&self) -> Vec<HealthCheck>;
    async fn get_metrics(&self) -> ConversionMetrics;
}

/// Health monitor for the converter process.
///
/// Counts conversion outcomes; health degrades when more than half of all
/// requests so far have failed.
pub struct ConverterMonitor {
    started_at: Instant,
    total_conversions: AtomicU64,
    failed_conversions: AtomicU64,
}

impl ConverterMonitor {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_conversions: AtomicU64::new(0),
            failed_conversions: AtomicU64::new(0),
        }
    }

    /// Record a completed conversion request
    pub fn record_conversion(&self, success: bool) {
        self.total_conversions.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_conversions.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn error_rate_percent(&self) -> f64 {
        let total = self.total_conversions.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let failed = self.failed_conversions.load(Ordering::Relaxed);
        (failed as f64 / total as f64) * 100.0
    }
}

impl Default for ConverterMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HealthMonitor for ConverterMonitor {
    async fn get_overall_health(&self) -> HealthStatus {
        if self.error_rate_percent() > 50.0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Up
        }
    }

    async fn run_health_checks(&self) -> Vec<HealthCheck> {
        let start = Instant::now();
        let status = self.get_overall_health().await;

        vec![HealthCheck {
            name: "conversion-service".to_string(),
            status,
            timestamp: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            message: None,
            details: Some(serde_json::json!({
                "total_conversions": self.total_conversions.load(Ordering::Relaxed),
                "failed_conversions": self.failed_conversions.load(Ordering::Relaxed),
            })),
        }]
    }

    async fn get_metrics(&self) -> ConversionMetrics {
        ConversionMetrics {
            timestamp: Utc::now(),
            total_conversions: self.total_conversions.load(Ordering::Relaxed),
            failed_conversions: self.failed_conversions.load(Ordering::Relaxed),
            error_rate_percent: self.error_rate_percent(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

pub mod routes {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::get,
        Router,
    };
    use std::sync::Arc;

    pub fn monitoring_routes(monitor: Arc<dyn HealthMonitor>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/health/detailed", get(health_detailed))
            .route("/metrics", get(metrics))
            .with_state(monitor)
    }

    async fn health(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let status = m.get_overall_health().await;
        let status_code = match status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status_code, Json(status))
    }

    async fn health_detailed(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let checks = m.run_health_checks().await;
        Json(checks)
    }

    async fn metrics(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let s = m.get_metrics().await;
        Json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_monitor_starts_healthy() {
        let monitor = ConverterMonitor::new();
        assert!(matches!(
            monitor.get_overall_health().await,
            HealthStatus::Up
        ));

        let metrics = monitor.get_metrics().await;
        assert_eq!(metrics.total_conversions, 0);
        assert_eq!(metrics.error_rate_percent, 0.0);
    }

    #[tokio::test]
    async fn test_monitor_degrades_on_failures() {
        let monitor = ConverterMonitor::new();
        monitor.record_conversion(false);
        monitor.record_conversion(false);
        monitor.record_conversion(true);

        assert!(matches!(
            monitor.get_overall_health().await,
            HealthStatus::Degraded
        ));

        let metrics = monitor.get_metrics().await;
        assert_eq!(metrics.total_conversions, 3);
        assert_eq!(metrics.failed_conversions, 2);
    }

    #[tokio::test]
    async fn test_health_checks_carry_counters() {
        let monitor = ConverterMonitor::new();
        monitor.record_conversion(true);

        let checks = monitor.run_health_checks().await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "conversion-service");
        let details = checks[0].details.as_ref().unwrap();
        assert_eq!(details["total_conversions"], 1);
    }
}
