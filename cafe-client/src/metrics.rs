use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMetrics {
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub timed_out_operations: u64,
    pub last_operation_time: Option<SystemTime>,
    pub operations: BTreeMap<String, OperationMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetrics {
    pub count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_latency: Duration,
    pub max_latency: Duration,
}

#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub operation: &'static str,
    pub latency: Duration,
    pub success: bool,
    pub timed_out: bool,
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self {
            total_operations: 0,
            successful_operations: 0,
            failed_operations: 0,
            timed_out_operations: 0,
            last_operation_time: None,
            operations: BTreeMap::new(),
        }
    }
}

impl OperationMetrics {
    fn new() -> Self {
        Self {
            count: 0,
            success_count: 0,
            error_count: 0,
            total_latency: Duration::from_millis(0),
            max_latency: Duration::from_millis(0),
        }
    }

    fn update(&mut self, record: &OperationRecord) {
        self.count += 1;
        self.total_latency += record.latency;

        if record.latency > self.max_latency {
            self.max_latency = record.latency;
        }

        if record.success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn average_latency(&self) -> Duration {
        if self.count == 0 {
            Duration::from_millis(0)
        } else {
            self.total_latency / self.count as u32
        }
    }
}

/// Collects per-operation latency and failure counts for one browser session.
#[derive(Debug)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<RenderMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(RenderMetrics::default())),
        }
    }

    pub async fn record(&self, record: OperationRecord) {
        let mut metrics = self.metrics.write().await;

        metrics.total_operations += 1;
        metrics.last_operation_time = Some(SystemTime::now());

        if record.success {
            metrics.successful_operations += 1;
        } else {
            metrics.failed_operations += 1;
        }

        if record.timed_out {
            metrics.timed_out_operations += 1;
        }

        metrics
            .operations
            .entry(record.operation.to_string())
            .or_insert_with(OperationMetrics::new)
            .update(&record);
    }

    pub async fn get_metrics(&self) -> RenderMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        let metrics = self.get_metrics().await;
        serde_json::to_string_pretty(&metrics)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(operation: &'static str, millis: u64, success: bool) -> OperationRecord {
        OperationRecord {
            operation,
            latency: Duration::from_millis(millis),
            success,
            timed_out: false,
        }
    }

    #[tokio::test]
    async fn test_metrics_collection() {
        let collector = MetricsCollector::new();

        collector.record(record("navigate", 150, true)).await;
        collector
            .record(OperationRecord {
                operation: "wait_for_presence",
                latency: Duration::from_secs(5),
                success: false,
                timed_out: true,
            })
            .await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_operations, 2);
        assert_eq!(metrics.successful_operations, 1);
        assert_eq!(metrics.failed_operations, 1);
        assert_eq!(metrics.timed_out_operations, 1);
        assert!(metrics.last_operation_time.is_some());
    }

    #[tokio::test]
    async fn test_operation_metrics() {
        let collector = MetricsCollector::new();

        collector.record(record("navigate", 100, true)).await;
        collector.record(record("navigate", 300, false)).await;

        let metrics = collector.get_metrics().await;
        let navigate = &metrics.operations["navigate"];
        assert_eq!(navigate.count, 2);
        assert_eq!(navigate.success_count, 1);
        assert_eq!(navigate.error_count, 1);
        assert_eq!(navigate.average_latency(), Duration::from_millis(200));
        assert_eq!(navigate.max_latency, Duration::from_millis(300));

        assert!(!metrics.operations.contains_key("activate"));
    }

    #[tokio::test]
    async fn test_export_metrics() {
        let collector = MetricsCollector::new();
        collector.record(record("extract_all", 20, true)).await;

        let exported = collector.export_metrics().await;
        assert!(exported.is_ok());
        assert!(exported.unwrap().contains("total_operations"));
    }
}
