// file: src/utils/telemetry.rs
// description: phase timing and throughput reporting
// reference: structured tracing of long-running operations

use std::time::{Duration, Instant};
use tracing::info;

/// Wall-clock timer for one pipeline phase.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn checkpoint(&self, message: &str) {
        info!(
            "[{}] {} at {:.2}s",
            self.operation,
            message,
            self.elapsed().as_secs_f64()
        );
    }

    /// Stops the timer and logs throughput over `count` items.
    pub fn finish(self, count: u64) -> PerformanceMetrics {
        let metrics = PerformanceMetrics::new(&self.operation, count, self.elapsed());
        info!("Completed {}", metrics.format());
        metrics
    }
}

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub operation: String,
    pub count: u64,
    pub duration: Duration,
    pub throughput: f64,
    pub avg_item_time_ms: f64,
}

impl PerformanceMetrics {
    pub fn new(operation: &str, count: u64, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        let throughput = if secs > 0.0 { count as f64 / secs } else { 0.0 };
        let avg_item_time_ms = if count > 0 {
            duration.as_millis() as f64 / count as f64
        } else {
            0.0
        };

        Self {
            operation: operation.to_string(),
            count,
            duration,
            throughput,
            avg_item_time_ms,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{}: {} items in {:.2}s ({:.2} items/sec, {:.2}ms per item)",
            self.operation,
            self.count,
            self.duration.as_secs_f64(),
            self.throughput,
            self.avg_item_time_ms
        )
    }
}
