use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Metric, Reading, SamplingError};
use crate::ports::{CpuTimes, ResourceSource};

/// Readings gathered from the host in one pass
#[derive(Debug, Default)]
pub struct Sample {
    pub readings: Vec<Reading>,
    pub failures: Vec<SamplingError>,
    /// Sampling stopped early because of a failure in strict mode
    pub aborted: bool,
}

/// Turns raw host counters into readings
pub struct ResourceSampler {
    source: Arc<dyn ResourceSource>,
    disk_path: PathBuf,
    cpu_window: Duration,
}

impl ResourceSampler {
    pub fn new(source: Arc<dyn ResourceSource>, disk_path: impl Into<PathBuf>, cpu_window: Duration) -> Self {
        Self {
            source,
            disk_path: disk_path.into(),
            cpu_window,
        }
    }

    /// Sample CPU, memory, disk and process count, in that order.
    ///
    /// A failed metric is skipped; with `strict` set the first failure stops
    /// the pass.
    pub async fn sample(&self, strict: bool) -> Sample {
        let mut sample = Sample::default();

        for metric in Metric::RESOURCES {
            match self.sample_metric(metric).await {
                Ok(reading) => {
                    debug!(%metric, value = %reading.value, "sampled");
                    sample.readings.push(reading);
                }
                Err(err) => {
                    warn!(%metric, cause = %err.cause, "sampling failed");
                    sample.failures.push(err);
                    if strict {
                        sample.aborted = true;
                        break;
                    }
                }
            }
        }

        sample
    }

    async fn sample_metric(&self, metric: Metric) -> Result<Reading, SamplingError> {
        let reading = match metric {
            Metric::CpuUsage => self.cpu_usage().await.map(|pct| Reading::percent(metric, pct)),
            Metric::MemoryUsage => self.memory_usage().await.map(|pct| Reading::percent(metric, pct)),
            Metric::DiskUsage => self.disk_usage().await.map(|pct| Reading::percent(metric, pct)),
            Metric::ProcessCount => self.source.process_count().await.map(|n| Reading::count(metric, n)),
            Metric::EndpointStatus => Err("not a host metric".into()),
        };

        reading.map_err(|e| SamplingError::new(metric, e.to_string()))
    }

    async fn cpu_usage(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let before = self.source.cpu_times().await?;
        tokio::time::sleep(self.cpu_window).await;
        let after = self.source.cpu_times().await?;

        Ok(cpu_percent(&before, &after))
    }

    async fn memory_usage(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let info = self.source.memory_info().await?;
        if info.total_bytes == 0 {
            return Err("total memory reported as zero".into());
        }

        let used = info.total_bytes.saturating_sub(info.available_bytes);
        Ok((used as f64 / info.total_bytes as f64) * 100.0)
    }

    async fn disk_usage(&self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let disk = self.source.disk_usage(&self.disk_path).await?;
        Ok(disk.usage_percent())
    }
}

/// `100 - idle%` over the ticks elapsed between two snapshots
pub fn cpu_percent(before: &CpuTimes, after: &CpuTimes) -> f64 {
    let total_delta = after.total().saturating_sub(before.total());
    if total_delta == 0 {
        return 0.0;
    }

    let idle_delta = after.idle.saturating_sub(before.idle);
    let idle_percent = (idle_delta as f64 / total_delta as f64) * 100.0;

    (100.0 - idle_percent).clamp(0.0, 100.0)
}
