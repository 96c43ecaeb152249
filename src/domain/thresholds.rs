use serde::{Deserialize, Serialize};

use super::Metric;

pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Alert limits, in percent, for the host utilization metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Thresholds {
    pub fn new(cpu: f64, memory: f64, disk: f64) -> Self {
        Self { cpu, memory, disk }
    }

    /// Limit for `metric`; `None` for metrics that never alert on a number
    pub fn limit(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CpuUsage => Some(self.cpu),
            Metric::MemoryUsage => Some(self.memory),
            Metric::DiskUsage => Some(self.disk),
            Metric::ProcessCount | Metric::EndpointStatus => None,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_THRESHOLD, DEFAULT_THRESHOLD)
    }
}
