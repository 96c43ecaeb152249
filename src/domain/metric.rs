use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value a health check measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CpuUsage,
    MemoryUsage,
    DiskUsage,
    ProcessCount,
    EndpointStatus,
}

impl Metric {
    /// Host metrics in the order the sampler reads them
    pub const RESOURCES: [Metric; 4] = [
        Metric::CpuUsage,
        Metric::MemoryUsage,
        Metric::DiskUsage,
        Metric::ProcessCount,
    ];

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::CpuUsage => "CPU Usage",
            Self::MemoryUsage => "Memory Usage",
            Self::DiskUsage => "Disk Usage",
            Self::ProcessCount => "Running Processes",
            Self::EndpointStatus => "Application Status",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
