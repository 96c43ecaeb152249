use std::path::Path;

use async_trait::async_trait;

use crate::domain::DiskUsage;

use super::SourceResult;

/// Raw CPU tick counters, summed over all cores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub busy: u64,
    pub idle: u64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        self.busy + self.idle
    }
}

/// Memory accounting snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Port for reading host-level resource counters
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Read cumulative CPU tick counters
    async fn cpu_times(&self) -> SourceResult<CpuTimes>;

    /// Read total and available memory
    async fn memory_info(&self) -> SourceResult<MemoryInfo>;

    /// Read block usage of the filesystem mounted at `path`
    async fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsage>;

    /// Count processes visible to the caller
    async fn process_count(&self) -> SourceResult<u64>;
}
