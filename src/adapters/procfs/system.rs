use std::fs;
use std::path::Path;

use async_trait::async_trait;
use nix::sys::statvfs::statvfs;
use tracing::trace;

use crate::domain::DiskUsage;
use crate::ports::{CpuTimes, MemoryInfo, ResourceSource, SourceResult};

use super::parser::{self, ParseResult};
use super::ProcfsConfig;

/// Resource source implementation using procfs and statvfs
pub struct ProcfsResourceSource {
    config: ProcfsConfig,
}

impl ProcfsResourceSource {
    pub fn new(config: ProcfsConfig) -> Self {
        Self { config }
    }

    fn read_proc_file(&self, name: &str) -> ParseResult<String> {
        let path = self.config.proc_path.join(name);
        trace!(path = %path.display(), "reading proc file");
        Ok(fs::read_to_string(path)?)
    }
}

#[async_trait]
impl ResourceSource for ProcfsResourceSource {
    async fn cpu_times(&self) -> SourceResult<CpuTimes> {
        let stat = parser::parse_cpu_stat(&self.read_proc_file("stat")?)?;

        Ok(CpuTimes {
            busy: stat.busy(),
            idle: stat.idle_total(),
        })
    }

    async fn memory_info(&self) -> SourceResult<MemoryInfo> {
        let meminfo = parser::parse_meminfo(&self.read_proc_file("meminfo")?)?;
        let (total_bytes, available_bytes) = parser::memory_totals(&meminfo)?;

        Ok(MemoryInfo {
            total_bytes,
            available_bytes,
        })
    }

    async fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsage> {
        let stat = statvfs(path)?;

        // statvfs block counts are in fragment-size units
        let fragment_size = stat.fragment_size() as u64;
        let total_bytes = stat.blocks() as u64 * fragment_size;
        let free_bytes = stat.blocks_free() as u64 * fragment_size;
        let available_bytes = stat.blocks_available() as u64 * fragment_size;
        let used_bytes = total_bytes.saturating_sub(free_bytes);

        Ok(DiskUsage::new(path, total_bytes, used_bytes, available_bytes))
    }

    async fn process_count(&self) -> SourceResult<u64> {
        let mut count = 0;

        for entry in fs::read_dir(&self.config.proc_path)? {
            let entry = entry?;
            let file_name = entry.file_name();

            if file_name.to_string_lossy().parse::<u32>().is_ok() {
                count += 1;
            }
        }

        Ok(count)
    }
}
