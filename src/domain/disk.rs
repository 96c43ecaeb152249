use std::path::PathBuf;

/// Block usage of the filesystem holding a mount path
#[derive(Debug, Clone, PartialEq)]
pub struct DiskUsage {
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

impl DiskUsage {
    pub fn new(
        mount_point: impl Into<PathBuf>,
        total_bytes: u64,
        used_bytes: u64,
        available_bytes: u64,
    ) -> Self {
        Self {
            mount_point: mount_point.into(),
            total_bytes,
            used_bytes,
            available_bytes,
        }
    }

    /// Percentage used as `df` reports it: reserved blocks are not counted
    /// as available to the caller.
    pub fn usage_percent(&self) -> f64 {
        let usable = self.used_bytes + self.available_bytes;
        if usable == 0 {
            return 0.0;
        }
        (self.used_bytes as f64 / usable as f64) * 100.0
    }
}
