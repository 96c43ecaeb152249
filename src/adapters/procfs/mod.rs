mod parser;
mod system;

use std::path::PathBuf;

pub use system::ProcfsResourceSource;

/// Configuration for the proc root (useful when /proc is bind-mounted)
#[derive(Debug, Clone)]
pub struct ProcfsConfig {
    pub proc_path: PathBuf,
}

impl ProcfsConfig {
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
        }
    }
}
