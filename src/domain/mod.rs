pub mod disk;
pub mod error;
pub mod metric;
pub mod reading;
pub mod thresholds;
pub mod verdict;

pub use disk::DiskUsage;
pub use error::{ProbeTransportError, SamplingError, TransportKind};
pub use metric::Metric;
pub use reading::{Reading, ReadingValue};
pub use thresholds::{Thresholds, DEFAULT_THRESHOLD};
pub use verdict::Verdict;
