pub mod endpoint_probe;
pub mod resource_source;

pub use endpoint_probe::EndpointProbe;
pub use resource_source::{CpuTimes, MemoryInfo, ResourceSource};

pub type SourceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
