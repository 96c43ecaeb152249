mod evaluator;
mod health_check;
mod sampler;

pub use health_check::{CheckSettings, HealthCheckService, Report};
pub use sampler::ResourceSampler;
