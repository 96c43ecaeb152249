pub mod http;
pub mod procfs;

pub use http::HttpProber;
pub use procfs::{ProcfsConfig, ProcfsResourceSource};
