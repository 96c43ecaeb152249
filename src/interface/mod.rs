pub mod report;

pub use report::{render, ExitStatus, OutputFormat};
