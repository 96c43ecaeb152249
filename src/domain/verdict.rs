use serde::Serialize;

use super::{Metric, Reading};

/// Outcome of evaluating a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Alert,
}

/// A reading classified against its threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub metric: Metric,
    pub reading: Reading,
    pub status: Status,
    pub message: String,
}

impl Verdict {
    pub fn ok(reading: Reading, message: impl Into<String>) -> Self {
        Self::new(reading, Status::Ok, message)
    }

    pub fn alert(reading: Reading, message: impl Into<String>) -> Self {
        Self::new(reading, Status::Alert, message)
    }

    fn new(reading: Reading, status: Status, message: impl Into<String>) -> Self {
        Self {
            metric: reading.metric,
            reading,
            status,
            message: message.into(),
        }
    }

    pub fn is_alert(&self) -> bool {
        self.status == Status::Alert
    }
}
