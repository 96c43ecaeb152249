use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Metric, ProbeTransportError};

/// Measured value of a single metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReadingValue {
    Percent(f64),
    Count(u64),
    HttpStatus(u16),
    Unreachable(ProbeTransportError),
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{:.1}%", value),
            Self::Count(count) => write!(f, "{}", count),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Unreachable(err) => write!(f, "{}", err),
        }
    }
}

/// One measurement taken during a check cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub metric: Metric,
    pub value: ReadingValue,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(metric: Metric, value: ReadingValue) -> Self {
        Self {
            metric,
            value,
            timestamp: Utc::now(),
        }
    }

    pub fn percent(metric: Metric, value: f64) -> Self {
        Self::new(metric, ReadingValue::Percent(value))
    }

    pub fn count(metric: Metric, count: u64) -> Self {
        Self::new(metric, ReadingValue::Count(count))
    }

    pub fn http_status(code: u16) -> Self {
        Self::new(Metric::EndpointStatus, ReadingValue::HttpStatus(code))
    }

    pub fn unreachable(err: ProbeTransportError) -> Self {
        Self::new(Metric::EndpointStatus, ReadingValue::Unreachable(err))
    }

    /// Transport failure carried by an endpoint reading, if any
    pub fn transport_error(&self) -> Option<&ProbeTransportError> {
        match &self.value {
            ReadingValue::Unreachable(err) => Some(err),
            _ => None,
        }
    }
}
