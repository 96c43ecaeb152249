use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::Metric;

/// A host counter could not be read
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{metric}: {cause}")]
pub struct SamplingError {
    pub metric: Metric,
    pub cause: String,
}

impl SamplingError {
    pub fn new(metric: Metric, cause: impl Into<String>) -> Self {
        Self {
            metric,
            cause: cause.into(),
        }
    }
}

/// Why an HTTP probe never produced a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Timeout,
    Connect,
    Request,
}

/// The probe failed below HTTP (refused, DNS, timeout).
///
/// A non-200 response is not one of these; it is an ordinary reading.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct ProbeTransportError {
    pub kind: TransportKind,
    pub message: String,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timed out",
            Self::Connect => "connection failed",
            Self::Request => "request failed",
        })
    }
}

impl ProbeTransportError {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
