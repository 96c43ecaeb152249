use std::fmt::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::application::Report;
use crate::domain::{Metric, ReadingValue, SamplingError, Verdict};

/// How a report is written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Process exit status summarizing a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitStatus {
    Ok,
    Alert,
    Failure,
}

impl ExitStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Alert => 1,
            Self::Failure => 2,
        }
    }

    /// Worst observed outcome: strict failures beat alerts
    pub fn of(report: &Report) -> Self {
        if report.has_strict_failure() {
            Self::Failure
        } else if report.alert_count() > 0 {
            Self::Alert
        } else {
            Self::Ok
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub body: String,
    pub exit_status: ExitStatus,
}

/// JSON document for `--format json`
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    timestamp: String,
    status: ExitStatus,
    exit_code: u8,
    strict: bool,
    aborted: bool,
    verdicts: &'a [Verdict],
    errors: &'a [SamplingError],
}

impl<'a> ReportDocument<'a> {
    fn new(report: &'a Report, exit_status: ExitStatus) -> Self {
        Self {
            timestamp: report.timestamp.to_rfc3339(),
            status: exit_status,
            exit_code: exit_status.code(),
            strict: report.strict,
            aborted: report.aborted,
            verdicts: &report.verdicts,
            errors: &report.failures,
        }
    }
}

pub fn render(report: &Report, format: OutputFormat) -> Result<RenderedOutput, serde_json::Error> {
    let exit_status = ExitStatus::of(report);

    let body = match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => serde_json::to_string_pretty(&ReportDocument::new(report, exit_status))?,
    };

    Ok(RenderedOutput { body, exit_status })
}

/// Metric lines, then alerts, then errors, with the process count last
fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let mut processes = None;

    for verdict in &report.verdicts {
        if verdict.metric == Metric::ProcessCount {
            processes = Some(verdict);
            continue;
        }
        let _ = writeln!(out, "{}: {}", verdict.metric.label(), display_value(verdict));
    }

    for verdict in report.verdicts.iter().filter(|v| v.is_alert()) {
        let _ = writeln!(out, "ALERT: {}", verdict.message);
    }

    for failure in &report.failures {
        let _ = writeln!(out, "ERROR: {}: {}", failure.metric.label(), failure.cause);
    }
    if report.aborted {
        let _ = writeln!(out, "ERROR: remaining checks skipped (strict mode)");
    }

    if let Some(verdict) = processes {
        let _ = writeln!(out, "{}: {}", verdict.metric.label(), verdict.reading.value);
    }

    out
}

fn display_value(verdict: &Verdict) -> String {
    match &verdict.reading.value {
        ReadingValue::HttpStatus(code) if verdict.is_alert() => format!("DOWN (HTTP {})", code),
        ReadingValue::HttpStatus(code) => format!("UP (HTTP {})", code),
        ReadingValue::Unreachable(err) => format!("DOWN ({})", err),
        value => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::domain::{ProbeTransportError, Reading, TransportKind};

    fn ok(reading: Reading) -> Verdict {
        Verdict::ok(reading, "fine")
    }

    fn report(verdicts: Vec<Verdict>, failures: Vec<SamplingError>, strict: bool) -> Report {
        Report {
            timestamp: Utc::now(),
            verdicts,
            failures,
            strict,
            aborted: false,
        }
    }

    fn scenario() -> Report {
        report(
            vec![
                ok(Reading::percent(Metric::CpuUsage, 45.0)),
                Verdict::alert(Reading::percent(Metric::MemoryUsage, 92.0), "Memory Usage is above 80%"),
                ok(Reading::percent(Metric::DiskUsage, 10.0)),
                ok(Reading::count(Metric::ProcessCount, 212)),
                Verdict::ok(Reading::http_status(200), "Application is UP"),
            ],
            Vec::new(),
            false,
        )
    }

    #[test]
    fn test_text_layout() {
        let output = render(&scenario(), OutputFormat::Text).unwrap();

        let expected = "\
CPU Usage: 45.0%
Memory Usage: 92.0%
Disk Usage: 10.0%
Application Status: UP (HTTP 200)
ALERT: Memory Usage is above 80%
Running Processes: 212
";
        assert_eq!(output.body, expected);
        assert_eq!(output.exit_status, ExitStatus::Alert);
        assert_eq!(output.exit_status.code(), 1);
    }

    #[test]
    fn test_all_ok_exits_zero() {
        let healthy = report(
            vec![
                ok(Reading::percent(Metric::CpuUsage, 10.0)),
                Verdict::ok(Reading::http_status(200), "Application is UP"),
            ],
            Vec::new(),
            false,
        );
        let output = render(&healthy, OutputFormat::Text).unwrap();

        assert_eq!(output.exit_status.code(), 0);
        assert!(output.body.contains("Application Status: UP"));
        assert!(!output.body.contains("ALERT"));
    }

    #[test]
    fn test_unreachable_endpoint_exit_codes() {
        let err = ProbeTransportError::new(TransportKind::Connect, "Connection refused");
        let down = || {
            vec![Verdict::alert(
                Reading::unreachable(err.clone()),
                "Application is DOWN (connection failed: Connection refused)",
            )]
        };

        let relaxed = render(&report(down(), Vec::new(), false), OutputFormat::Text).unwrap();
        assert_eq!(relaxed.exit_status.code(), 1);
        assert!(relaxed
            .body
            .contains("Application Status: DOWN (connection failed: Connection refused)"));
        assert!(relaxed.body.contains("ALERT: Application is DOWN"));

        let strict = render(&report(down(), Vec::new(), true), OutputFormat::Text).unwrap();
        assert_eq!(strict.exit_status.code(), 2);
    }

    #[test]
    fn test_sampling_failures_are_rendered() {
        let failure = SamplingError::new(Metric::DiskUsage, "No such file or directory");

        let relaxed = render(&report(Vec::new(), vec![failure.clone()], false), OutputFormat::Text).unwrap();
        assert_eq!(relaxed.body, "ERROR: Disk Usage: No such file or directory\n");
        assert_eq!(relaxed.exit_status, ExitStatus::Ok);

        let mut strict = report(Vec::new(), vec![failure], true);
        strict.aborted = true;
        let strict = render(&strict, OutputFormat::Text).unwrap();
        assert!(strict.body.contains("remaining checks skipped"));
        assert_eq!(strict.exit_status, ExitStatus::Failure);
    }

    #[test]
    fn test_json_document() {
        let output = render(&scenario(), OutputFormat::Json).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&output.body).unwrap();

        assert_eq!(doc["status"], "alert");
        assert_eq!(doc["exit_code"], 1);
        assert_eq!(doc["verdicts"].as_array().unwrap().len(), 5);
        assert_eq!(doc["verdicts"][1]["metric"], "memory_usage");
        assert_eq!(doc["verdicts"][1]["status"], "alert");
        assert_eq!(doc["verdicts"][1]["reading"]["value"]["kind"], "percent");
        assert_eq!(doc["verdicts"][4]["reading"]["value"]["value"], 200);
    }
}
