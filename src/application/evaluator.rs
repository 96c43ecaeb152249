use crate::domain::{Reading, ReadingValue, Thresholds, Verdict};

const HEALTHY_STATUS: u16 = 200;

/// Classify a reading against the configured limits.
///
/// Utilization alerts only when strictly above its limit. The endpoint is
/// healthy only on HTTP 200. Process count never alerts.
pub fn evaluate(reading: &Reading, thresholds: &Thresholds) -> Verdict {
    let label = reading.metric.label();

    let (alert, message) = match &reading.value {
        ReadingValue::Percent(value) => match thresholds.limit(reading.metric) {
            Some(limit) if *value > limit => (true, format!("{} is above {}%", label, limit)),
            Some(limit) => (false, format!("{} is within {}%", label, limit)),
            None => (false, format!("{} has no threshold", label)),
        },
        ReadingValue::Count(count) => (false, format!("{}: {}", label, count)),
        ReadingValue::HttpStatus(HEALTHY_STATUS) => (false, "Application is UP".to_string()),
        ReadingValue::HttpStatus(code) => (true, format!("Application is DOWN (HTTP {})", code)),
        ReadingValue::Unreachable(err) => (true, format!("Application is DOWN ({})", err)),
    };

    if alert {
        Verdict::alert(reading.clone(), message)
    } else {
        Verdict::ok(reading.clone(), message)
    }
}
