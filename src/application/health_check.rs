use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::{info, warn};

use crate::domain::{SamplingError, Thresholds, Verdict};
use crate::ports::EndpointProbe;

use super::evaluator::evaluate;
use super::sampler::ResourceSampler;

/// Settings that stay fixed for every cycle of a run
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub thresholds: Thresholds,
    pub url: Url,
    pub timeout: Duration,
    pub strict: bool,
}

/// Everything a single check cycle found
#[derive(Debug, Clone)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub verdicts: Vec<Verdict>,
    pub failures: Vec<SamplingError>,
    pub strict: bool,
    /// Checks were cut short by a strict-mode failure
    pub aborted: bool,
}

impl Report {
    /// A strict run treats unreadable counters and unreachable endpoints as
    /// hard failures.
    pub fn has_strict_failure(&self) -> bool {
        self.strict
            && (!self.failures.is_empty()
                || self.verdicts.iter().any(|v| v.reading.transport_error().is_some()))
    }

    pub fn alert_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_alert()).count()
    }
}

/// Main application service: one pass of sampling, probing and evaluation
pub struct HealthCheckService {
    sampler: ResourceSampler,
    prober: Arc<dyn EndpointProbe>,
    settings: CheckSettings,
}

impl HealthCheckService {
    pub fn new(sampler: ResourceSampler, prober: Arc<dyn EndpointProbe>, settings: CheckSettings) -> Self {
        Self {
            sampler,
            prober,
            settings,
        }
    }

    /// Run every check once. Nothing is carried over between calls.
    pub async fn run_cycle(&self) -> Report {
        let settings = &self.settings;
        info!(url = %settings.url, strict = settings.strict, "starting check cycle");

        let sample = self.sampler.sample(settings.strict).await;
        let mut readings = sample.readings;

        if sample.aborted {
            warn!("strict mode: skipping endpoint probe after sampling failure");
        } else {
            readings.push(self.prober.probe(&settings.url, settings.timeout).await);
        }

        let verdicts: Vec<Verdict> = readings
            .iter()
            .map(|reading| evaluate(reading, &settings.thresholds))
            .collect();

        let report = Report {
            timestamp: Utc::now(),
            verdicts,
            failures: sample.failures,
            strict: settings.strict,
            aborted: sample.aborted,
        };

        info!(
            alerts = report.alert_count(),
            failures = report.failures.len(),
            "check cycle finished"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use async_trait::async_trait;

    use crate::domain::verdict::Status;
    use crate::domain::{DiskUsage, Metric, ProbeTransportError, Reading, TransportKind};
    use crate::ports::{CpuTimes, MemoryInfo, ResourceSource, SourceResult};

    /// Host with fixed utilization; CPU ticks advance so each window reads `cpu`%
    struct StaticHost {
        cpu: u64,
        memory: u64,
        disk: u64,
        memory_readable: bool,
        calls: std::sync::atomic::AtomicU64,
    }

    impl StaticHost {
        fn new(cpu: u64, memory: u64, disk: u64) -> Self {
            Self {
                cpu,
                memory,
                disk,
                memory_readable: true,
                calls: Default::default(),
            }
        }
    }

    #[async_trait]
    impl ResourceSource for StaticHost {
        async fn cpu_times(&self) -> SourceResult<CpuTimes> {
            let n = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(CpuTimes {
                busy: n * self.cpu,
                idle: n * (100 - self.cpu),
            })
        }

        async fn memory_info(&self) -> SourceResult<MemoryInfo> {
            if !self.memory_readable {
                return Err("permission denied".into());
            }
            Ok(MemoryInfo {
                total_bytes: 100,
                available_bytes: 100 - self.memory,
            })
        }

        async fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsage> {
            Ok(DiskUsage::new(path, 100, self.disk, 100 - self.disk))
        }

        async fn process_count(&self) -> SourceResult<u64> {
            Ok(42)
        }
    }

    /// Endpoint answering with a fixed reading
    struct FixedEndpoint(Option<u16>);

    #[async_trait]
    impl EndpointProbe for FixedEndpoint {
        async fn probe(&self, _url: &Url, _timeout: Duration) -> Reading {
            match self.0 {
                Some(code) => Reading::http_status(code),
                None => Reading::unreachable(ProbeTransportError::new(
                    TransportKind::Connect,
                    "Connection refused (os error 111)",
                )),
            }
        }
    }

    fn service(host: StaticHost, endpoint: FixedEndpoint, strict: bool) -> HealthCheckService {
        let sampler = ResourceSampler::new(Arc::new(host), "/", Duration::ZERO);
        let settings = CheckSettings {
            thresholds: Thresholds::default(),
            url: Url::parse("http://localhost:5000").unwrap(),
            timeout: Duration::from_secs(5),
            strict,
        };
        HealthCheckService::new(sampler, Arc::new(endpoint), settings)
    }

    fn status_of(report: &Report, metric: Metric) -> Status {
        report
            .verdicts
            .iter()
            .find(|v| v.metric == metric)
            .map(|v| v.status)
            .unwrap()
    }

    #[tokio::test]
    async fn test_memory_over_threshold_alerts() {
        let report = service(StaticHost::new(45, 92, 10), FixedEndpoint(Some(200)), false)
            .run_cycle()
            .await;

        assert_eq!(status_of(&report, Metric::CpuUsage), Status::Ok);
        assert_eq!(status_of(&report, Metric::MemoryUsage), Status::Alert);
        assert_eq!(status_of(&report, Metric::DiskUsage), Status::Ok);
        assert_eq!(status_of(&report, Metric::EndpointStatus), Status::Ok);
        assert_eq!(report.alert_count(), 1);
        assert!(!report.has_strict_failure());
    }

    #[tokio::test]
    async fn test_probe_runs_after_host_metrics() {
        let report = service(StaticHost::new(10, 10, 10), FixedEndpoint(Some(503)), false)
            .run_cycle()
            .await;

        let metrics: Vec<Metric> = report.verdicts.iter().map(|v| v.metric).collect();
        assert_eq!(
            metrics,
            vec![
                Metric::CpuUsage,
                Metric::MemoryUsage,
                Metric::DiskUsage,
                Metric::ProcessCount,
                Metric::EndpointStatus,
            ]
        );
        assert_eq!(status_of(&report, Metric::EndpointStatus), Status::Alert);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_strict_failure_only_in_strict_mode() {
        let relaxed = service(StaticHost::new(10, 10, 10), FixedEndpoint(None), false)
            .run_cycle()
            .await;
        assert_eq!(status_of(&relaxed, Metric::EndpointStatus), Status::Alert);
        assert!(!relaxed.has_strict_failure());

        let strict = service(StaticHost::new(10, 10, 10), FixedEndpoint(None), true)
            .run_cycle()
            .await;
        assert!(strict.has_strict_failure());
    }

    #[tokio::test]
    async fn test_strict_sampling_failure_skips_probe() {
        let host = StaticHost {
            memory_readable: false,
            ..StaticHost::new(10, 10, 10)
        };
        let report = service(host, FixedEndpoint(Some(200)), true).run_cycle().await;

        assert!(report.aborted);
        assert!(report.has_strict_failure());
        assert!(report.verdicts.iter().all(|v| v.metric != Metric::EndpointStatus));
    }
}
