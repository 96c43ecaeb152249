mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{HttpProber, ProcfsConfig, ProcfsResourceSource};
use application::{CheckSettings, HealthCheckService, ResourceSampler};
use config::{Cli, Config};
use interface::{render, ExitStatus, OutputFormat};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::load(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("healthprobe: {}", e);
            return ExitCode::from(ExitStatus::Failure.code());
        }
    };

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("healthprobe={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Configuration: {:?}", config);

    ExitCode::from(run(config).await.code())
}

async fn run(config: Config) -> ExitStatus {
    let prober = match HttpProber::new() {
        Ok(prober) => prober,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitStatus::Failure;
        }
    };

    let source = ProcfsResourceSource::new(ProcfsConfig::new(config.proc_path.clone()));
    let sampler = ResourceSampler::new(Arc::new(source), config.disk_path.clone(), config.cpu_window);
    let service = HealthCheckService::new(
        sampler,
        Arc::new(prober),
        CheckSettings {
            thresholds: config.thresholds,
            url: config.url.clone(),
            timeout: config.timeout,
            strict: config.strict,
        },
    );

    match config.interval {
        None => {
            let report = service.run_cycle().await;
            print_report(&report, config.format)
        }
        Some(interval) => watch(&service, interval, config.format, shutdown_signal()).await,
    }
}

/// Run cycles every `interval` until `shutdown` resolves.
///
/// Returns the status of the last completed cycle; nothing completed counts
/// as healthy.
async fn watch(
    service: &HealthCheckService,
    interval: Duration,
    format: OutputFormat,
    shutdown: impl Future<Output = ()>,
) -> ExitStatus {
    info!("Watching every {}s, Ctrl-C to stop", interval.as_secs());
    tokio::pin!(shutdown);

    let mut last = ExitStatus::Ok;
    loop {
        tokio::select! {
            report = service.run_cycle() => last = print_report(&report, format),
            _ = &mut shutdown => break,
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut shutdown => break,
        }
    }
    last
}

fn print_report(report: &application::Report, format: OutputFormat) -> ExitStatus {
    match render(report, format) {
        Ok(output) => {
            print!("{}", output.body);
            if format == OutputFormat::Json {
                println!();
            }
            output.exit_status
        }
        Err(e) => {
            error!("Failed to render report: {}", e);
            ExitStatus::Failure
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM. Dropping an in-flight cycle aborts its probe.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, stopping"),
        _ = terminate => info!("Received SIGTERM, stopping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::time::Instant;

    use reqwest::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::Thresholds;

    async fn endpoint(status: u16, delay: Duration) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .mount(&server)
            .await;
        server
    }

    fn service(proc_dir: &tempfile::TempDir, server: &MockServer, timeout: Duration) -> HealthCheckService {
        fs::write(proc_dir.path().join("stat"), "cpu  100 0 100 800 0 0 0 0\n").unwrap();
        fs::write(proc_dir.path().join("meminfo"), "MemTotal: 1000 kB\nMemAvailable: 900 kB\n").unwrap();

        let source = ProcfsResourceSource::new(ProcfsConfig::new(proc_dir.path()));
        let sampler = ResourceSampler::new(Arc::new(source), proc_dir.path(), Duration::from_millis(1));
        HealthCheckService::new(
            sampler,
            Arc::new(HttpProber::new().unwrap()),
            CheckSettings {
                // disk usage of the test machine must not matter
                thresholds: Thresholds::new(80.0, 80.0, 100.0),
                url: Url::parse(&server.uri()).unwrap(),
                timeout,
                strict: false,
            },
        )
    }

    #[tokio::test]
    async fn test_watch_cancels_in_flight_cycle() {
        let server = endpoint(200, Duration::from_secs(10)).await;
        let proc_dir = tempfile::tempdir().unwrap();
        let service = service(&proc_dir, &server, Duration::from_secs(10));

        let start = Instant::now();
        let status = watch(
            &service,
            Duration::from_secs(1),
            OutputFormat::Text,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await;

        assert!(start.elapsed() < Duration::from_secs(3));
        assert_eq!(status, ExitStatus::Ok);
    }

    #[tokio::test]
    async fn test_watch_keeps_last_completed_status() {
        let server = endpoint(503, Duration::ZERO).await;
        let proc_dir = tempfile::tempdir().unwrap();
        let service = service(&proc_dir, &server, Duration::from_secs(5));

        let start = Instant::now();
        let status = watch(
            &service,
            Duration::from_secs(10),
            OutputFormat::Text,
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await;

        assert!(start.elapsed() < Duration::from_secs(3));
        assert_eq!(status, ExitStatus::Alert);
    }
}
