use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use model_healthcheck::cli::{CheckArgs, Cli, Commands, ReportArgs};
use model_healthcheck::reportgen::{self, ReportOptions};
use model_healthcheck::{HealthChecker, HealthReport, MonitoringConfig, Result};

#[tokio::main]
async fn main() -> ExitCode {
    // Загружаем .env файл
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Инициализация логирования
    setup_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Check(args)) => run_check(&args).await,
        Some(Commands::Report(args)) => run_report(&args),
        None => run_check(&CheckArgs::default()).await,
    }
}

async fn run_check(args: &CheckArgs) -> ExitCode {
    let report = match collect_report(args).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Health check setup failed: {}", e);
            return ExitCode::from(2);
        }
    };

    // Отчёт идёт в stdout, логи — в stderr
    print!("{}", report.render_text());

    if report.healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

async fn collect_report(args: &CheckArgs) -> Result<HealthReport> {
    let config = MonitoringConfig::load(args.config.as_deref())?;

    tracing::info!(
        "Loaded configuration for {} endpoint(s): {} model, {} pages, {} api",
        config.endpoint_count(),
        config.model_endpoints.len(),
        config.github_pages_endpoints.len(),
        config.github_api_endpoints.len()
    );

    let checker = HealthChecker::new(config)?;
    let report = checker.run().await;

    if let Some(path) = &args.output {
        report.write_json(path)?;
        tracing::info!("Wrote JSON report to {}", path.display());
    }

    Ok(report)
}

fn run_report(args: &ReportArgs) -> ExitCode {
    let options = ReportOptions {
        health_path: args.health.clone(),
        benchmark_path: args.benchmark.clone(),
        drift_path: args.drift.clone(),
        include_system: !args.no_system,
    };

    let written = reportgen::generate(&options)
        .and_then(|markdown| std::fs::write(&args.output, markdown).map_err(Into::into));

    match written {
        Ok(()) => {
            tracing::info!("Monitoring report generated: {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to generate monitoring report: {}", e);
            ExitCode::from(2)
        }
    }
}

fn setup_tracing(verbose: bool) {
    // Используем EnvFilter для правильной обработки RUST_LOG
    // Флаг --verbose принудительно включает debug
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
