// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Monitoring report generator
//!
//! Renders a human-readable markdown monitoring report from a previously
//! written health report, plus benchmark and drift report files when the
//! sibling automation has produced them. Missing or unreadable inputs
//! degrade to an empty section instead of failing the run; the report is
//! meant to be attached to a tracking issue even when data is partial.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use sysinfo::{Disks, System};

use crate::error::Result;
use crate::report::HealthReport;

/// Cadence of the invoking workflow, reflected in the report header
const MONITORING_PERIOD: &str = "6 hours";

/// Resource usage above this percentage gets a warning line
const RESOURCE_WARN_PERCENT: f64 = 90.0;

/// Input paths and switches for one report generation
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub health_path: PathBuf,
    pub benchmark_path: PathBuf,
    pub drift_path: PathBuf,
    /// Include host CPU/memory/disk status
    pub include_system: bool,
}

/// Generates the full markdown report
///
/// # Errors
///
/// Currently infallible in practice (inputs degrade to empty sections),
/// but kept fallible so callers treat generation uniformly with the file
/// write that follows.
pub fn generate(options: &ReportOptions) -> Result<String> {
    let health = load_health(&options.health_path);
    let benchmark = load_value(&options.benchmark_path, "benchmark");
    let drift = load_value(&options.drift_path, "drift");

    let mut sections = Vec::new();

    sections.push(format!(
        "# AI Model Monitoring Report\n\n**Generated:** {}\n**Monitoring Period:** Last {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        MONITORING_PERIOD
    ));

    if options.include_system {
        sections.push(system_status());
    }
    sections.push(model_status(health.as_ref()));
    sections.push(benchmark_section(benchmark.as_ref()));
    sections.push(drift_section(drift.as_ref()));
    sections.push(recommendations(
        health.as_ref(),
        benchmark.as_ref(),
        drift.as_ref(),
    ));

    sections.push(
        "---\n\n*This report was generated automatically by the monitoring toolchain.*\n"
            .to_string(),
    );

    Ok(sections.join("\n"))
}

/// Loads the health report, tolerating a missing or unreadable file
fn load_health(path: &Path) -> Option<HealthReport> {
    if !path.exists() {
        tracing::debug!("No health report at '{}'", path.display());
        return None;
    }
    match HealthReport::from_json_file(path) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!("Could not read health report: {e}");
            None
        }
    }
}

/// Loads a loosely-typed sibling report (benchmark or drift data)
fn load_value(path: &Path, kind: &str) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Could not read {kind} report '{}': {e}", path.display());
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Could not parse {kind} report '{}': {e}", path.display());
            None
        }
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}

/// Host resource section (the original used psutil for the same three
/// gauges)
fn system_status() -> String {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut lines = vec!["## System Health Overview".to_string(), String::new()];

    let cpu = f64::from(sys.global_cpu_info().cpu_usage());
    let mem_used = sys.used_memory();
    let mem_total = sys.total_memory();
    let mem_percent = percent(mem_used, mem_total);

    lines.push(format!("**CPU Usage:** {cpu:.1}%"));
    lines.push(format!(
        "**Memory Usage:** {:.1}% ({:.1}GB / {:.1}GB)",
        mem_percent,
        gib(mem_used),
        gib(mem_total)
    ));

    let disks = Disks::new_with_refreshed_list();
    for disk in disks.list() {
        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        lines.push(format!(
            "**Disk Usage ({}):** {:.1}% ({:.1}GB / {:.1}GB)",
            disk.mount_point().display(),
            percent(used, total),
            gib(used),
            gib(total)
        ));
    }
    lines.push(String::new());

    if cpu > RESOURCE_WARN_PERCENT {
        lines.push("**High CPU usage detected**".to_string());
    }
    if mem_percent > RESOURCE_WARN_PERCENT {
        lines.push("**High memory usage detected**".to_string());
    }
    lines.push(String::new());

    lines.join("\n")
}

fn model_status(health: Option<&HealthReport>) -> String {
    let mut lines = vec!["## AI Model Status".to_string(), String::new()];

    let Some(report) = health else {
        lines.push("No model health data available.".to_string());
        lines.push(String::new());
        return lines.join("\n");
    };

    if report.healthy {
        lines.push("**All monitored endpoints are healthy**".to_string());
    } else {
        lines.push("**Issues detected with one or more endpoints**".to_string());
    }
    lines.push(format!("**Summary:** {}", report.summary));
    lines.push(String::new());

    lines.push("### Endpoint Details".to_string());
    lines.push(String::new());
    lines.push("| Endpoint | Category | Outcome | Response Time | Details |".to_string());
    lines.push("|----------|----------|---------|---------------|---------|".to_string());

    for result in &report.results {
        let details = result.reason.as_deref().unwrap_or("");
        lines.push(format!(
            "| {} | {} | {} | {:.3}s | {} |",
            short_endpoint_name(&result.endpoint),
            result.category,
            result.outcome.label(),
            result.response_time,
            details
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "**Error rate:** {:.1}% — **average latency:** {:.3}s",
        report.error_rate * 100.0,
        report.avg_response_time
    ));
    lines.push(String::new());

    lines.join("\n")
}

/// Strips the scheme and path so the table stays narrow
fn short_endpoint_name(endpoint: &str) -> &str {
    let stripped = endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    stripped.split('/').next().unwrap_or(stripped)
}

fn benchmark_section(benchmark: Option<&Value>) -> String {
    let mut lines = vec!["## Performance Benchmarks".to_string(), String::new()];

    let Some(data) = benchmark else {
        lines.push("No benchmark data available.".to_string());
        lines.push(String::new());
        return lines.join("\n");
    };

    if let Some(summary) = data.get("summary").and_then(Value::as_str) {
        lines.push(format!("**Latest Results:** {summary}"));
        lines.push(String::new());
    }

    if let Some(benchmarks) = data.get("benchmarks").and_then(Value::as_array) {
        lines.push("| Model | Metric | Value | Baseline | Status |".to_string());
        lines.push("|-------|--------|-------|----------|--------|".to_string());
        for entry in benchmarks {
            let field = |key: &str| {
                entry
                    .get(key)
                    .map(render_scalar)
                    .unwrap_or_else(|| "N/A".to_string())
            };
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                field("model"),
                field("metric"),
                field("value"),
                field("baseline"),
                field("status")
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn drift_section(drift: Option<&Value>) -> String {
    let mut lines = vec!["## Model Drift Detection".to_string(), String::new()];

    let Some(data) = drift else {
        lines.push("No drift detection data available.".to_string());
        lines.push(String::new());
        return lines.join("\n");
    };

    match data.get("drift_detected").and_then(Value::as_bool) {
        Some(true) => {
            lines.push("**Model drift detected** — performance has deviated from baseline; consider retraining.".to_string());
        }
        Some(false) => lines.push("**No significant drift detected**".to_string()),
        None => {}
    }
    lines.push(String::new());

    if let Some(metrics) = data.get("drift_metrics").and_then(Value::as_object) {
        lines.push("### Drift Metrics".to_string());
        lines.push(String::new());
        for (metric, details) in metrics {
            let field = |key: &str| {
                details
                    .get(key)
                    .map(render_scalar)
                    .unwrap_or_else(|| "N/A".to_string())
            };
            lines.push(format!(
                "**{metric}:** {} (threshold: {}) - {}",
                field("current_value"),
                field("threshold"),
                field("status")
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn recommendations(
    health: Option<&HealthReport>,
    benchmark: Option<&Value>,
    drift: Option<&Value>,
) -> String {
    let mut lines = vec!["## Recommendations".to_string(), String::new()];

    if health.is_some_and(|h| !h.healthy) {
        lines.push("### Immediate Actions Required".to_string());
        lines.push("- Investigate failed endpoints listed above".to_string());
        lines.push("- Check network connectivity and service status".to_string());
        lines.push("- Review error logs for detailed failure information".to_string());
        lines.push(String::new());
    }

    if benchmark.is_some() {
        lines.push("### Performance".to_string());
        lines.push("- Monitor response times for slow endpoints".to_string());
        lines.push("- Review inference optimization opportunities".to_string());
        lines.push(String::new());
    }

    if drift
        .and_then(|d| d.get("drift_detected"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        lines.push("### Model Updates".to_string());
        lines.push("- Schedule retraining with latest data".to_string());
        lines.push("- Update baselines after retraining".to_string());
        lines.push(String::new());
    }

    lines.push("### General Maintenance".to_string());
    lines.push("- Review and update monitoring thresholds as needed".to_string());
    lines.push("- Keep dependencies and security patches current".to_string());
    lines.push(String::new());

    lines.join("\n")
}

/// Renders a JSON scalar for a markdown cell without quoting strings
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointCategory;
    use crate::report::{CheckOutcome, CheckResult};

    fn sample_report(healthy: bool) -> HealthReport {
        let outcome = if healthy {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed
        };
        HealthReport::from_results(
            vec![CheckResult {
                endpoint: "https://models.example.com/predict".to_string(),
                category: EndpointCategory::Model,
                outcome,
                response_time: 0.2,
                status_code: Some(200),
                reason: None,
            }],
            0.05,
        )
    }

    #[test]
    fn test_model_status_without_data() {
        let section = model_status(None);
        assert!(section.contains("No model health data available."));
    }

    #[test]
    fn test_model_status_healthy() {
        let report = sample_report(true);
        let section = model_status(Some(&report));
        assert!(section.contains("All monitored endpoints are healthy"));
        assert!(section.contains("models.example.com"));
        assert!(section.contains("PASSED"));
    }

    #[test]
    fn test_model_status_unhealthy() {
        let report = sample_report(false);
        let section = model_status(Some(&report));
        assert!(section.contains("Issues detected"));
    }

    #[test]
    fn test_short_endpoint_name_strips_scheme_and_path() {
        assert_eq!(
            short_endpoint_name("https://models.example.com/v1/predict"),
            "models.example.com"
        );
        assert_eq!(short_endpoint_name("http://host:8000"), "host:8000");
    }

    #[test]
    fn test_benchmark_section_renders_table() {
        let data = serde_json::json!({
            "summary": "all within baseline",
            "benchmarks": [
                {"model": "m1", "metric": "p50_latency", "value": 0.12, "baseline": 0.15, "status": "ok"}
            ]
        });
        let section = benchmark_section(Some(&data));
        assert!(section.contains("all within baseline"));
        assert!(section.contains("| m1 | p50_latency | 0.12 | 0.15 | ok |"));
    }

    #[test]
    fn test_drift_section_flags_detected_drift() {
        let data = serde_json::json!({"drift_detected": true});
        let section = drift_section(Some(&data));
        assert!(section.contains("Model drift detected"));
    }

    #[test]
    fn test_recommendations_include_immediate_actions_when_unhealthy() {
        let report = sample_report(false);
        let section = recommendations(Some(&report), None, None);
        assert!(section.contains("Immediate Actions Required"));
    }

    #[test]
    fn test_recommendations_skip_immediate_actions_when_healthy() {
        let report = sample_report(true);
        let section = recommendations(Some(&report), None, None);
        assert!(!section.contains("Immediate Actions Required"));
        assert!(section.contains("General Maintenance"));
    }

    #[test]
    fn test_generate_with_missing_inputs_succeeds() {
        let options = ReportOptions {
            health_path: PathBuf::from("does-not-exist-health.json"),
            benchmark_path: PathBuf::from("does-not-exist-benchmark.json"),
            drift_path: PathBuf::from("does-not-exist-drift.json"),
            include_system: false,
        };
        let markdown = generate(&options).unwrap();
        assert!(markdown.contains("# AI Model Monitoring Report"));
        assert!(markdown.contains("No model health data available."));
        assert!(markdown.contains("No benchmark data available."));
        assert!(markdown.contains("No drift detection data available."));
    }
}
