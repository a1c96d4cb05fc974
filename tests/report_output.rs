// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::io::Write;
use std::path::PathBuf;

use model_healthcheck::reportgen::{self, ReportOptions};
use model_healthcheck::{CheckOutcome, CheckResult, EndpointCategory, HealthReport, MonitoringConfig};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn sample_results() -> Vec<CheckResult> {
    vec![
        CheckResult {
            endpoint: "https://models.example.com/predict".to_string(),
            category: EndpointCategory::Model,
            outcome: CheckOutcome::Passed,
            response_time: 0.12,
            status_code: Some(200),
            reason: None,
        },
        CheckResult {
            endpoint: "https://org.github.io".to_string(),
            category: EndpointCategory::Pages,
            outcome: CheckOutcome::Throttled,
            response_time: 0.05,
            status_code: Some(429),
            reason: Some("rate limited by provider (status 429)".to_string()),
        },
        CheckResult {
            endpoint: "https://api.github.com/repos/org/gone".to_string(),
            category: EndpointCategory::Api,
            outcome: CheckOutcome::Absent,
            response_time: 0.07,
            status_code: Some(404),
            reason: Some("resource not found".to_string()),
        },
    ]
}

// --- configuration file loading ---

#[test]
fn config_loads_from_file() {
    let file = write_temp(
        r#"{
            "model_endpoints": ["https://models.example.com/predict"],
            "github_api_endpoints": ["https://api.github.com/orgs/acme"],
            "expected_response_time": 1.0,
            "timeout": 5
        }"#,
    );

    let config = MonitoringConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.model_endpoints.len(), 1);
    assert_eq!(config.github_api_endpoints.len(), 1);
    assert_eq!(config.expected_response_time, 1.0);
    assert_eq!(config.timeout, 5);
    // Unlisted fields keep their defaults
    assert_eq!(config.max_error_rate, 0.05);
}

#[test]
fn config_missing_file_is_an_error() {
    let path = PathBuf::from("/nonexistent/monitoring.json");
    assert!(MonitoringConfig::load(Some(&path)).is_err());
}

#[test]
fn config_malformed_json_is_an_error() {
    let file = write_temp("{ this is not json");
    assert!(MonitoringConfig::load(Some(file.path())).is_err());
}

#[test]
fn config_missing_required_field_is_an_error() {
    let file = write_temp(r#"{"github_pages_endpoints": []}"#);
    assert!(MonitoringConfig::load(Some(file.path())).is_err());
}

#[test]
fn config_unknown_field_is_an_error() {
    let file = write_temp(r#"{"model_endpoints": [], "model_endpoint": []}"#);
    assert!(MonitoringConfig::load(Some(file.path())).is_err());
}

#[test]
fn config_invalid_url_scheme_is_an_error() {
    let file = write_temp(r#"{"model_endpoints": ["not-a-url"]}"#);
    assert!(MonitoringConfig::load(Some(file.path())).is_err());
}

// --- report round-trip ---

#[test]
fn report_file_round_trip_preserves_verdict_and_outcomes() {
    let report = HealthReport::from_results(sample_results(), 0.05);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("health_report.json");

    report.write_json(&path).unwrap();
    let parsed = HealthReport::from_json_file(&path).unwrap();

    assert_eq!(parsed.healthy, report.healthy);
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.total, report.total);
    assert_eq!(parsed.error_rate, report.error_rate);

    let outcomes: Vec<_> = parsed.results.iter().map(|r| r.outcome).collect();
    let expected: Vec<_> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, expected);

    let endpoints: Vec<_> = parsed.results.iter().map(|r| r.endpoint.clone()).collect();
    let expected: Vec<_> = report.results.iter().map(|r| r.endpoint.clone()).collect();
    assert_eq!(endpoints, expected);
}

#[test]
fn report_outcomes_serialize_as_snake_case() {
    let report = HealthReport::from_results(sample_results(), 0.05);
    let json = serde_json::to_string(&report).unwrap();

    assert!(json.contains("\"passed\""));
    assert!(json.contains("\"throttled\""));
    assert!(json.contains("\"absent\""));
    assert!(json.contains("\"category\":\"model\""));
}

#[test]
fn report_from_unreadable_file_is_an_error() {
    let path = PathBuf::from("/nonexistent/health_report.json");
    assert!(HealthReport::from_json_file(&path).is_err());
}

// --- markdown report generation ---

#[test]
fn markdown_report_reflects_health_report_contents() {
    let report = HealthReport::from_results(sample_results(), 0.05);
    let dir = tempfile::tempdir().unwrap();
    let health_path = dir.path().join("health_report.json");
    report.write_json(&health_path).unwrap();

    let options = ReportOptions {
        health_path,
        benchmark_path: dir.path().join("missing_benchmark.json"),
        drift_path: dir.path().join("missing_drift.json"),
        include_system: false,
    };

    let markdown = reportgen::generate(&options).unwrap();

    assert!(markdown.contains("# AI Model Monitoring Report"));
    assert!(markdown.contains("models.example.com"));
    assert!(markdown.contains("THROTTLED"));
    assert!(markdown.contains("No benchmark data available."));
}

#[test]
fn markdown_report_tolerates_corrupt_health_data() {
    let file = write_temp("{ not a report");

    let options = ReportOptions {
        health_path: file.path().to_path_buf(),
        benchmark_path: PathBuf::from("missing_benchmark.json"),
        drift_path: PathBuf::from("missing_drift.json"),
        include_system: false,
    };

    let markdown = reportgen::generate(&options).unwrap();
    assert!(markdown.contains("No model health data available."));
}
