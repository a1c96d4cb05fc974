// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Check results and health report aggregation
//!
//! A `CheckResult` is produced per endpoint per run; `HealthReport`
//! aggregates them into the overall verdict and summary statistics. The
//! report serializes to JSON for the invoking workflow and back for the
//! report generator.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EndpointCategory;
use crate::error::{AppError, Result};

/// Outcome of a single endpoint check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Endpoint satisfied its acceptance rule
    Passed,
    /// Acceptance rule violated: unexpected status, missing payload, or a
    /// slow probe
    Failed,
    /// Transport-level failure: DNS, connect, or timeout
    Error,
    /// Request rejected due to provider rate limiting; not an outage
    Throttled,
    /// Optional resource does not exist; not a failure
    Absent,
}

impl CheckOutcome {
    /// Whether this outcome counts against the error rate
    #[must_use]
    pub fn is_hard_failure(self) -> bool {
        matches!(self, CheckOutcome::Failed | CheckOutcome::Error)
    }

    /// Uppercase label used in the text rendering
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CheckOutcome::Passed => "PASSED",
            CheckOutcome::Failed => "FAILED",
            CheckOutcome::Error => "ERROR",
            CheckOutcome::Throttled => "THROTTLED",
            CheckOutcome::Absent => "ABSENT",
        }
    }
}

/// Result of a single endpoint check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub endpoint: String,
    pub category: EndpointCategory,
    pub outcome: CheckOutcome,
    /// Observed latency, seconds
    pub response_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregated result of one monitoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub generated_at: DateTime<Utc>,
    pub healthy: bool,
    pub summary: String,
    pub total: usize,
    pub passed: usize,
    /// Hard failures: assertion failures plus transport errors
    pub failed: usize,
    pub throttled: usize,
    pub absent: usize,
    /// Hard failures ÷ total endpoints; 0.0 for an empty set
    pub error_rate: f64,
    /// Mean observed latency across all checks, seconds
    pub avg_response_time: f64,
    pub results: Vec<CheckResult>,
}

impl HealthReport {
    /// Aggregates per-endpoint results into the overall verdict
    ///
    /// The verdict is failure iff any hard failure exists or the error
    /// rate exceeds `max_error_rate`. Throttled and absent outcomes never
    /// count toward the error rate, so an empty endpoint set is a vacuous
    /// pass.
    #[must_use]
    pub fn from_results(results: Vec<CheckResult>, max_error_rate: f64) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Passed)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.outcome.is_hard_failure())
            .count();
        let throttled = results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Throttled)
            .count();
        let absent = results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Absent)
            .count();

        let error_rate = if total == 0 {
            0.0
        } else {
            failed as f64 / total as f64
        };
        let avg_response_time = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.response_time).sum::<f64>() / total as f64
        };

        let healthy = failed == 0 && error_rate <= max_error_rate;

        let mut summary_parts = vec![format!("Checked {total} endpoints: {passed} healthy")];
        if failed > 0 {
            summary_parts.push(format!("{failed} failed"));
        }
        if throttled > 0 {
            summary_parts.push(format!("{throttled} throttled"));
        }
        if absent > 0 {
            summary_parts.push(format!("{absent} absent"));
        }
        let summary = summary_parts.join(", ");

        HealthReport {
            generated_at: Utc::now(),
            healthy,
            summary,
            total,
            passed,
            failed,
            throttled,
            absent,
            error_rate,
            avg_response_time,
            results,
        }
    }

    /// Renders the human-readable run summary printed to stdout
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Health Check Summary: {}\n", self.summary));

        if !self.results.is_empty() {
            out.push_str("\nDetailed results:\n");
            for result in &self.results {
                let status = match result.status_code {
                    Some(code) => format!("HTTP {code}"),
                    None => "no response".to_string(),
                };
                out.push_str(&format!(
                    "  {} [{}] {} in {:.3}s ({})\n",
                    result.endpoint,
                    result.category,
                    result.outcome.label(),
                    result.response_time,
                    status
                ));
                if let Some(reason) = &result.reason {
                    out.push_str(&format!("      {reason}\n"));
                }
            }
        }

        let verdict = if self.healthy {
            "ALL HEALTH CHECKS PASSED"
        } else {
            "HEALTH CHECK FAILED"
        };
        out.push_str(&format!("\n{verdict}: {}\n", self.summary));
        out
    }

    /// Writes the report as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a previously written report back from JSON
    ///
    /// # Errors
    ///
    /// Returns `AppError::Report` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Report(format!("cannot read report file '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Report(format!("invalid report file '{}': {e}", path.display()))
        })
    }
}
