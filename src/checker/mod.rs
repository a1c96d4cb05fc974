// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Health check orchestration
//!
//! Dispatches bounded-concurrency checks over the configured endpoint
//! list and aggregates the per-endpoint results into a `HealthReport`.
//! A failing endpoint never aborts the run; transport errors land in that
//! endpoint's result.

mod api;
mod model;
mod pages;

use std::time::Duration;

use futures_util::{StreamExt, stream};
use reqwest::Client;

use crate::config::{EndpointCategory, EndpointTarget, MonitoringConfig};
use crate::error::Result;
use crate::report::{CheckOutcome, CheckResult, HealthReport};

/// Maximum number of endpoint checks in flight at once
///
/// Bounded to respect target-side rate limits; checks are otherwise
/// independent.
const MAX_CONCURRENT_CHECKS: usize = 8;

/// Health checker for one monitoring run
///
/// Owns the immutable monitoring configuration and a shared HTTP client
/// carrying the global per-request timeout.
pub struct HealthChecker {
    config: MonitoringConfig,
    client: Client,
}

impl HealthChecker {
    /// Creates a checker for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: MonitoringConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { config, client })
    }

    /// Runs every configured check and aggregates the results
    ///
    /// Checks run concurrently up to `MAX_CONCURRENT_CHECKS`; result order
    /// matches configuration order regardless of completion order.
    pub async fn run(&self) -> HealthReport {
        let targets = self.config.targets();
        tracing::info!("Running health checks for {} endpoint(s)", targets.len());

        let results: Vec<CheckResult> = stream::iter(targets)
            .map(|target| self.check_target(target))
            .buffered(MAX_CONCURRENT_CHECKS)
            .collect()
            .await;

        HealthReport::from_results(results, self.config.max_error_rate)
    }

    async fn check_target(&self, target: EndpointTarget) -> CheckResult {
        tracing::debug!("Checking {} endpoint: {}", target.category, target.url);

        let result = match target.category {
            EndpointCategory::Model => model::check(&self.client, &self.config, &target).await,
            EndpointCategory::Pages => pages::check(&self.client, &target).await,
            EndpointCategory::Api => api::check(&self.client, &target).await,
        };

        match result.outcome {
            CheckOutcome::Passed => tracing::debug!(
                "Endpoint {} passed in {:.3}s",
                result.endpoint,
                result.response_time
            ),
            CheckOutcome::Throttled | CheckOutcome::Absent => tracing::info!(
                "Endpoint {} reported {}: {}",
                result.endpoint,
                result.outcome.label(),
                result.reason.as_deref().unwrap_or("no reason")
            ),
            CheckOutcome::Failed | CheckOutcome::Error => tracing::warn!(
                "Endpoint {} failed in {:.3}s: {}",
                result.endpoint,
                result.response_time,
                result.reason.as_deref().unwrap_or("no reason")
            ),
        }

        result
    }
}

/// Maps a transport failure onto a per-endpoint reason string
pub(super) fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Builds the result for a request that never produced a response
pub(super) fn transport_failure(
    target: &EndpointTarget,
    elapsed: f64,
    err: &reqwest::Error,
) -> CheckResult {
    CheckResult {
        endpoint: target.url.clone(),
        category: target.category,
        outcome: CheckOutcome::Error,
        response_time: elapsed,
        status_code: None,
        reason: Some(transport_reason(err)),
    }
}
