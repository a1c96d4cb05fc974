// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Model endpoint checks
//!
//! A model endpoint is probed in two stages: a `GET {base}/health` probe
//! that must return 200 within the configured latency threshold, then one
//! prediction request per configured test query, each of which must return
//! a JSON body with a recognizable prediction payload.

use std::time::Instant;

use reqwest::{Client, StatusCode};

use crate::config::{EndpointTarget, MonitoringConfig};
use crate::report::{CheckOutcome, CheckResult};

use super::{transport_failure, transport_reason};

/// Token budget sent with each prediction probe
const PROBE_MAX_TOKENS: u32 = 50;

pub(super) async fn check(
    client: &Client,
    config: &MonitoringConfig,
    target: &EndpointTarget,
) -> CheckResult {
    let health_url = format!("{}/health", target.url.trim_end_matches('/'));

    let start = Instant::now();
    let mut request = client.get(&health_url);
    if let Some(token) = &target.token {
        request = request.bearer_auth(token);
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return transport_failure(target, start.elapsed().as_secs_f64(), &e),
    };

    let latency = start.elapsed().as_secs_f64();
    let status = response.status();

    if status != StatusCode::OK {
        return CheckResult {
            endpoint: target.url.clone(),
            category: target.category,
            outcome: CheckOutcome::Failed,
            response_time: latency,
            status_code: Some(status.as_u16()),
            reason: Some(format!(
                "health probe returned status {}",
                status.as_u16()
            )),
        };
    }

    if latency > config.expected_response_time {
        return CheckResult {
            endpoint: target.url.clone(),
            category: target.category,
            outcome: CheckOutcome::Failed,
            response_time: latency,
            status_code: Some(status.as_u16()),
            reason: Some(format!(
                "health probe took {latency:.3}s, threshold is {:.1}s",
                config.expected_response_time
            )),
        };
    }

    // Prediction probes, one per configured test query; the first
    // violation fails the endpoint.
    for query in &config.test_queries {
        if let Some((outcome, status_code, reason)) =
            probe_prediction(client, target, query).await
        {
            return CheckResult {
                endpoint: target.url.clone(),
                category: target.category,
                outcome,
                response_time: latency,
                status_code,
                reason: Some(reason),
            };
        }
    }

    CheckResult {
        endpoint: target.url.clone(),
        category: target.category,
        outcome: CheckOutcome::Passed,
        response_time: latency,
        status_code: Some(status.as_u16()),
        reason: None,
    }
}

/// Sends one prediction request; returns the failure triple, or `None`
/// when the probe passed
async fn probe_prediction(
    client: &Client,
    target: &EndpointTarget,
    query: &str,
) -> Option<(CheckOutcome, Option<u16>, String)> {
    let payload = serde_json::json!({
        "query": query,
        "max_tokens": PROBE_MAX_TOKENS,
    });

    let mut request = client.post(&target.url).json(&payload);
    if let Some(token) = &target.token {
        request = request.bearer_auth(token);
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return Some((CheckOutcome::Error, None, transport_reason(&e))),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return Some((
            CheckOutcome::Failed,
            Some(status.as_u16()),
            format!("prediction request returned status {}", status.as_u16()),
        ));
    }

    match response.json::<serde_json::Value>().await {
        Ok(body) if body.get("response").is_some() || body.get("prediction").is_some() => None,
        Ok(_) => Some((
            CheckOutcome::Failed,
            Some(status.as_u16()),
            "prediction response has no recognizable payload field".to_string(),
        )),
        Err(e) => Some((
            CheckOutcome::Failed,
            Some(status.as_u16()),
            format!("prediction response is not valid JSON: {e}"),
        )),
    }
}
