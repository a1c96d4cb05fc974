// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Static-site (GitHub Pages) checks
//!
//! A plain retrieval request. 403 and 429 are provider rate limiting, not
//! an outage, and map to the throttled outcome so transient limits do not
//! raise false alarms.

use std::time::Instant;

use reqwest::{Client, StatusCode, header};

use crate::config::EndpointTarget;
use crate::report::{CheckOutcome, CheckResult};

use super::transport_failure;

pub(super) async fn check(client: &Client, target: &EndpointTarget) -> CheckResult {
    let start = Instant::now();

    let mut request = client.get(&target.url);
    if let Some(token) = &target.token {
        // A GitHub token raises the provider-side rate limit
        request = request.header(header::AUTHORIZATION, format!("token {token}"));
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return transport_failure(target, start.elapsed().as_secs_f64(), &e),
    };

    let latency = start.elapsed().as_secs_f64();
    let status = response.status();

    let (outcome, reason) = match status {
        StatusCode::OK => (CheckOutcome::Passed, None),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => (
            CheckOutcome::Throttled,
            Some(format!(
                "rate limited by provider (status {})",
                status.as_u16()
            )),
        ),
        _ => (
            CheckOutcome::Failed,
            Some(format!("site returned status {}", status.as_u16())),
        ),
    };

    CheckResult {
        endpoint: target.url.clone(),
        category: target.category,
        outcome,
        response_time: latency,
        status_code: Some(status.as_u16()),
        reason,
    }
}
