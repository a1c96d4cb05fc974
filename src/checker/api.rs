// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! GitHub API endpoint checks
//!
//! Every request carries the v3 Accept header and a client-identifying
//! User-Agent, which the GitHub API requires. 404 means the monitored
//! resource is optional and absent, not unhealthy. A 403 with an exhausted
//! `x-ratelimit-remaining` header is rate limiting; any other 401/403 is
//! an authentication failure.

use std::time::Instant;

use reqwest::{Client, StatusCode, header};

use crate::config::EndpointTarget;
use crate::report::{CheckOutcome, CheckResult};

use super::transport_failure;

/// GitHub REST API v3 media type
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Client-identifying User-Agent sent on every API request
const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Header GitHub uses to report the remaining rate-limit quota
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

pub(super) async fn check(client: &Client, target: &EndpointTarget) -> CheckResult {
    let start = Instant::now();

    let mut request = client
        .get(&target.url)
        .header(header::ACCEPT, GITHUB_ACCEPT)
        .header(header::USER_AGENT, CLIENT_USER_AGENT);
    if let Some(token) = &target.token {
        request = request.header(header::AUTHORIZATION, format!("token {token}"));
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return transport_failure(target, start.elapsed().as_secs_f64(), &e),
    };

    let latency = start.elapsed().as_secs_f64();
    let status = response.status();

    let rate_limit_exhausted = response
        .headers()
        .get(RATELIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");

    let (outcome, reason) = match status {
        StatusCode::OK => (CheckOutcome::Passed, None),
        StatusCode::NOT_FOUND => (
            CheckOutcome::Absent,
            Some("resource not found".to_string()),
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            CheckOutcome::Throttled,
            Some("too many requests".to_string()),
        ),
        StatusCode::FORBIDDEN if rate_limit_exhausted => (
            CheckOutcome::Throttled,
            Some("rate limit exhausted".to_string()),
        ),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => (
            CheckOutcome::Failed,
            Some(format!(
                "authentication failure (status {})",
                status.as_u16()
            )),
        ),
        _ => (
            CheckOutcome::Failed,
            Some(format!("API returned status {}", status.as_u16())),
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
