// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the health check application
//!
//! Loads and parses the monitoring configuration from a JSON file or
//! environment variables.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    pub const EXPECTED_RESPONSE_TIME_SECS: f64 = 2.0;
    pub const MAX_ERROR_RATE: f64 = 0.05;
    pub const TIMEOUT_SECS: u64 = 30;

    pub fn expected_response_time() -> f64 {
        EXPECTED_RESPONSE_TIME_SECS
    }

    pub fn max_error_rate() -> f64 {
        MAX_ERROR_RATE
    }

    pub fn timeout() -> u64 {
        TIMEOUT_SECS
    }

    /// Probe queries sent to model endpoints when the config does not
    /// provide its own set.
    pub fn test_queries() -> Vec<String> {
        vec![
            "Hello, how are you?".to_string(),
            "What is the capital of France?".to_string(),
            "Explain quantum computing in simple terms.".to_string(),
        ]
    }
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const MODEL_ENDPOINTS: &str = "MODEL_ENDPOINTS";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
}

/// Prefix marking an `api_keys` value as an environment-variable reference
const ENV_SECRET_PREFIX: &str = "env:";

/// Category of a monitored endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointCategory {
    /// Model inference endpoint (prediction service)
    Model,
    /// Static site (GitHub Pages)
    Pages,
    /// GitHub API endpoint
    Api,
}

impl std::fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointCategory::Model => write!(f, "model"),
            EndpointCategory::Pages => write!(f, "pages"),
            EndpointCategory::Api => write!(f, "api"),
        }
    }
}

/// A single resolved check target: URL, category and optional token
#[derive(Debug, Clone)]
pub struct EndpointTarget {
    pub url: String,
    pub category: EndpointCategory,
    pub token: Option<String>,
}

/// Monitoring configuration for one invocation
///
/// Loaded once at startup and immutable afterwards. Unknown fields are
/// rejected so a typo in the config file fails loudly instead of silently
/// disabling a check.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    pub model_endpoints: Vec<String>,
    #[serde(default)]
    pub github_pages_endpoints: Vec<String>,
    #[serde(default)]
    pub github_api_endpoints: Vec<String>,
    /// Latency threshold for model health probes, seconds
    #[serde(default = "defaults::expected_response_time")]
    pub expected_response_time: f64,
    /// Maximum tolerated fraction of hard-failed endpoints
    #[serde(default = "defaults::max_error_rate")]
    pub max_error_rate: f64,
    #[serde(default = "defaults::test_queries")]
    pub test_queries: Vec<String>,
    /// Endpoint URL → token, or `env:NAME` to read the token from the
    /// environment at load time
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    /// Per-request timeout, seconds
    #[serde(default = "defaults::timeout")]
    pub timeout: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        MonitoringConfig {
            model_endpoints: vec![],
            github_pages_endpoints: vec![],
            github_api_endpoints: vec![],
            expected_response_time: defaults::EXPECTED_RESPONSE_TIME_SECS,
            max_error_rate: defaults::MAX_ERROR_RATE,
            test_queries: defaults::test_queries(),
            api_keys: HashMap::new(),
            timeout: defaults::TIMEOUT_SECS,
        }
    }
}

impl MonitoringConfig {
    /// Loads configuration from a file when a path is given, otherwise
    /// falls back to environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or parsed, or
    /// if the resulting configuration fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::from_env(),
        };
        config.validate().map_err(AppError::Config)?;
        Ok(config)
    }

    /// Loads configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` on read or parse failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read config file '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("invalid config file '{}': {e}", path.display()))
        })
    }

    /// Builds configuration from environment variables
    ///
    /// Reads a comma-separated model endpoint list from `MODEL_ENDPOINTS`.
    /// An absent or empty variable yields an empty endpoint set, which
    /// evaluates to a vacuous pass.
    pub fn from_env() -> Self {
        let model_endpoints = std::env::var(env_vars::MODEL_ENDPOINTS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if model_endpoints.is_empty() {
            tracing::warn!(
                "No endpoint configuration found. The run will report a trivially healthy result."
            );
        }

        MonitoringConfig {
            model_endpoints,
            ..MonitoringConfig::default()
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        for url in self.endpoint_urls() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "Invalid endpoint URL '{url}': expected http:// or https:// scheme"
                ));
            }
        }

        if self.expected_response_time <= 0.0 {
            return Err(format!(
                "expected_response_time must be positive, got {}",
                self.expected_response_time
            ));
        }

        if !(0.0..=1.0).contains(&self.max_error_rate) {
            return Err(format!(
                "max_error_rate must be within [0.0, 1.0], got {}",
                self.max_error_rate
            ));
        }

        if self.timeout == 0 {
            return Err("timeout must be at least 1 second".to_string());
        }

        if !self.model_endpoints.is_empty() && self.test_queries.is_empty() {
            return Err("test_queries cannot be empty when model endpoints are configured".to_string());
        }

        Ok(())
    }

    /// Iterates over every configured endpoint URL across all categories
    fn endpoint_urls(&self) -> impl Iterator<Item = &str> {
        self.model_endpoints
            .iter()
            .chain(&self.github_pages_endpoints)
            .chain(&self.github_api_endpoints)
            .map(String::as_str)
    }

    /// Total number of configured endpoints
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.model_endpoints.len()
            + self.github_pages_endpoints.len()
            + self.github_api_endpoints.len()
    }

    /// Flattens the endpoint lists into ordered check targets with
    /// resolved tokens
    #[must_use]
    pub fn targets(&self) -> Vec<EndpointTarget> {
        let make = |urls: &[String], category: EndpointCategory| {
            urls.iter()
                .map(|url| EndpointTarget {
                    url: url.clone(),
                    category,
                    token: self.resolve_token(url, category),
                })
                .collect::<Vec<_>>()
        };

        let mut targets = make(&self.model_endpoints, EndpointCategory::Model);
        targets.extend(make(&self.github_pages_endpoints, EndpointCategory::Pages));
        targets.extend(make(&self.github_api_endpoints, EndpointCategory::Api));
        targets
    }

    /// Resolves the token for an endpoint
    ///
    /// An `api_keys` value of the form `env:NAME` is read from the
    /// environment; a missing variable logs a warning and the check runs
    /// unauthenticated. GitHub endpoints without an `api_keys` entry fall
    /// back to `GITHUB_TOKEN`.
    fn resolve_token(&self, url: &str, category: EndpointCategory) -> Option<String> {
        if let Some(value) = self.api_keys.get(url) {
            return match value.strip_prefix(ENV_SECRET_PREFIX) {
                Some(var_name) => match std::env::var(var_name) {
                    Ok(token) => Some(token),
                    Err(_) => {
                        tracing::warn!(
                            "Secret reference '{}' for endpoint {} is not set; checking without authentication",
                            var_name,
                            url
                        );
                        None
                    }
                },
                None => Some(value.clone()),
            };
        }

        match category {
            EndpointCategory::Pages | EndpointCategory::Api => {
                std::env::var(env_vars::GITHUB_TOKEN).ok()
            }
            EndpointCategory::Model => None,
        }
    }
}
