// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the site service.
//!
//! The contact rate limit policy (5 requests per 15 minutes) is fixed; the
//! binary never overrides [`RateLimitConfig`] from the environment.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the site service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory of front-matter documents (default: content/blog)
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Bearer token for the admin routes. Admin is disabled when unset.
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Contact form rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Submission validation
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// Validation limits for form submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum characters in a contact name (default: 120)
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Maximum characters in a contact message (default: 5000)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content/blog")
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_max_name_len() -> usize {
    120
}

fn default_max_message_len() -> usize {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            content_dir: default_content_dir(),
            admin_token: None,
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window length
    pub fn window(&self) -> TimeDelta {
        let secs = i64::try_from(self.window_secs).unwrap_or(i64::MAX);
        TimeDelta::seconds(secs.min(i64::MAX / 1000))
    }
}
