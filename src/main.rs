// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Marsala OS Site Service
//!
//! Serves the research/blog content engine and the site's form endpoints:
//!
//! - Merged, date-sorted articles from the content directory and the
//!   built-in research catalogue
//! - Related articles and previous/next navigation
//! - Contact form, rate limited to 5 requests per 15 minutes per client
//! - Waitlist and newsletter signups
//! - Admin counts and contact list behind a bearer token
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTENT_DIR`: Directory of front-matter documents (default: content/blog)
//! - `ADMIN_TOKEN`: Bearer token for `/api/admin/*` (unset disables admin)
//! - `MAX_MESSAGE_LEN`: Max contact message length (default: 5000)
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marsala_site::{
    config::{Config, MetricsConfig, ValidationConfig},
    handlers::{router, AppState},
    limiter::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        content_dir = %config.content_dir.display(),
        admin_enabled = config.admin_token.is_some(),
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Starting Marsala site service"
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::new(config, Arc::new(SystemClock))?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        content_dir: std::env::var("CONTENT_DIR")
            .map(Into::into)
            .unwrap_or(defaults.content_dir),
        admin_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
        validation: ValidationConfig {
            max_message_len: std::env::var("MAX_MESSAGE_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.validation.max_message_len),
            ..defaults.validation
        },
        metrics: MetricsConfig {
            enabled: std::env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics.enabled),
            ..defaults.metrics
        },
        ..Default::default()
    }
}
