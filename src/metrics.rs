// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the site service.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Service metrics, registered on a private registry.
pub struct Metrics {
    registry: Registry,
    /// Contact submissions by outcome (accepted, invalid, rate_limited)
    pub contact_submissions: IntCounterVec,
    /// Accepted waitlist and newsletter submissions by form
    pub form_submissions: IntCounterVec,
    /// Content API requests by route
    pub content_requests: IntCounterVec,
    /// Identifiers holding a rate limit bucket
    pub tracked_identifiers: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("marsala".to_string()), None)?;

        let contact_submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact form submissions by outcome"),
            &["outcome"],
        )?;
        let form_submissions = IntCounterVec::new(
            Opts::new("form_submissions_total", "Accepted form submissions by form"),
            &["form"],
        )?;
        let content_requests = IntCounterVec::new(
            Opts::new("content_requests_total", "Content API requests by route"),
            &["route"],
        )?;
        let tracked_identifiers = IntGauge::new(
            "rate_limit_tracked_identifiers",
            "Client identifiers holding a rate limit bucket",
        )?;

        registry.register(Box::new(contact_submissions.clone()))?;
        registry.register(Box::new(form_submissions.clone()))?;
        registry.register(Box::new(content_requests.clone()))?;
        registry.register(Box::new(tracked_identifiers.clone()))?;

        Ok(Self {
            registry,
            contact_submissions,
            form_submissions,
            content_requests,
            tracked_identifiers,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
