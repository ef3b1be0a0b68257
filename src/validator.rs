// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Form submission validator.
//!
//! Checks contact, waitlist and newsletter payloads and returns the
//! trimmed values ready to store:
//! - Required fields present and non-blank
//! - Length limits on name and message
//! - Plausible email syntax
//! - Optional website restricted to http/https URLs with a host

use crate::config::ValidationConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

const MAX_EMAIL_LEN: usize = 254;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },
}

impl ValidationError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::TooLong { .. } => "FIELD_TOO_LONG",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidUrl { .. } => "INVALID_URL",
        }
    }
}

/// Contact form payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Waitlist payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

/// Newsletter payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

/// A contact request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub message: String,
}

/// A waitlist request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidWaitlist {
    pub email: String,
    pub name: Option<String>,
    pub module: Option<String>,
}

/// Form submission validator.
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a contact form.
    pub fn validate_contact(&self, req: &ContactRequest) -> Result<ValidContact, ValidationError> {
        let name = required("name", &req.name)?;
        if name.chars().count() > self.config.max_name_len {
            debug!(len = name.chars().count(), "Contact name too long");
            return Err(ValidationError::TooLong {
                field: "name",
                max: self.config.max_name_len,
            });
        }

        let email = self.validate_email(&req.email)?;

        let message = required("message", &req.message)?;
        if message.chars().count() > self.config.max_message_len {
            debug!(len = message.chars().count(), "Contact message too long");
            return Err(ValidationError::TooLong {
                field: "message",
                max: self.config.max_message_len,
            });
        }

        let website = match optional(req.website.as_deref()) {
            Some(url) => Some(validate_website(url)?),
            None => None,
        };

        Ok(ValidContact {
            name: name.to_string(),
            email,
            company: optional(req.company.as_deref()).map(str::to_string),
            website,
            message: message.to_string(),
        })
    }

    /// Validate a waitlist signup.
    pub fn validate_waitlist(&self, req: &WaitlistRequest) -> Result<ValidWaitlist, ValidationError> {
        Ok(ValidWaitlist {
            email: self.validate_email(&req.email)?,
            name: optional(req.name.as_deref()).map(str::to_string),
            module: optional(req.module.as_deref()).map(str::to_string),
        })
    }

    /// Validate an email address, returning it trimmed.
    pub fn validate_email(&self, email: &str) -> Result<String, ValidationError> {
        let email = required("email", email)?;
        if !is_plausible_email(email) {
            debug!(email = %email, "Invalid email address");
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(email.to_string())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!(field, "Missing required field");
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn validate_website(url: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        field: "website",
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        debug!(url = %url, "Invalid website URL (bad scheme or no host)");
        return Err(invalid());
    }
    Ok(parsed.to_string())
}
