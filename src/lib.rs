// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Marsala OS site service
//!
//! The behavioral core of the Marsala OS marketing site:
//!
//! - Fixed-window rate limiting for form submissions (5 per 15 minutes)
//! - A content engine merging on-disk front-matter documents with the
//!   built-in research catalogue
//! - Keyword categorization, related-article scoring and chronological
//!   previous/next navigation
//! - Validated contact, waitlist and newsletter submissions
//!
//! The HTTP surface lives in [`handlers`].

pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod submissions;
pub mod validator;

pub use config::Config;
pub use content::{Article, Category, ContentLibrary};
pub use error::AppError;
pub use limiter::{Decision, FixedWindowLimiter};
pub use validator::{SubmissionValidator, ValidationError};
