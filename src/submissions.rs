// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process store for accepted form submissions.
//!
//! Backs the admin counts and contact list. Contents are lost on restart.

use crate::validator::{ValidContact, ValidWaitlist};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// A stored contact request.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// A stored waitlist signup.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntry {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionCounts {
    pub contacts: usize,
    pub waitlist: usize,
    pub newsletter: usize,
}

#[derive(Debug, Default)]
struct Inner {
    contacts: Vec<ContactSubmission>,
    waitlist: Vec<WaitlistEntry>,
    /// Lower-cased subscriber emails
    newsletter: HashSet<String>,
}

/// Thread-safe submission store.
#[derive(Debug, Default)]
pub struct SubmissionStore {
    inner: RwLock<Inner>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_contact(&self, contact: ValidContact, received_at: DateTime<Utc>) {
        self.inner.write().await.contacts.push(ContactSubmission {
            name: contact.name,
            email: contact.email,
            company: contact.company,
            website: contact.website,
            message: contact.message,
            received_at,
        });
    }

    pub async fn add_waitlist(&self, entry: ValidWaitlist, received_at: DateTime<Utc>) {
        self.inner.write().await.waitlist.push(WaitlistEntry {
            email: entry.email,
            name: entry.name,
            module: entry.module,
            received_at,
        });
    }

    /// Subscribe an email. Returns false when it was already subscribed.
    pub async fn subscribe(&self, email: &str) -> bool {
        self.inner
            .write()
            .await
            .newsletter
            .insert(email.to_lowercase())
    }

    /// Contact submissions, newest first.
    pub async fn contacts(&self) -> Vec<ContactSubmission> {
        let inner = self.inner.read().await;
        inner.contacts.iter().rev().cloned().collect()
    }

    pub async fn counts(&self) -> SubmissionCounts {
        let inner = self.inner.read().await;
        SubmissionCounts {
            contacts: inner.contacts.len(),
            waitlist: inner.waitlist.len(),
            newsletter: inner.newsletter.len(),
        }
    }
}
