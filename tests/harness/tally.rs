// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome counting for abuse simulation.

use std::collections::HashMap;

/// Possible outcomes for a simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    RateLimited,
    Invalid,
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct Tally {
    outcomes: HashMap<Outcome, usize>,
    per_client: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        if outcome == Outcome::Accepted {
            *self.per_client.entry(client.to_string()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Most requests accepted for any single client.
    pub fn max_accepted_per_client(&self) -> usize {
        self.per_client.values().copied().max().unwrap_or(0)
    }
}
