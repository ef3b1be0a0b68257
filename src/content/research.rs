// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Built-in research catalogue.
//!
//! These entries back the research index when no document with the same
//! slug exists on disk. Their structured sections are flattened into a
//! markdown body when loaded.

/// A structured research entry.
#[derive(Debug, Clone, Copy)]
pub struct ResearchEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub date: &'static str,
    pub reading_time: Option<&'static str>,
    pub kind: &'static str,
    pub tags: &'static [&'static str],
    pub sections: &'static [ResearchSection],
    pub metrics: &'static [Metric],
}

#[derive(Debug, Clone, Copy)]
pub struct ResearchSection {
    pub heading: &'static str,
    pub body: &'static str,
    pub bullets: &'static [&'static str],
}

/// A headline figure reported by a research entry.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    pub label: &'static str,
    pub value: &'static str,
}

impl ResearchEntry {
    /// Render sections, bullets and metrics as a markdown body.
    ///
    /// Headings, paragraphs and bullet lists are separate blocks with one
    /// blank line between them.
    pub fn flatten(&self) -> String {
        let mut blocks = Vec::new();
        for section in self.sections {
            blocks.push(format!("## {}", section.heading));
            if !section.body.is_empty() {
                blocks.push(section.body.to_string());
            }
            if !section.bullets.is_empty() {
                blocks.push(bullet_list(section.bullets.iter().map(|b| b.to_string())));
            }
        }
        if !self.metrics.is_empty() {
            blocks.push("## Key metrics".to_string());
            blocks.push(bullet_list(
                self.metrics
                    .iter()
                    .map(|m| format!("**{}**: {}", m.label, m.value)),
            ));
        }
        blocks.join("\n\n").trim_end().to_string()
    }
}

fn bullet_list(items: impl Iterator<Item = String>) -> String {
    items.map(|item| format!("- {item}")).collect::<Vec<_>>().join("\n")
}

/// The research entries shipped with the site.
pub fn catalogue() -> &'static [ResearchEntry] {
    CATALOGUE
}

const CATALOGUE: &[ResearchEntry] = &[
    ResearchEntry {
        slug: "ai-ops-audit",
        title: "Auditing Operations for AI Readiness",
        summary: "A field method for finding the workflows where automation pays back inside a quarter.",
        date: "2025-09-18",
        reading_time: Some("9 min read"),
        kind: "Guide",
        tags: &["AI", "Automation", "Operations"],
        sections: &[
            ResearchSection {
                heading: "Why start with an audit",
                body: "Most automation projects stall because they begin with a tool rather than a bottleneck.",
                bullets: &[
                    "Map every recurring hand-off between teams",
                    "Time each step for two weeks before proposing changes",
                    "Rank candidates by hours saved per month",
                ],
            },
            ResearchSection {
                heading: "Scoring candidates",
                body: "Each workflow is scored on volume, variance and the cost of a wrong answer.",
                bullets: &[],
            },
        ],
        metrics: &[
            Metric { label: "Median payback", value: "11 weeks" },
            Metric { label: "Workflows audited", value: "140" },
        ],
    },
    ResearchEntry {
        slug: "growth-loops-b2b",
        title: "Growth Loops for Small B2B Teams",
        summary: "How referral and content loops outperform paid acquisition below fifty customers.",
        date: "2025-06-02",
        reading_time: Some("7 min read"),
        kind: "Case Study",
        tags: &["Growth", "Marketing", "B2B"],
        sections: &[
            ResearchSection {
                heading: "The loop",
                body: "Every delivered project produces an artefact that brings in the next lead.",
                bullets: &[
                    "Publish one teardown per engagement",
                    "Ask for an introduction at the first milestone, not the last",
                ],
            },
        ],
        metrics: &[
            Metric { label: "Lead cost reduction", value: "62%" },
        ],
    },
    ResearchEntry {
        slug: "crm-hygiene",
        title: "CRM Hygiene Before Automation",
        summary: "Cleaning pipeline data is the cheapest sales win most teams never take.",
        date: "2025-03-21",
        reading_time: Some("6 min read"),
        kind: "Guide",
        tags: &["CRM", "Sales", "Data"],
        sections: &[
            ResearchSection {
                heading: "Symptoms",
                body: "",
                bullets: &[
                    "Duplicate companies under different spellings",
                    "Deals with no next step older than thirty days",
                    "Owners assigned to people who left",
                ],
            },
            ResearchSection {
                heading: "A two-week cleanup",
                body: "Freeze new fields, merge duplicates, then close or revive every stale deal.",
                bullets: &[],
            },
        ],
        metrics: &[
            Metric { label: "Forecast accuracy", value: "+18 points" },
            Metric { label: "Duplicate records removed", value: "4,200" },
        ],
    },
    ResearchEntry {
        slug: "composable-stack",
        title: "A Composable Stack for Consultancies",
        summary: "The reference architecture we deploy for ten to fifty person service firms.",
        date: "2024-11-07",
        reading_time: Some("11 min read"),
        kind: "Playbook",
        tags: &["Architecture", "Stack", "Tooling"],
        sections: &[
            ResearchSection {
                heading: "Layers",
                body: "Identity, data, workflow and presentation are chosen independently.",
                bullets: &[
                    "One source of truth per entity",
                    "Events over nightly syncs",
                    "Every integration owned by a named person",
                ],
            },
        ],
        metrics: &[],
    },
    ResearchEntry {
        slug: "operating-cadence",
        title: "The Weekly Operating Cadence",
        summary: "A meeting rhythm that keeps delivery, pipeline and hiring in one view.",
        date: "2024-08-15",
        reading_time: None,
        kind: "Framework",
        tags: &["Operations", "Leadership"],
        sections: &[
            ResearchSection {
                heading: "Monday review",
                body: "Thirty minutes, three numbers, one decision.",
                bullets: &[],
            },
        ],
        metrics: &[],
    },
];
