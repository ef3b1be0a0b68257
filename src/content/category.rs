// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Keyword categorization of articles.
//!
//! Rules are checked top to bottom and the first match wins, so an article
//! tagged both "AI" and "Growth" always lands in AI & Automation.

use super::Article;
use serde::Serialize;

/// Research index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AiAutomation,
    GrowthMarketing,
    DataAnalytics,
    CrmSales,
    ArchitectureStack,
    FrameworksPlaybooks,
}

/// Ordered (keywords, category) rules. Any keyword appearing as a substring
/// of a lower-cased tag or of the article type selects the category.
const RULES: &[(&[&str], Category)] = &[
    (&["ai", "automation"], Category::AiAutomation),
    (&["growth", "marketing"], Category::GrowthMarketing),
    (&["data", "analytics"], Category::DataAnalytics),
    (&["crm", "sales"], Category::CrmSales),
    (&["architecture", "stack"], Category::ArchitectureStack),
];

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: Category = Category::FrameworksPlaybooks;

impl Category {
    /// Every category, in rule order with the default last.
    pub const ALL: [Category; 6] = [
        Category::AiAutomation,
        Category::GrowthMarketing,
        Category::DataAnalytics,
        Category::CrmSales,
        Category::ArchitectureStack,
        Category::FrameworksPlaybooks,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::AiAutomation => "AI & Automation",
            Self::GrowthMarketing => "Growth & Marketing",
            Self::DataAnalytics => "Data & Analytics",
            Self::CrmSales => "CRM & Sales",
            Self::ArchitectureStack => "Architecture & Stack",
            Self::FrameworksPlaybooks => "Frameworks & Playbooks",
        }
    }

    /// URL slug, matching the serialized form.
    pub fn slug(self) -> &'static str {
        match self {
            Self::AiAutomation => "ai-automation",
            Self::GrowthMarketing => "growth-marketing",
            Self::DataAnalytics => "data-analytics",
            Self::CrmSales => "crm-sales",
            Self::ArchitectureStack => "architecture-stack",
            Self::FrameworksPlaybooks => "frameworks-playbooks",
        }
    }

    /// Icon name used by the research index.
    pub fn icon(self) -> &'static str {
        match self {
            Self::AiAutomation => "bot",
            Self::GrowthMarketing => "trending-up",
            Self::DataAnalytics => "bar-chart",
            Self::CrmSales => "users",
            Self::ArchitectureStack => "layers",
            Self::FrameworksPlaybooks => "book-open",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Assign exactly one category to an article.
pub fn category_of(article: &Article) -> Category {
    let haystack: Vec<String> = article
        .tags
        .iter()
        .map(|t| t.to_lowercase())
        .chain(std::iter::once(article.kind.to_lowercase()))
        .collect();

    RULES
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|kw| haystack.iter().any(|h| h.contains(kw)))
        })
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}
