// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content engine for the research and blog pages.
//!
//! Articles come from two places: front-matter documents in the content
//! directory, and the built-in [`research`] catalogue. Both are normalized
//! into [`Article`] at load time, and everything downstream (sorting,
//! categorization, related scoring, navigation) works on that one shape.
//!
//! A document on disk replaces a catalogue entry with the same slug.
//! Nothing is cached: every query rescans the directory.

pub mod category;
pub mod front_matter;
pub mod research;

pub use category::{category_of, Category, DEFAULT_CATEGORY};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use research::ResearchEntry;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Related articles returned when the caller gives no limit.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

const WORDS_PER_MINUTE: usize = 200;
const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx"];

// `%.f` also matches an absent fraction.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Errors turning a source into an [`Article`].
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] front_matter::FrontMatterError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unparseable date: {0}")]
    InvalidDate(String),
}

/// A normalized article.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    pub reading_time: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// Where an article came from. Only exists until normalization.
pub enum ArticleSource<'a> {
    /// Front-matter document; `slug` is the file stem.
    Document { slug: String, source: &'a str },
    /// Built-in catalogue entry.
    Research(&'a ResearchEntry),
}

impl ArticleSource<'_> {
    /// Normalize into an [`Article`].
    pub fn into_article(self) -> Result<Article, ContentError> {
        match self {
            ArticleSource::Document { slug, source } => {
                let fm = front_matter::parse(source)?;
                let title = fm.text("title").ok_or(ContentError::MissingField("title"))?;
                let date = fm.text("date").ok_or(ContentError::MissingField("date"))?;
                let reading_time = fm
                    .text("readingTime")
                    .map(str::to_string)
                    .unwrap_or_else(|| estimate_reading_time(&fm.body));

                Ok(Article {
                    slug: fm.text("slug").map(str::to_string).unwrap_or(slug),
                    title: title.to_string(),
                    summary: fm.text("summary").unwrap_or_default().to_string(),
                    date: parse_date(date)?,
                    reading_time: Some(reading_time),
                    tags: fm.list("tags"),
                    kind: fm.text("type").unwrap_or("Article").to_string(),
                    content: fm.body.clone(),
                })
            }
            ArticleSource::Research(entry) => Ok(Article {
                slug: entry.slug.to_string(),
                title: entry.title.to_string(),
                summary: entry.summary.to_string(),
                date: parse_date(entry.date)?,
                reading_time: entry.reading_time.map(str::to_string),
                tags: entry.tags.iter().map(|t| t.to_string()).collect(),
                kind: entry.kind.to_string(),
                content: entry.flatten(),
            }),
        }
    }
}

/// Parse an ISO date (`2025-01-31`), a naive timestamp, or RFC 3339.
/// Naive timestamps are read as UTC.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ContentError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ContentError::InvalidDate(value.to_string()))
}

/// "N min read" at 200 words per minute, never less than one minute.
pub fn estimate_reading_time(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// Merge two article sets, the first winning slug collisions, and sort
/// newest first. Equal dates keep their merged order.
pub fn merge_and_sort(primary: Vec<Article>, fallback: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Article> = primary
        .into_iter()
        .chain(fallback)
        .filter(|article| seen.insert(article.slug.clone()))
        .collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}

/// Pairwise relevance of `candidate` to `reference`.
///
/// 10 per shared tag (case-insensitive), 5 for the same category, 3 for the
/// same type. Type comparison is case-sensitive.
pub fn relevance_score(reference: &Article, candidate: &Article) -> u32 {
    let reference_tags: HashSet<String> =
        reference.tags.iter().map(|t| t.to_lowercase()).collect();
    let shared = candidate
        .tags
        .iter()
        .filter(|t| reference_tags.contains(&t.to_lowercase()))
        .count() as u32;

    let mut score = shared * 10;
    if category_of(candidate) == category_of(reference) {
        score += 5;
    }
    if candidate.kind == reference.kind {
        score += 3;
    }
    score
}

/// Up to `limit` articles most relevant to `slug`, excluding itself.
pub fn related_in(posts: &[Article], slug: &str, limit: usize) -> Vec<Article> {
    let Some(reference) = posts.iter().find(|p| p.slug == slug) else {
        return Vec::new();
    };

    let mut scored: Vec<(u32, &Article)> = posts
        .iter()
        .filter(|p| p.slug != slug)
        .map(|p| (relevance_score(reference, p), p))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, article)| article.clone())
        .collect()
}

/// Chronological neighbours of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adjacent {
    /// The next older article
    pub previous: Option<Article>,
    /// The next newer article
    pub next: Option<Article>,
}

/// Neighbours of `slug` in a newest-first list.
pub fn adjacent_in(posts: &[Article], slug: &str) -> Adjacent {
    let Some(idx) = posts.iter().position(|p| p.slug == slug) else {
        return Adjacent::default();
    };
    Adjacent {
        previous: posts.get(idx + 1).cloned(),
        next: idx.checked_sub(1).and_then(|i| posts.get(i)).cloned(),
    }
}

/// Group articles under every category, in rule order.
pub fn group_by_category(posts: &[Article]) -> Vec<(Category, Vec<Article>)> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let members = posts
                .iter()
                .filter(|p| category_of(p) == category)
                .cloned()
                .collect();
            (category, members)
        })
        .collect()
}

/// Article store over a content directory and a fallback catalogue.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    content_dir: PathBuf,
    fallback: &'static [ResearchEntry],
}

impl ContentLibrary {
    /// Library over `content_dir` backed by the built-in research catalogue.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self::with_fallback(content_dir, research::catalogue())
    }

    pub fn with_fallback(content_dir: impl Into<PathBuf>, fallback: &'static [ResearchEntry]) -> Self {
        Self {
            content_dir: content_dir.into(),
            fallback,
        }
    }

    /// Every article, newest first.
    pub fn all_posts(&self) -> Vec<Article> {
        merge_and_sort(self.load_documents(), self.load_fallback())
    }

    /// A single article by slug.
    pub fn post(&self, slug: &str) -> Option<Article> {
        self.all_posts().into_iter().find(|p| p.slug == slug)
    }

    /// Articles most relevant to `slug`.
    pub fn related_to(&self, slug: &str, limit: usize) -> Vec<Article> {
        related_in(&self.all_posts(), slug, limit)
    }

    /// Older and newer neighbours of `slug`.
    pub fn adjacent_to(&self, slug: &str) -> Adjacent {
        adjacent_in(&self.all_posts(), slug)
    }

    /// Articles grouped by category.
    pub fn by_category(&self) -> Vec<(Category, Vec<Article>)> {
        group_by_category(&self.all_posts())
    }

    /// Load every readable document in the content directory. Unreadable or
    /// malformed documents are skipped.
    fn load_documents(&self) -> Vec<Article> {
        if !self.content_dir.is_dir() {
            debug!(dir = %self.content_dir.display(), "Content directory missing");
            return Vec::new();
        }

        let walker = WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut articles = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "Failed to read content directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_document(path) {
                continue;
            }

            match load_document(path) {
                Ok(article) => articles.push(article),
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping document"),
            }
        }
        articles
    }

    fn load_fallback(&self) -> Vec<Article> {
        self.fallback
            .iter()
            .filter_map(|entry| match ArticleSource::Research(entry).into_article() {
                Ok(article) => Some(article),
                Err(err) => {
                    warn!(slug = entry.slug, error = %err, "Skipping research entry");
                    None
                }
            })
            .collect()
    }
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

fn load_document(path: &Path) -> Result<Article, ContentError> {
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ArticleSource::Document {
        slug,
        source: &source,
    }
    .into_article()
}

#[cfg(test)]
pub(crate) fn test_article(slug: &str, date: &str, tags: &[&str]) -> Article {
    Article {
        slug: slug.to_string(),
        title: slug.to_uppercase(),
        summary: String::new(),
        date: parse_date(date).unwrap(),
        reading_time: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        kind: "Guide".to_string(),
        content: String::new(),
    }
}
