// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests for the rate limiter and the content engine.

use chrono::{TimeDelta, TimeZone, Utc};
use marsala_site::{
    config::RateLimitConfig,
    content::{
        category_of,
        research::{Metric, ResearchEntry, ResearchSection},
        Category, ContentLibrary,
    },
    limiter::{Clock, FixedWindowLimiter, ManualClock},
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn limiter() -> (FixedWindowLimiter, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
    ));
    (
        FixedWindowLimiter::with_clock(RateLimitConfig::default(), clock.clone()),
        clock,
    )
}

#[test]
fn test_burst_then_block() {
    let (limiter, _) = limiter();

    let remaining: Vec<u32> = (0..5)
        .map(|i| {
            let decision = limiter.check("1.2.3.4");
            assert!(decision.allowed, "Request {} should be allowed", i + 1);
            decision.remaining
        })
        .collect();
    assert_eq!(remaining, [4, 3, 2, 1, 0]);

    let sixth = limiter.check("1.2.3.4");
    assert!(!sixth.allowed);
    assert_eq!(sixth.remaining, 0);
}

#[test]
fn test_window_reset_behaves_like_first_call() {
    let (limiter, clock) = limiter();
    for _ in 0..6 {
        limiter.check("1.2.3.4");
    }

    clock.advance(TimeDelta::minutes(15) + TimeDelta::seconds(1));
    let decision = limiter.check("1.2.3.4");
    assert!(decision.allowed);
    assert_eq!(decision.remaining, 4);
    assert_eq!(decision.reset_at, clock.now() + TimeDelta::minutes(15));
}

#[test]
fn test_identifiers_are_isolated() {
    let (limiter, _) = limiter();
    for _ in 0..6 {
        limiter.check("10.0.0.1");
    }
    assert!(!limiter.check("10.0.0.1").allowed);

    let other = limiter.check("10.0.0.2");
    assert!(other.allowed);
    assert_eq!(other.remaining, 4);
}

#[test]
fn test_boundary_burst_is_allowed() {
    // Fixed windows let a client spend two full quotas back to back.
    let (limiter, clock) = limiter();
    clock.advance(TimeDelta::minutes(14));
    for _ in 0..5 {
        assert!(limiter.check("edge").allowed);
    }
    clock.advance(TimeDelta::minutes(15) + TimeDelta::seconds(1));
    for _ in 0..5 {
        assert!(limiter.check("edge").allowed);
    }
}

static FALLBACK: &[ResearchEntry] = &[
    ResearchEntry {
        slug: "shared-slug",
        title: "Catalogue version",
        summary: "from the catalogue",
        date: "2024-02-01",
        reading_time: Some("4 min read"),
        kind: "Guide",
        tags: &["AI", "Growth"],
        sections: &[ResearchSection {
            heading: "Overview",
            body: "Catalogue body.",
            bullets: &["one"],
        }],
        metrics: &[Metric {
            label: "Lift",
            value: "12%",
        }],
    },
    ResearchEntry {
        slug: "oldest",
        title: "Oldest",
        summary: "",
        date: "2023-01-01",
        reading_time: None,
        kind: "Guide",
        tags: &["Ops"],
        sections: &[],
        metrics: &[],
    },
    ResearchEntry {
        slug: "growth-notes",
        title: "Growth notes",
        summary: "",
        date: "2024-06-01",
        reading_time: None,
        kind: "Case Study",
        tags: &["AI", "Growth", "Ops"],
        sections: &[],
        metrics: &[],
    },
];

fn write_doc(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

fn library() -> (ContentLibrary, TempDir) {
    let dir = TempDir::new().unwrap();
    write_doc(
        &dir,
        "shared-slug.mdx",
        "---\ntitle: Disk version\nsummary: from disk\ndate: 2024-02-01\ntype: Guide\ntags: [AI, Growth]\n---\nDisk body.",
    );
    write_doc(
        &dir,
        "newest.md",
        "---\ntitle: Newest\ndate: 2025-07-01\ntype: Playbook\ntags:\n  - Hiring\n---\nFresh.",
    );
    write_doc(&dir, "broken.mdx", "---\ntitle: No date\n---\nbody");
    write_doc(&dir, "notes.txt", "---\ntitle: Ignored\ndate: 2025-01-01\n---\n");
    (ContentLibrary::with_fallback(dir.path(), FALLBACK), dir)
}

#[test]
fn test_disk_document_wins_slug_collision() {
    let (library, _dir) = library();
    let post = library.post("shared-slug").unwrap();
    assert_eq!(post.summary, "from disk");
    assert_eq!(post.title, "Disk version");
    assert_eq!(post.content, "Disk body.");

    let count = library
        .all_posts()
        .iter()
        .filter(|p| p.slug == "shared-slug")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_hand_written_front_matter_variants_load() {
    let dir = TempDir::new().unwrap();
    write_doc(
        &dir,
        "shared-slug.md",
        "---\ntitle: Hello # draft\ndate: 2025-01-12T10:00\ntags: [\"AI, ML\", Growth]\n---\nBody.",
    );
    let library = ContentLibrary::with_fallback(dir.path(), FALLBACK);

    let post = library.post("shared-slug").unwrap();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.date.to_rfc3339(), "2025-01-12T10:00:00+00:00");
    assert_eq!(post.tags, vec!["AI, ML", "Growth"]);
    assert_eq!(library.all_posts()[0].slug, "shared-slug");
}

#[test]
fn test_posts_sorted_newest_first() {
    let (library, _dir) = library();
    let posts = library.all_posts();

    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["newest", "growth-notes", "shared-slug", "oldest"]);
    assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
}

#[test]
fn test_malformed_and_foreign_files_are_skipped() {
    let (library, _dir) = library();
    assert!(library.post("broken").is_none());
    assert!(library.post("notes").is_none());
}

#[test]
fn test_missing_directory_falls_back_to_catalogue() {
    let library = ContentLibrary::with_fallback("/nonexistent/marsala/content", FALLBACK);
    assert_eq!(library.all_posts().len(), FALLBACK.len());

    let post = library.post("shared-slug").unwrap();
    assert_eq!(post.summary, "from the catalogue");
    assert!(post.content.contains("- **Lift**: 12%"));
}

#[test]
fn test_related_excludes_self_and_respects_limit() {
    let (library, _dir) = library();

    for limit in 0..5 {
        let related = library.related_to("shared-slug", limit);
        assert!(related.len() <= limit);
        assert!(related.iter().all(|p| p.slug != "shared-slug"));
    }

    let related = library.related_to("shared-slug", 3);
    let slugs: Vec<_> = related.iter().map(|p| p.slug.as_str()).collect();
    // growth-notes shares two tags; oldest and newest share none.
    assert_eq!(slugs[0], "growth-notes");
    assert_eq!(related.len(), 3);
}

#[test]
fn test_related_for_unknown_slug_is_empty() {
    let (library, _dir) = library();
    assert!(library.related_to("missing", 3).is_empty());
}

#[test]
fn test_adjacent_boundaries() {
    let (library, _dir) = library();

    let newest = library.adjacent_to("newest");
    assert!(newest.next.is_none());
    assert_eq!(newest.previous.unwrap().slug, "growth-notes");

    let oldest = library.adjacent_to("oldest");
    assert!(oldest.previous.is_none());
    assert_eq!(oldest.next.unwrap().slug, "shared-slug");

    let missing = library.adjacent_to("missing");
    assert!(missing.previous.is_none() && missing.next.is_none());
}

#[test]
fn test_every_article_gets_one_category() {
    let (library, _dir) = library();
    for post in library.all_posts() {
        assert!(Category::ALL.contains(&category_of(&post)));
    }

    let groups = library.by_category();
    let total: usize = groups.iter().map(|(_, posts)| posts.len()).sum();
    assert_eq!(total, library.all_posts().len());
}

#[test]
fn test_builtin_catalogue_loads() {
    let library = ContentLibrary::new("/nonexistent/marsala/content");
    let posts = library.all_posts();
    assert!(!posts.is_empty());
    assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    assert_eq!(
        category_of(library.post("ai-ops-audit").as_ref().unwrap()),
        Category::AiAutomation
    );
}
