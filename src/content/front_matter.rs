// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Front-matter header parsing for content documents.
//!
//! Documents open with a `---` line, a block of `key: value` lines, and a
//! closing `---` line. Values are plain or quoted scalars, inline lists
//! (`[a, "b"]`), or block lists of `- item` lines under an empty key.

use std::collections::BTreeMap;
use thiserror::Error;

const DELIMITER: &str = "---";

/// Front-matter parse errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("Document does not start with a front-matter header")]
    Missing,

    #[error("Front-matter header is not closed")]
    Unterminated,

    #[error("Malformed front-matter line {line}: {text}")]
    MalformedLine { line: usize, text: String },
}

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

/// Parsed front-matter fields plus the document body.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    fields: BTreeMap<String, Value>,
    pub body: String,
}

impl FrontMatter {
    /// Scalar value for `key`, if present and non-empty.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// List value for `key`. A scalar is treated as a one-element list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Text(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

/// Split a document into its front-matter fields and body.
pub fn parse(source: &str) -> Result<FrontMatter, FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.lines().enumerate();

    match lines.next() {
        Some((_, first)) if first.trim_end() == DELIMITER => {}
        _ => return Err(FrontMatterError::Missing),
    }

    let mut fields = BTreeMap::new();
    let mut open_list: Option<String> = None;
    let mut closed_at = None;

    for (idx, line) in lines {
        if line.trim_end() == DELIMITER {
            closed_at = Some(idx);
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| (trimmed == "-").then_some("")) {
            let Some(key) = open_list.as_ref() else {
                return Err(malformed(idx, line));
            };
            if let Some(Value::List(items)) = fields.get_mut(key) {
                items.push(unquote(strip_comment(item.trim())).to_string());
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(malformed(idx, line));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed(idx, line));
        }

        let value = strip_comment(value.trim());
        if value.is_empty() {
            fields.insert(key.to_string(), Value::List(Vec::new()));
            open_list = Some(key.to_string());
        } else if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            fields.insert(key.to_string(), Value::List(split_inline_list(inner)));
            open_list = None;
        } else {
            fields.insert(key.to_string(), Value::Text(unquote(value).to_string()));
            open_list = None;
        }
    }

    let Some(closed_at) = closed_at else {
        return Err(FrontMatterError::Unterminated);
    };

    let body = source
        .lines()
        .skip(closed_at + 1)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(FrontMatter {
        fields,
        body: body.trim_start_matches('\n').to_string(),
    })
}

fn malformed(idx: usize, line: &str) -> FrontMatterError {
    FrontMatterError::MalformedLine {
        line: idx + 1,
        text: line.to_string(),
    }
}

/// Drop a trailing `# comment`. A `#` only opens a comment outside quotes
/// and at the start of the value or after whitespace.
fn strip_comment(value: &str) -> &str {
    let mut quote = None;
    let mut prev_is_space = true;
    for (i, c) in value.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' && prev_is_space => return value[..i].trim_end(),
            None => {}
        }
        prev_is_space = c.is_whitespace();
    }
    value
}

/// Split the inside of `[...]` on commas that are not inside quotes.
fn split_inline_list(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ',' => {
                items.push(&inner[start..i]);
                start = i + 1;
            }
            None => {}
        }
    }
    items.push(&inner[start..]);

    items
        .into_iter()
        .map(|item| unquote(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
