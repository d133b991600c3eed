//! Paragraph text processing.
//!
//! Turns the raw runs of a paragraph into clean text plus formatted runs,
//! strips literal bullet glyphs from list items, and repairs hyperlink
//! addresses that lack a scheme.

use crate::types::{BulletStyle, Paragraph, ParagraphHints, TextRun};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to match a bullet glyph typed at the start of a list item.
static BULLET_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•◦▪▫‣·○■□→►✓✗\-\*\+※◆◇]\s*").unwrap());

/// Regex to match addresses that look like bare web domains.
static BARE_DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(com|org|net|edu|gov|io)").unwrap());

/// URL schemes left untouched by [`fix_url`].
const KNOWN_SCHEMES: &[&str] = &["http://", "https://", "mailto:", "tel:", "ftp://", "#"];

/// Builds [`Paragraph`]s from raw text runs.
#[derive(Debug, Clone, Default)]
pub struct TextProcessor;

impl TextProcessor {
    /// Create a new text processor.
    pub fn new() -> Self {
        Self
    }

    /// Process the runs of a single paragraph.
    ///
    /// Returns `None` when the paragraph carries no visible text.
    pub fn process_paragraph(
        &self,
        runs: Vec<TextRun>,
        bullet: BulletStyle,
        level: u32,
    ) -> Option<Paragraph> {
        let runs: Vec<TextRun> = runs
            .into_iter()
            .map(|run| TextRun {
                text: run.text.nfc().collect(),
                hyperlink: run.hyperlink.map(|url| fix_url(&url)),
                ..run
            })
            .collect();

        let raw: String = runs.iter().map(|r| r.text.as_str()).collect();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let is_list_item = bullet != BulletStyle::None;
        let clean = if is_list_item {
            remove_bullet_char(trimmed)
        } else {
            trimmed
        };
        if clean.is_empty() {
            return None;
        }

        // `clean` is a suffix of `raw.trim_end()`, so the range is on char boundaries.
        let end = raw.trim_end().len();
        let start = end - clean.len();
        let runs = clip_runs(runs, start, end);

        Some(Paragraph {
            text: clean.to_string(),
            runs,
            hints: ParagraphHints {
                bullet_level: is_list_item.then_some(level),
                numbered: bullet == BulletStyle::AutoNumber,
                all_caps: is_all_caps(clean),
            },
        })
    }

    /// Build paragraphs from unformatted lines of text.
    pub fn plain_paragraphs<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<Paragraph> {
        lines
            .into_iter()
            .filter_map(|line| self.process_paragraph(vec![TextRun::new(line)], BulletStyle::None, 0))
            .collect()
    }
}

/// Strip a leading bullet glyph and the whitespace after it.
pub fn remove_bullet_char(text: &str) -> &str {
    match BULLET_PREFIX_REGEX.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Add a missing scheme to web addresses and `mailto:` to email addresses.
pub fn fix_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if url.contains('@') && !url.starts_with("mailto:") {
        return format!("mailto:{}", url);
    }

    if !KNOWN_SCHEMES.iter().any(|s| url.starts_with(s))
        && (url.starts_with("www.") || BARE_DOMAIN_REGEX.is_match(url))
    {
        return format!("https://{}", url);
    }

    url.to_string()
}

/// At least one cased character and no lowercase ones.
fn is_all_caps(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// Keep only the parts of `runs` inside the byte range `[start, end)` of their concatenation.
fn clip_runs(runs: Vec<TextRun>, start: usize, end: usize) -> Vec<TextRun> {
    let mut clipped = Vec::with_capacity(runs.len());
    let mut offset = 0;

    for run in runs {
        let run_start = offset;
        let run_end = offset + run.text.len();
        offset = run_end;

        let from = start.max(run_start);
        let to = end.min(run_end);
        if from >= to {
            continue;
        }

        let text = run.text[from - run_start..to - run_start].to_string();
        clipped.push(TextRun { text, ..run });
    }

    clipped
}
