//! Presentation metadata and its markdown header.
//!
//! The header is an HTML comment prepended to the converted markdown so
//! document properties travel with the text without being rendered.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fields that must be present for metadata to count as complete.
const ESSENTIAL_FIELD_COUNT: f64 = 3.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Document, file and presentation properties of a deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationMetadata {
    pub filename: Option<String>,
    pub file_size: Option<u64>,

    // Document properties
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub comments: Option<String>,
    pub category: Option<String>,
    pub content_status: Option<String>,
    pub language: Option<String>,
    pub version: Option<String>,

    // Dates and revisions
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub last_modified_by: Option<String>,
    pub last_printed: Option<NaiveDateTime>,
    pub revision: Option<u32>,
    pub identifier: Option<String>,

    // Presentation structure
    pub slide_count: Option<usize>,
    pub slide_master_count: usize,
    pub layout_types: Vec<String>,

    // Application properties
    pub application: Option<String>,
    pub app_version: Option<String>,
    pub company: Option<String>,
    pub doc_security: Option<i32>,
}

/// Key indicators for a quick look at a deck's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSummary {
    pub has_title: bool,
    pub has_author: bool,
    pub slide_count: usize,
    pub file_size_mb: Option<f64>,
    pub creation_date: Option<NaiveDateTime>,
    pub last_modified: Option<NaiveDateTime>,
    pub has_keywords: bool,
    pub application: String,
}

/// Completeness assessment of a deck's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataValidation {
    /// Percentage (0-100) of title, author and slide count that are present.
    pub completeness_score: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PresentationMetadata {
    /// Render the metadata as an HTML comment block.
    pub fn to_comment(&self) -> String {
        let mut out = String::from("\n<!-- POWERPOINT METADATA:\n");

        self.format_document(&mut out);
        self.format_dates(&mut out);
        self.format_file(&mut out);
        self.format_presentation(&mut out);

        out.push_str("-->\n");
        out
    }

    /// Prepend the metadata comment to converted markdown.
    pub fn prepend_to(&self, markdown: &str) -> String {
        let mut out = self.to_comment();
        out.push_str(markdown);
        out
    }

    fn format_document(&self, out: &mut String) {
        let fields = [
            ("Document Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Category", &self.category),
            ("Document Comments", &self.comments),
            ("Content Status", &self.content_status),
            ("Language", &self.language),
            ("Version", &self.version),
        ];
        for (label, value) in fields {
            push_field(out, label, value.as_deref());
        }
    }

    fn format_dates(&self, out: &mut String) {
        push_field(out, "Created Date", self.created.map(format_timestamp).as_deref());
        push_field(out, "Last Modified", self.modified.map(format_timestamp).as_deref());
        push_field(out, "Last Modified By", self.last_modified_by.as_deref());
        push_field(out, "Last Printed", self.last_printed.map(format_timestamp).as_deref());
    }

    fn format_file(&self, out: &mut String) {
        out.push_str(&format!(
            "Filename: {}\n",
            self.filename.as_deref().unwrap_or("unknown")
        ));

        if let Some(mb) = self.file_size_mb() {
            out.push_str(&format!("File Size: {:.2} MB\n", mb));
        }

        push_field(out, "Created With", self.application.as_deref());
        push_field(out, "Company", self.company.as_deref());
    }

    fn format_presentation(&self, out: &mut String) {
        out.push_str(&format!("Slide Count: {}\n", self.slide_count.unwrap_or(0)));

        if self.slide_master_count > 0 {
            out.push_str(&format!("Slide Masters: {}\n", self.slide_master_count));
        }
        if !self.layout_types.is_empty() {
            out.push_str(&format!("Layout Types: {}\n", self.layout_types.join(", ")));
        }
    }

    fn file_size_mb(&self) -> Option<f64> {
        self.file_size
            .filter(|&size| size > 0)
            .map(|size| size as f64 / BYTES_PER_MB)
    }

    /// Summarise the key indicators.
    pub fn summary(&self) -> MetadataSummary {
        MetadataSummary {
            has_title: self.title.is_some(),
            has_author: self.author.is_some(),
            slide_count: self.slide_count.unwrap_or(0),
            file_size_mb: self.file_size_mb().map(|mb| (mb * 100.0).round() / 100.0),
            creation_date: self.created,
            last_modified: self.modified,
            has_keywords: self.keywords.is_some(),
            application: self
                .application
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Score completeness and list issues and recommendations.
    pub fn validate(&self) -> MetadataValidation {
        let mut validation = MetadataValidation::default();
        let has_slides = self.slide_count.unwrap_or(0) > 0;

        let present = [self.title.is_some(), self.author.is_some(), has_slides]
            .iter()
            .filter(|&&p| p)
            .count();
        validation.completeness_score = present as f64 / ESSENTIAL_FIELD_COUNT * 100.0;

        if self.title.is_none() {
            validation.issues.push("No document title".to_string());
            validation
                .recommendations
                .push("Add a descriptive title to the presentation".to_string());
        }
        if self.author.is_none() {
            validation.issues.push("No author information".to_string());
            validation
                .recommendations
                .push("Set author information in document properties".to_string());
        }
        if !has_slides {
            validation.issues.push("No slides detected".to_string());
        }
        if self.keywords.is_none() {
            validation
                .recommendations
                .push("Add keywords to improve searchability".to_string());
        }

        validation
    }
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("{}: {}\n", label, value));
    }
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse a W3CDTF timestamp as found in document properties.
///
/// Offsets are folded into UTC; timestamps without an offset are taken as-is.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok();
    if parsed.is_none() && !value.is_empty() {
        log::debug!("Ignoring unparseable timestamp '{}'", value);
    }
    parsed
}

/// Map empty or whitespace-only strings to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
