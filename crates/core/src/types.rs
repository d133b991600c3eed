//! Domain types for representing extracted presentation content.

use crate::metadata::PresentationMetadata;
use serde::{Deserialize, Serialize};

/// Represents an entire presentation with its extracted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,

    /// Document properties, when the package exposes them.
    pub metadata: Option<PresentationMetadata>,
}

impl Presentation {
    /// Create a new, empty presentation for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
            metadata: None,
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides in the presentation.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" | "pptm" | "potx" | "ppsx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }
}

/// A single slide and its content blocks in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Content blocks extracted from this slide.
    pub blocks: Vec<ContentBlock>,
}

impl Slide {
    /// Create a new, empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Append a content block.
    pub fn add_block(&mut self, block: ContentBlock) {
        self.blocks.push(block);
    }
}

/// The role a shape plays on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Title,
    Subtitle,
    SlideNumber,
    Content,
    Other,
}

/// How shapes on a slide are ordered before extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrder {
    /// Titles first, then subtitles, content, and everything else.
    #[default]
    Semantic,
    /// Shapes in the order they appear in the slide XML.
    Document,
    /// Top-to-bottom, then left-to-right by shape offset.
    Position,
}

impl ReadingOrder {
    /// Label describing how shapes were ordered.
    pub fn extraction_label(&self) -> &'static str {
        match self {
            Self::Semantic => "accessibility_order_v2_with_semantic_roles",
            Self::Document => "document_order_group_expansion",
            Self::Position => "position_order_group_expansion",
        }
    }
}

/// Extracted content of one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(TextBlock),
    Table(TableBlock),
    Image(ImageBlock),
    Chart(ChartBlock),
}

/// Text from a shape's text body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub role: SemanticRole,
    pub paragraphs: Vec<Paragraph>,
    /// Hyperlink attached to the shape as a whole.
    pub hyperlink: Option<String>,
}

/// A processed paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed text with any literal bullet glyph removed.
    pub text: String,

    /// Formatted runs covering `text`.
    pub runs: Vec<TextRun>,

    pub hints: ParagraphHints,
}

/// Structural hints used when rendering a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphHints {
    /// Indent level when the paragraph is a list item.
    pub bullet_level: Option<u32>,

    /// Auto-numbered list item.
    pub numbered: bool,

    pub all_caps: bool,
}

impl ParagraphHints {
    pub fn is_bullet(&self) -> bool {
        self.bullet_level.is_some() && !self.numbered
    }
}

/// A run of text sharing the same formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub hyperlink: Option<String>,
}

impl TextRun {
    /// Create a plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// List marker resolved for a paragraph by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletStyle {
    #[default]
    None,
    Symbol,
    AutoNumber,
}

/// A table, first row treated as the header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
}

/// A picture with its alternative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    pub alt_text: String,
    pub hyperlink: Option<String>,
}

/// Summary of a chart's title, type and data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartBlock {
    pub title: Option<String>,

    /// Plot type element name, e.g. `barChart`.
    pub chart_type: String,

    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub hyperlink: Option<String>,
}

/// One data series of a chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: Option<String>,
    pub values: Vec<String>,
}
