//! Core domain types, text processing, and markdown rendering
//! for PowerPoint to markdown conversion.

pub mod error;
pub mod markdown;
pub mod metadata;
pub mod result;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use markdown::MarkdownConverter;
pub use metadata::{MetadataSummary, MetadataValidation, PresentationMetadata};
pub use result::{ConversionResult, ProcessingMethod, ProcessingSummary, SlidePreview};
pub use text::TextProcessor;
pub use types::{
    BulletStyle, ChartBlock, ChartSeries, ContentBlock, ImageBlock, Paragraph, ParagraphHints,
    Presentation, PresentationFormat, ReadingOrder, SemanticRole, Slide, TableBlock, TextBlock,
    TextRun,
};
