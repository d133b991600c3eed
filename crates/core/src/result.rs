//! Results handed back by the conversion entry points.

use crate::metadata::PresentationMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a file was turned into markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    /// Slide XML parsed into shapes with semantic roles.
    XmlSemanticRoles,
    /// Raw slide text scanned without presentation structure.
    PlainTextFallback,
}

impl ProcessingMethod {
    /// Stable label for display and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::XmlSemanticRoles => "sophisticated_xml_with_semantic_roles_v2",
            Self::PlainTextFallback => "plain_text_fallback",
        }
    }
}

impl fmt::Display for ProcessingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Markdown plus the metadata gathered while producing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The converted markdown.
    pub content: String,

    pub processing_method: ProcessingMethod,

    /// Present only when the structured path was used.
    pub metadata: Option<PresentationMetadata>,
}

/// Description of how a file would be processed, without converting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub file_path: PathBuf,
    pub has_xml_access: bool,
    pub processing_method: ProcessingMethod,

    /// Unknown when the structured path is unavailable.
    pub slide_count: Option<usize>,

    pub extraction_method: String,
    pub slides_preview: Vec<SlidePreview>,
}

/// Shape statistics for one of the leading slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePreview {
    pub slide_number: usize,
    pub shape_count: usize,
    pub title_shapes: usize,
    pub subtitle_shapes: usize,
    pub content_shapes: usize,
    pub has_text: bool,
}
