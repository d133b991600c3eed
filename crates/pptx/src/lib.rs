//! PPTX (Office Open XML) backend for PowerPoint to markdown conversion.
//!
//! Parses .pptx files, which are ZIP archives of XML parts, into the
//! domain types of `pptmd-core` and renders them as markdown.

pub mod archive;
mod chart;
mod fallback;
pub mod parser;
pub mod processor;
mod properties;
mod reading;
mod slide;
mod xml;

pub use archive::PptxArchive;
pub use parser::{PptxParser, SlideIndex};
pub use processor::{
    convert_to_markdown, process_file, processing_summary, ConverterOptions, PowerPointConverter,
};
