//! Conversion entry points: path in, markdown (and metadata) out.

use crate::archive::PptxArchive;
use crate::fallback::{self, FALLBACK_NOTE};
use crate::parser::{PptxParser, SlideIndex};
use pptmd_core::{
    ConversionResult, Error, MarkdownConverter, PresentationFormat,
    ProcessingMethod, ProcessingSummary, ReadingOrder, Result, SemanticRole, SlidePreview,
    TextProcessor,
};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Number of leading slides described by [`PowerPointConverter::processing_summary`].
const PREVIEW_SLIDES: usize = 3;

type MemoryArchive = PptxArchive<Cursor<Vec<u8>>>;

/// Options controlling a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterOptions {
    pub reading_order: ReadingOrder,
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how shapes are ordered on each slide.
    pub fn with_reading_order(mut self, reading_order: ReadingOrder) -> Self {
        self.reading_order = reading_order;
        self
    }
}

/// Converts presentation files to markdown.
#[derive(Debug, Clone, Default)]
pub struct PowerPointConverter {
    options: ConverterOptions,
    parser: PptxParser,
    markdown: MarkdownConverter,
}

/// An opened input file.
struct Input {
    archive: MemoryArchive,
    filename: String,
    size: u64,
}

impl PowerPointConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConverterOptions) -> Self {
        Self {
            options,
            parser: PptxParser::new().with_reading_order(options.reading_order),
            markdown: MarkdownConverter::new(),
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert a presentation file to markdown.
    pub fn convert_to_markdown(&self, path: &Path) -> Result<String> {
        Ok(self.process_file(path)?.content)
    }

    /// Convert a presentation file, returning the markdown with its metadata.
    pub fn process_file(&self, path: &Path) -> Result<ConversionResult> {
        let mut input = open(path)?;

        let Some(index) = self.structured_index(&mut input.archive) else {
            return self.convert_fallback(&mut input);
        };

        let presentation = self
            .parser
            .parse_indexed(&mut input.archive, &index, &input.filename)?;
        let body = self.markdown.convert(&presentation);
        let metadata = presentation.metadata.clone().map(|mut m| {
            m.file_size = Some(input.size);
            m
        });
        let content = match &metadata {
            Some(m) => m.prepend_to(&body),
            None => body,
        };

        log::debug!(
            "Converted {} slides from {}",
            presentation.slide_count(),
            input.filename
        );
        Ok(ConversionResult {
            content,
            processing_method: ProcessingMethod::XmlSemanticRoles,
            metadata,
        })
    }

    /// Describe how a file would be processed without rendering it.
    pub fn processing_summary(&self, path: &Path) -> Result<ProcessingSummary> {
        let mut input = open(path)?;
        let index = self.structured_index(&mut input.archive);

        let mut summary = ProcessingSummary {
            file_path: path.to_path_buf(),
            has_xml_access: index.is_some(),
            processing_method: ProcessingMethod::PlainTextFallback,
            slide_count: None,
            extraction_method: self.options.reading_order.extraction_label().to_string(),
            slides_preview: Vec::new(),
        };

        let Some(index) = index else {
            return Ok(summary);
        };

        summary.processing_method = ProcessingMethod::XmlSemanticRoles;
        summary.slide_count = Some(index.slide_paths.len());

        for (idx, slide_path) in index.slide_paths.iter().take(PREVIEW_SLIDES).enumerate() {
            let shapes = self.parser.ordered_shapes(&mut input.archive, slide_path)?;
            let count_role = |role: SemanticRole| shapes.iter().filter(|(_, r)| *r == role).count();

            summary.slides_preview.push(SlidePreview {
                slide_number: idx + 1,
                shape_count: shapes.len(),
                title_shapes: count_role(SemanticRole::Title),
                subtitle_shapes: count_role(SemanticRole::Subtitle),
                content_shapes: count_role(SemanticRole::Content),
                has_text: shapes.iter().any(|(shape, _)| shape.has_text()),
            });
        }

        Ok(summary)
    }

    /// The slide index, or `None` when the presentation part is unusable.
    fn structured_index(&self, archive: &mut MemoryArchive) -> Option<SlideIndex> {
        match self.parser.read_slide_index(archive) {
            Ok(index) if !index.slide_paths.is_empty() => Some(index),
            Ok(_) => {
                log::warn!("Presentation lists no slides, using plain text fallback");
                None
            }
            Err(e) => {
                log::warn!("Presentation structure unavailable ({}), using plain text fallback", e);
                None
            }
        }
    }

    fn convert_fallback(&self, input: &mut Input) -> Result<ConversionResult> {
        let slides = fallback::extract_slides(&mut input.archive, &TextProcessor::new())?;
        let content = format!("{}{}", FALLBACK_NOTE, self.markdown.convert_slides(&slides));

        Ok(ConversionResult {
            content,
            processing_method: ProcessingMethod::PlainTextFallback,
            metadata: None,
        })
    }
}

/// Read the file into memory and open it as a PPTX package.
fn open(path: &Path) -> Result<Input> {
    let bytes = fs::read(path)?;
    let size = bytes.len() as u64;
    if bytes.is_empty() {
        return Err(Error::CorruptedFile(format!("{} is empty", path.display())));
    }

    let format = PresentationFormat::from_magic(&bytes).or_else(|| {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(PresentationFormat::from_extension)
    });

    match format {
        Some(PresentationFormat::Pptx) => {}
        Some(PresentationFormat::Ppt) => {
            return Err(Error::UnsupportedFormat(
                "legacy .ppt files are not supported, save as .pptx".to_string(),
            ));
        }
        None => {
            return Err(Error::UnsupportedFormat(format!(
                "{} is not a PowerPoint file",
                path.display()
            )));
        }
    }

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    log::debug!("Opening {} ({} bytes)", filename, size);
    Ok(Input {
        archive: PptxArchive::new(Cursor::new(bytes))?,
        filename,
        size,
    })
}

/// Convert a presentation file to markdown with default options.
pub fn convert_to_markdown(path: impl AsRef<Path>) -> Result<String> {
    PowerPointConverter::new().convert_to_markdown(path.as_ref())
}

/// Convert a presentation file with default options, keeping its metadata.
pub fn process_file(path: impl AsRef<Path>) -> Result<ConversionResult> {
    PowerPointConverter::new().process_file(path.as_ref())
}

/// Inspect a presentation file with default options.
pub fn processing_summary(path: impl AsRef<Path>) -> Result<ProcessingSummary> {
    PowerPointConverter::new().processing_summary(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rejects_legacy_ppt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.ppt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0])
            .unwrap();

        let err = convert_to_markdown(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_unknown_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just some text").unwrap();

        assert!(matches!(
            process_file(&path),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_empty_file_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pptx");
        fs::write(&path, b"").unwrap();

        assert!(matches!(process_file(&path), Err(Error::CorruptedFile(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_file(dir.path().join("absent.pptx")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_options_reach_parser() {
        let converter = PowerPointConverter::with_options(
            ConverterOptions::new().with_reading_order(ReadingOrder::Document),
        );
        assert_eq!(converter.options().reading_order, ReadingOrder::Document);
        assert_eq!(converter.parser.reading_order(), ReadingOrder::Document);
    }
}
