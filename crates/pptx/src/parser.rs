//! PPTX file parser implementation.

use crate::archive::{PptxArchive, Relationships};
use crate::chart::parse_chart;
use crate::properties::read_metadata;
use crate::reading::order_shapes;
use crate::slide::{parse_shape_tree, BulletMark, RawParagraph, Shape, ShapeTag};
use crate::xml::{local_name, rel_id};
use pptmd_core::text::fix_url;
use pptmd_core::{
    BulletStyle, ContentBlock, Error, ImageBlock, Presentation, ReadingOrder,
    Result, SemanticRole, Slide, TableBlock, TextBlock, TextProcessor, TextRun,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};

const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Slide parts in presentation order, plus the number of slide masters.
#[derive(Debug, Clone, Default)]
pub struct SlideIndex {
    pub slide_paths: Vec<String>,
    pub master_count: usize,
}

/// Parser for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxParser {
    reading_order: ReadingOrder,
    text: TextProcessor,
}

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how shapes are ordered on each slide.
    pub fn with_reading_order(mut self, reading_order: ReadingOrder) -> Self {
        self.reading_order = reading_order;
        self
    }

    pub fn reading_order(&self) -> ReadingOrder {
        self.reading_order
    }

    /// Parse every slide listed in `index`, then the document properties.
    pub fn parse_indexed<R: Read + Seek>(
        &self,
        archive: &mut PptxArchive<R>,
        index: &SlideIndex,
        filename: &str,
    ) -> Result<Presentation> {
        let mut presentation = Presentation::new(filename);

        for (idx, slide_path) in index.slide_paths.iter().enumerate() {
            let slide = self.parse_slide(archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        let mut metadata = read_metadata(archive, index.master_count);
        metadata.filename = Some(filename.to_string());
        metadata.slide_count = Some(presentation.slide_count());
        presentation.metadata = Some(metadata);

        Ok(presentation)
    }

    /// Get the ordered list of slide parts from the presentation part.
    pub fn read_slide_index<R: Read + Seek>(
        &self,
        archive: &mut PptxArchive<R>,
    ) -> Result<SlideIndex> {
        let xml = archive.read_part(PRESENTATION_PART)?;
        let rels = archive.relationships(PRESENTATION_PART)?;
        let (slide_rids, master_count) = parse_presentation_part(&xml)?;

        let mut slide_paths: Vec<String> = slide_rids
            .iter()
            .filter_map(|rid| {
                let path = rels.part(rid);
                if path.is_none() {
                    log::warn!("Slide relationship {} has no target", rid);
                }
                path.map(str::to_string)
            })
            .collect();

        if slide_paths.is_empty() {
            slide_paths = slides_from_relationships(&rels);
        }

        log::debug!("Found {} slides", slide_paths.len());
        Ok(SlideIndex {
            slide_paths,
            master_count,
        })
    }

    /// Shapes of a slide in reading order, with their roles.
    pub(crate) fn ordered_shapes<R: Read + Seek>(
        &self,
        archive: &mut PptxArchive<R>,
        slide_path: &str,
    ) -> Result<Vec<(Shape, SemanticRole)>> {
        let content = archive.read_part(slide_path)?;
        let shapes = parse_shape_tree(&content)?;
        Ok(order_shapes(shapes, self.reading_order))
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut PptxArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let shapes = self.ordered_shapes(archive, slide_path)?;
        let rels = archive.relationships(slide_path)?;
        let mut slide = Slide::new(slide_number);

        for (shape, role) in &shapes {
            if let Some(block) = self.extract_block(archive, &rels, shape, *role) {
                slide.add_block(block);
            }
        }

        log::debug!(
            "Slide {} ({}): {} shapes, {} blocks",
            slide_number,
            slide_path,
            shapes.len(),
            slide.blocks.len()
        );
        Ok(slide)
    }

    /// Turn one shape into a content block, if it carries any content.
    fn extract_block<R: Read + Seek>(
        &self,
        archive: &mut PptxArchive<R>,
        rels: &Relationships,
        shape: &Shape,
        role: SemanticRole,
    ) -> Option<ContentBlock> {
        let hyperlink = shape
            .hyperlink_rid
            .as_deref()
            .and_then(|rid| rels.external(rid))
            .map(fix_url);

        if let Some(rows) = &shape.table {
            return (!rows.is_empty()).then(|| ContentBlock::Table(TableBlock { rows: rows.clone() }));
        }

        if let Some(rid) = &shape.chart_rid {
            let Some(part) = rels.part(rid) else {
                log::warn!("Chart {} in '{}' has no target part", rid, shape.name);
                return None;
            };
            return match archive.read_part(part).and_then(|xml| parse_chart(&xml)) {
                Ok(mut chart) => {
                    chart.hyperlink = hyperlink;
                    Some(ContentBlock::Chart(chart))
                }
                Err(e) => {
                    log::warn!("Skipping chart {}: {}", part, e);
                    None
                }
            };
        }

        if shape.tag == ShapeTag::Picture {
            let alt_text = if shape.descr.trim().is_empty() {
                shape.name.clone()
            } else {
                shape.descr.trim().to_string()
            };
            return Some(ContentBlock::Image(ImageBlock {
                alt_text,
                hyperlink,
            }));
        }

        let inherits_bullets = role == SemanticRole::Content && shape.is_body_placeholder();
        let paragraphs: Vec<_> = shape
            .paragraphs
            .iter()
            .filter_map(|para| {
                let runs = resolve_runs(para, rels);
                let bullet = bullet_style(para, inherits_bullets);
                self.text
                    .process_paragraph(runs, bullet, para.level.unwrap_or(0))
            })
            .collect();

        if paragraphs.is_empty() {
            return None;
        }

        Some(ContentBlock::Text(TextBlock {
            role,
            paragraphs,
            hyperlink,
        }))
    }
}

/// Runs with hyperlink relationship ids resolved to addresses.
fn resolve_runs(para: &RawParagraph, rels: &Relationships) -> Vec<TextRun> {
    para.runs
        .iter()
        .map(|run| TextRun {
            text: run.text.clone(),
            bold: run.bold,
            italic: run.italic,
            hyperlink: run
                .hyperlink_rid
                .as_deref()
                .and_then(|rid| rels.external(rid))
                .map(str::to_string),
        })
        .collect()
}

/// Explicit markers win; otherwise body placeholders inherit a bullet from the master.
fn bullet_style(para: &RawParagraph, inherits: bool) -> BulletStyle {
    match para.bullet {
        Some(BulletMark::Suppressed) => BulletStyle::None,
        Some(BulletMark::AutoNumber) => BulletStyle::AutoNumber,
        Some(BulletMark::Symbol) => BulletStyle::Symbol,
        None if inherits => BulletStyle::Symbol,
        None => BulletStyle::None,
    }
}

/// Slide relationship ids from `p:sldIdLst`, in order, and the slide master count.
fn parse_presentation_part(xml: &str) -> Result<(Vec<String>, usize)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut slide_rids = Vec::new();
    let mut master_count = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldId" => slide_rids.extend(rel_id(e)),
                    b"sldMasterId" => master_count += 1,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok((slide_rids, master_count))
}

/// Slide targets of the presentation relationships, sorted by slide number.
fn slides_from_relationships(rels: &Relationships) -> Vec<String> {
    let mut slides: Vec<(String, Option<usize>)> = rels
        .iter()
        .filter(|r| r.is_type("slide") && !r.external)
        .map(|r| {
            let order_num = extract_slide_number(&r.target).or_else(|| extract_slide_number(&r.id));
            (r.target.clone(), order_num)
        })
        .collect();

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    slides.into_iter().map(|(path, _)| path).collect()
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
