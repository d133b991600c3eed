//! Plain-text extraction used when the presentation structure is unavailable.
//!
//! Scans `ppt/slides/slideN.xml` parts directly, in slide number order, and
//! keeps the text of every `a:p` paragraph.

use crate::archive::PptxArchive;
use crate::xml::local_name;
use pptmd_core::{ContentBlock, Error, Result, SemanticRole, Slide, TextBlock, TextProcessor};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};

const SLIDE_DIR: &str = "ppt/slides/";

/// Marker prepended to markdown produced by this path.
pub(crate) const FALLBACK_NOTE: &str =
    "\n<!-- Converted using plain text fallback - structured XML not available -->\n";

/// Extract one text block per slide part found in the archive.
pub(crate) fn extract_slides<R: Read + Seek>(
    archive: &mut PptxArchive<R>,
    text: &TextProcessor,
) -> Result<Vec<Slide>> {
    let mut parts: Vec<(usize, String)> = archive
        .part_names()
        .into_iter()
        .filter_map(|name| slide_number(&name).map(|n| (n, name)))
        .collect();
    parts.sort();

    let mut slides = Vec::with_capacity(parts.len());
    for (_, path) in &parts {
        let xml = archive.read_part(path)?;
        let lines = match paragraph_texts(&xml) {
            Ok(lines) => lines,
            Err(e) => {
                log::warn!("Skipping unreadable slide {}: {}", path, e);
                continue;
            }
        };

        // Numbered by position among readable slides, so skips leave no gap.
        let mut slide = Slide::new(slides.len() + 1);
        let paragraphs = text.plain_paragraphs(lines.iter().map(String::as_str));
        if !paragraphs.is_empty() {
            slide.add_block(ContentBlock::Text(TextBlock {
                role: SemanticRole::Other,
                paragraphs,
                hyperlink: None,
            }));
        }
        slides.push(slide);
    }

    log::debug!("Fallback extracted {} slides", slides.len());
    Ok(slides)
}

/// Number N of a `ppt/slides/slideN.xml` part.
fn slide_number(name: &str) -> Option<usize> {
    name.strip_prefix(SLIDE_DIR)?
        .strip_prefix("slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text of every DrawingML paragraph, in document order.
fn paragraph_texts(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"br" => {
                if let Some(line) = current.as_mut() {
                    line.push(' ');
                }
            }
            Ok(Event::Text(t)) if in_text => {
                if let Some(line) = current.as_mut() {
                    line.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"p" => lines.extend(current.take()),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error scanning slide text: {}", e)));
            }
            _ => {}
        }
    }

    Ok(lines)
}
