//! Document properties: `docProps/core.xml`, `docProps/app.xml`, and
//! slide layout names.
//!
//! Every source is optional. A missing or malformed part leaves the
//! corresponding fields empty rather than failing the conversion.

use crate::archive::PptxArchive;
use crate::xml::{attr, local_name};
use pptmd_core::metadata::{non_empty, parse_timestamp};
use pptmd_core::{Error, PresentationMetadata, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Seek};

const CORE_PROPS: &str = "docProps/core.xml";
const APP_PROPS: &str = "docProps/app.xml";
const LAYOUT_DIR: &str = "ppt/slideLayouts/";

/// Collect document, application and layout properties.
pub(crate) fn read_metadata<R: Read + Seek>(
    archive: &mut PptxArchive<R>,
    slide_master_count: usize,
) -> PresentationMetadata {
    let mut metadata = PresentationMetadata {
        slide_master_count,
        ..Default::default()
    };

    match read_leaf_texts(archive, CORE_PROPS) {
        Ok(core) => apply_core(&mut metadata, core),
        Err(e) => log::warn!("Skipping core properties: {}", e),
    }
    match read_leaf_texts(archive, APP_PROPS) {
        Ok(app) => apply_app(&mut metadata, app),
        Err(e) => log::warn!("Skipping application properties: {}", e),
    }

    metadata.layout_types = layout_names(archive);
    metadata
}

fn apply_core(metadata: &mut PresentationMetadata, mut core: HashMap<String, String>) {
    let mut take = |key: &str| non_empty(core.remove(key));

    metadata.title = take("title");
    metadata.author = take("creator");
    metadata.subject = take("subject");
    metadata.keywords = take("keywords");
    metadata.comments = take("description");
    metadata.category = take("category");
    metadata.content_status = take("contentStatus");
    metadata.language = take("language");
    metadata.version = take("version");
    metadata.last_modified_by = take("lastModifiedBy");
    metadata.identifier = take("identifier");
    metadata.revision = take("revision").and_then(|v| v.parse().ok());
    metadata.created = take("created").as_deref().and_then(parse_timestamp);
    metadata.modified = take("modified").as_deref().and_then(parse_timestamp);
    metadata.last_printed = take("lastPrinted").as_deref().and_then(parse_timestamp);
}

fn apply_app(metadata: &mut PresentationMetadata, mut app: HashMap<String, String>) {
    let mut take = |key: &str| non_empty(app.remove(key));

    metadata.application = take("Application");
    metadata.app_version = take("AppVersion");
    metadata.company = take("Company");
    metadata.doc_security = take("DocSecurity").and_then(|v| v.parse().ok());
}

/// Text of each element keyed by local name; the first occurrence wins.
fn read_leaf_texts<R: Read + Seek>(
    archive: &mut PptxArchive<R>,
    path: &str,
) -> Result<HashMap<String, String>> {
    match archive.read_optional(path)? {
        Some(xml) => leaf_texts(&xml),
        None => Ok(HashMap::new()),
    }
}

fn leaf_texts(xml: &str) -> Result<HashMap<String, String>> {
    let mut texts = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = Some(String::from_utf8_lossy(local_name(e.name().as_ref())).into_owned());
            }
            Ok(Event::Text(t)) => {
                if let Some(key) = current.take() {
                    let text = t.unescape().unwrap_or_default().into_owned();
                    texts.entry(key).or_insert(text);
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing properties: {}", e)));
            }
            _ => {}
        }
    }

    Ok(texts)
}

/// Unique slide layout names, sorted.
fn layout_names<R: Read + Seek>(archive: &mut PptxArchive<R>) -> Vec<String> {
    let layouts: Vec<String> = archive
        .part_names()
        .into_iter()
        .filter(|name| {
            name.strip_prefix(LAYOUT_DIR)
                .is_some_and(|rest| !rest.contains('/') && rest.ends_with(".xml"))
        })
        .collect();

    let mut names = BTreeSet::new();
    for path in layouts {
        match archive.read_part(&path) {
            Ok(xml) => {
                if let Some(name) = layout_name(&xml) {
                    names.insert(name);
                }
            }
            Err(e) => log::warn!("Skipping layout {}: {}", path, e),
        }
    }

    names.into_iter().collect()
}

/// The `name` attribute of a layout's `p:cSld`.
fn layout_name(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"cSld" => {
                return attr(&e, b"name").filter(|n| !n.is_empty());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
