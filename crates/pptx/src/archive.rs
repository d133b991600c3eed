//! ZIP package access and relationship resolution.

use crate::xml::{attr, local_name};
use pptmd_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// An open PPTX package.
pub struct PptxArchive<R> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> PptxArchive<R> {
    /// Open a package from a seekable reader.
    pub fn new(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { zip })
    }

    /// Names of all parts in the package.
    pub fn part_names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    /// Read a part as UTF-8 text.
    pub fn read_part(&mut self, path: &str) -> Result<String> {
        let mut file = self.zip.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            e => Error::ZipError(format!("Failed to open '{}': {}", path, e)),
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }

    /// Read a part, returning `None` when it is absent.
    pub fn read_optional(&mut self, path: &str) -> Result<Option<String>> {
        match self.read_part(path) {
            Ok(content) => Ok(Some(content)),
            Err(Error::MissingPart(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Relationships of `part`; empty when the part has no `.rels` file.
    pub fn relationships(&mut self, part: &str) -> Result<Relationships> {
        match self.read_optional(&rels_path(part))? {
            Some(xml) => Relationships::parse(&xml, part),
            None => Ok(Relationships::default()),
        }
    }
}

/// A single package relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Resolved part name for internal targets, raw target for external ones.
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type ends with `/{kind}`, e.g. `slide` or `chart`.
    pub fn is_type(&self, kind: &str) -> bool {
        self.rel_type
            .rsplit('/')
            .next()
            .is_some_and(|last| last == kind)
    }
}

/// The relationships of one part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` document belonging to `source_part`.
    pub fn parse(xml: &str, source_part: &str) -> Result<Self> {
        let mut items = Vec::new();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let id = attr(e, b"Id").unwrap_or_default();
                    let rel_type = attr(e, b"Type").unwrap_or_default();
                    let target = attr(e, b"Target").unwrap_or_default();
                    let external = attr(e, b"TargetMode").as_deref() == Some("External");

                    let target = if external {
                        target
                    } else {
                        resolve_target(source_part, &target)
                    };

                    items.push(Relationship {
                        id,
                        rel_type,
                        target,
                        external,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships of '{}': {}",
                        source_part, e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { items })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Part name targeted by an internal relationship.
    pub fn part(&self, id: &str) -> Option<&str> {
        self.get(id)
            .filter(|r| !r.external)
            .map(|r| r.target.as_str())
    }

    /// Address targeted by an external relationship, such as a hyperlink.
    pub fn external(&self, id: &str) -> Option<&str> {
        self.get(id)
            .filter(|r| r.external && !r.target.is_empty())
            .map(|r| r.target.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }
}

/// Location of the `.rels` part for `part`.
pub fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}
