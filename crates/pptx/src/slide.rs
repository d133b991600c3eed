//! Slide shape-tree parsing.
//!
//! Walks `p:spTree` and builds a tree of [`Shape`]s carrying the raw
//! material later turned into content blocks: text paragraphs and runs,
//! table cells, chart references, placeholder info, and offsets.
//! `mc:Fallback` branches are skipped so alternate content appears once.

use crate::xml::{attr, attr_flag, attr_num, local_name, rel_id, skip_element};
use pptmd_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element kinds that make up a shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeTag {
    Shape,
    Picture,
    Connector,
    GraphicFrame,
    Group,
}

impl ShapeTag {
    fn from_local(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"cxnSp" => Some(Self::Connector),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Placeholder reference from `p:nvPr/p:ph`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Placeholder {
    /// `type` attribute; absent means a body/object placeholder.
    pub kind: Option<String>,
}

/// Explicit list marker found in a paragraph's `a:pPr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BulletMark {
    Symbol,
    AutoNumber,
    Suppressed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub hyperlink_rid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawParagraph {
    pub level: Option<u32>,
    pub bullet: Option<BulletMark>,
    pub runs: Vec<RawRun>,
}

impl RawParagraph {
    #[cfg(test)]
    fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A shape as it appears in the slide XML.
#[derive(Debug, Clone)]
pub(crate) struct Shape {
    pub tag: ShapeTag,
    pub id: Option<u32>,
    pub name: String,
    pub descr: String,
    pub placeholder: Option<Placeholder>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    /// Click action on the whole shape.
    pub hyperlink_rid: Option<String>,
    pub paragraphs: Vec<RawParagraph>,
    pub table: Option<Vec<Vec<String>>>,
    pub chart_rid: Option<String>,
    /// Members of a group shape.
    pub children: Vec<Shape>,
}

impl Shape {
    fn new(tag: ShapeTag) -> Self {
        Self {
            tag,
            id: None,
            name: String::new(),
            descr: String::new(),
            placeholder: None,
            x: None,
            y: None,
            hyperlink_rid: None,
            paragraphs: Vec::new(),
            table: None,
            chart_rid: None,
            children: Vec::new(),
        }
    }

    /// Whether any paragraph carries visible text.
    pub fn has_text(&self) -> bool {
        self.paragraphs
            .iter()
            .any(|p| p.runs.iter().any(|r| !r.text.trim().is_empty()))
    }

    /// Paragraph texts joined by newlines.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(RawParagraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Placeholder `type` attribute, if this is a typed placeholder.
    pub fn placeholder_kind(&self) -> Option<&str> {
        self.placeholder.as_ref().and_then(|p| p.kind.as_deref())
    }

    /// Body and object placeholders inherit list bullets from the slide master.
    pub fn is_body_placeholder(&self) -> bool {
        match &self.placeholder {
            Some(ph) => matches!(ph.kind.as_deref(), None | Some("body") | Some("obj")),
            None => false,
        }
    }
}

/// Parse every top-level shape in a slide document.
pub(crate) fn parse_shape_tree(xml: &str) -> Result<Vec<Shape>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if let Some(tag) = ShapeTag::from_local(local) {
                    shapes.push(parse_shape(&mut reader, tag)?);
                } else if local == b"Fallback" {
                    skip_element(&mut reader, &e)?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Parse one shape; the reader is positioned just after its start tag.
fn parse_shape(reader: &mut Reader<&[u8]>, tag: ShapeTag) -> Result<Shape> {
    let mut shape = Shape::new(tag);
    let mut state = ShapeState::default();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if tag == ShapeTag::Group {
                    if let Some(child) = ShapeTag::from_local(local) {
                        shape.children.push(parse_shape(reader, child)?);
                        continue;
                    }
                }
                if local == b"Fallback" {
                    skip_element(reader, &e)?;
                    continue;
                }

                depth += 1;
                state.element(&mut shape, local, &e, true);
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                state.element(&mut shape, local_name(name.as_ref()), &e, false);
            }
            Ok(Event::Text(t)) => {
                if state.in_text {
                    let text = t.unescape().unwrap_or_default();
                    state.push_text(&mut shape, &text);
                }
            }
            Ok(Event::End(e)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                let name = e.name();
                state.close(&mut shape, local_name(name.as_ref()));
            }
            Ok(Event::Eof) => {
                return Err(Error::XmlError(format!(
                    "Unexpected end of slide inside {:?} shape",
                    tag
                )));
            }
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing shape: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shape)
}

/// Where the reader currently is inside a shape.
#[derive(Debug, Default)]
struct ShapeState {
    in_nv_props: bool,
    in_text_body: bool,
    in_paragraph_props: bool,
    in_run: bool,
    in_run_props: bool,
    in_text: bool,
    offset_seen: bool,
    cell: Option<String>,
}

impl ShapeState {
    fn element(&mut self, shape: &mut Shape, local: &[u8], e: &BytesStart, is_start: bool) {
        match local {
            b"cNvPr" => {
                if shape.id.is_none() {
                    shape.id = attr_num(e, b"id");
                    shape.name = attr(e, b"name").unwrap_or_default();
                    shape.descr = attr(e, b"descr").unwrap_or_default();
                }
                self.in_nv_props = is_start;
            }
            b"hlinkClick" => {
                let rid = rel_id(e);
                if self.in_nv_props {
                    shape.hyperlink_rid = rid;
                } else if self.in_run_props {
                    if let Some(run) = self.current_run(shape) {
                        run.hyperlink_rid = rid;
                    }
                }
            }
            b"ph" => {
                shape.placeholder = Some(Placeholder {
                    kind: attr(e, b"type"),
                });
            }
            b"off" if !self.offset_seen => {
                shape.x = attr_num(e, b"x");
                shape.y = attr_num(e, b"y");
                self.offset_seen = true;
            }
            b"txBody" if is_start && self.cell.is_none() => {
                self.in_text_body = true;
            }
            b"p" if is_start => {
                if let Some(cell) = self.cell.as_mut() {
                    if !cell.is_empty() {
                        cell.push(' ');
                    }
                } else if self.in_text_body {
                    shape.paragraphs.push(RawParagraph::default());
                }
            }
            b"pPr" if self.in_text_body && self.cell.is_none() => {
                if let Some(para) = shape.paragraphs.last_mut() {
                    para.level = attr_num(e, b"lvl");
                }
                self.in_paragraph_props = is_start;
            }
            b"buChar" | b"buBlip" | b"buAutoNum" | b"buNone" if self.in_paragraph_props => {
                let mark = match local {
                    b"buAutoNum" => BulletMark::AutoNumber,
                    b"buNone" => BulletMark::Suppressed,
                    _ => BulletMark::Symbol,
                };
                if let Some(para) = shape.paragraphs.last_mut() {
                    para.bullet = Some(mark);
                }
            }
            b"r" | b"fld" if is_start && self.in_text_body && self.cell.is_none() => {
                if let Some(para) = shape.paragraphs.last_mut() {
                    para.runs.push(RawRun::default());
                    self.in_run = true;
                }
            }
            b"rPr" if self.in_run => {
                if let Some(run) = self.current_run(shape) {
                    run.bold = attr_flag(e, b"b");
                    run.italic = attr_flag(e, b"i");
                }
                self.in_run_props = is_start;
            }
            b"br" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.push(' ');
                } else if self.in_text_body {
                    // The break joins the run before it so uniform formatting survives.
                    if let Some(para) = shape.paragraphs.last_mut() {
                        match para.runs.last_mut() {
                            Some(run) => run.text.push(' '),
                            None => para.runs.push(RawRun {
                                text: " ".to_string(),
                                ..Default::default()
                            }),
                        }
                    }
                }
            }
            b"t" if is_start => {
                self.in_text = true;
            }
            b"tbl" if is_start => {
                shape.table = Some(Vec::new());
            }
            b"tr" => {
                if let Some(rows) = shape.table.as_mut() {
                    rows.push(Vec::new());
                }
            }
            b"tc" => {
                if is_start {
                    self.cell = Some(String::new());
                } else {
                    push_cell(shape, String::new());
                }
            }
            b"chart" => {
                shape.chart_rid = rel_id(e);
            }
            _ => {}
        }
    }

    fn close(&mut self, shape: &mut Shape, local: &[u8]) {
        match local {
            b"cNvPr" => self.in_nv_props = false,
            b"txBody" => self.in_text_body = false,
            b"pPr" => self.in_paragraph_props = false,
            b"r" | b"fld" => self.in_run = false,
            b"rPr" => self.in_run_props = false,
            b"t" => self.in_text = false,
            b"tc" => {
                if let Some(cell) = self.cell.take() {
                    push_cell(shape, cell.trim().to_string());
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, shape: &mut Shape, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
        } else if let Some(run) = self.current_run(shape) {
            run.text.push_str(text);
        }
    }

    fn current_run<'s>(&self, shape: &'s mut Shape) -> Option<&'s mut RawRun> {
        if !self.in_run {
            return None;
        }
        shape.paragraphs.last_mut().and_then(|p| p.runs.last_mut())
    }
}

fn push_cell(shape: &mut Shape, cell: String) {
    if let Some(row) = shape.table.as_mut().and_then(|rows| rows.last_mut()) {
        row.push(cell);
    }
}
