//! Shared fixture generators: minimal .pptx packages written with `ZipWriter`.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A relationship from a slide to another part or an external address.
#[derive(Debug, Clone)]
pub struct Rel {
    pub id: String,
    pub kind: String,
    pub target: String,
    pub external: bool,
}

impl Rel {
    pub fn hyperlink(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "hyperlink".to_string(),
            target: url.to_string(),
            external: true,
        }
    }

    pub fn chart(id: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "chart".to_string(),
            target: target.to_string(),
            external: false,
        }
    }
}

/// One slide: its shape tree content and relationships.
#[derive(Debug, Clone, Default)]
pub struct SlideFixture {
    pub shapes: Vec<String>,
    pub rels: Vec<Rel>,
}

impl SlideFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(mut self, xml: String) -> Self {
        self.shapes.push(xml);
        self
    }

    pub fn rel(mut self, rel: Rel) -> Self {
        self.rels.push(rel);
        self
    }
}

/// Builds a .pptx package in a temporary directory.
#[derive(Debug, Clone)]
pub struct PptxBuilder {
    slides: Vec<SlideFixture>,
    /// Order of slides in `sldIdLst`, as indices into `slides`.
    order: Option<Vec<usize>>,
    title: Option<String>,
    author: Option<String>,
    with_presentation: bool,
    extra_parts: Vec<(String, String)>,
}

impl Default for PptxBuilder {
    fn default() -> Self {
        Self {
            slides: Vec::new(),
            order: None,
            title: None,
            author: None,
            with_presentation: true,
            extra_parts: Vec::new(),
        }
    }
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide(mut self, slide: SlideFixture) -> Self {
        self.slides.push(slide);
        self
    }

    pub fn order(mut self, order: &[usize]) -> Self {
        self.order = Some(order.to_vec());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn without_presentation(mut self) -> Self {
        self.with_presentation = false;
        self
    }

    pub fn part(mut self, path: &str, xml: &str) -> Self {
        self.extra_parts.push((path.to_string(), xml.to_string()));
        self
    }

    /// Write the package to `<tempdir>/<name>`.
    pub fn write(&self, name: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);

        for (part, content) in self.parts() {
            zip.start_file(part, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();

        (temp_dir, path)
    }

    fn parts(&self) -> Vec<(String, String)> {
        let mut parts = vec![("[Content_Types].xml".to_string(), content_types())];

        if self.with_presentation {
            parts.push(("ppt/presentation.xml".to_string(), self.presentation()));
            parts.push((
                "ppt/_rels/presentation.xml.rels".to_string(),
                self.presentation_rels(),
            ));
        }

        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{}.xml", n), slide_xml(&slide.shapes)));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                slide_rels(&slide.rels),
            ));
        }

        parts.push((
            "ppt/slideLayouts/slideLayout1.xml".to_string(),
            layout_xml("Title Slide"),
        ));
        parts.push((
            "ppt/slideLayouts/slideLayout2.xml".to_string(),
            layout_xml("Title and Content"),
        ));
        parts.push(("docProps/core.xml".to_string(), self.core_props()));
        parts.push(("docProps/app.xml".to_string(), app_props()));
        parts.extend(self.extra_parts.iter().cloned());
        parts
    }

    fn presentation(&self) -> String {
        let order: Vec<usize> = self
            .order
            .clone()
            .unwrap_or_else(|| (0..self.slides.len()).collect());
        let ids: String = order
            .iter()
            .enumerate()
            .map(|(pos, &i)| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + pos, i + 2))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
        )
    }

    fn presentation_rels(&self) -> String {
        let mut rels = vec![format!(
            r#"<Relationship Id="rId1" Type="{REL_NS}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#
        )];
        for i in 0..self.slides.len() {
            rels.push(format!(
                r#"<Relationship Id="rId{}" Type="{REL_NS}/slide" Target="slides/slide{}.xml"/>"#,
                i + 2,
                i + 1
            ));
        }
        relationships(&rels.concat())
    }

    fn core_props(&self) -> String {
        let title = self
            .title
            .as_ref()
            .map(|t| format!("<dc:title>{}</dc:title>", t))
            .unwrap_or_default();
        let author = self
            .author
            .as_ref()
            .map(|a| format!("<dc:creator>{}</dc:creator>", a))
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}{author}<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T09:30:00Z</dcterms:created></cp:coreProperties>"#
        )
    }
}

fn content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#
        .to_string()
}

fn app_props() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Microsoft Office PowerPoint</Application><Company>Northwind</Company></Properties>"#
        .to_string()
}

fn layout_xml(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS}><p:cSld name="{name}"><p:spTree/></p:cSld></p:sldLayout>"#
    )
}

fn relationships(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

fn slide_rels(rels: &[Rel]) -> String {
    let body: String = rels
        .iter()
        .map(|r| {
            let mode = if r.external {
                r#" TargetMode="External""#
            } else {
                ""
            };
            format!(
                r#"<Relationship Id="{}" Type="{REL_NS}/{}" Target="{}"{}/>"#,
                r.id, r.kind, r.target, mode
            )
        })
        .collect();
    relationships(&body)
}

fn slide_xml(shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        shapes.concat()
    )
}

fn text_shape(id: u32, name: &str, ph: &str, y: i64, paragraphs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="{y}"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

fn paragraph(text: &str) -> String {
    format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", text)
}

/// A title placeholder.
pub fn title_shape(id: u32, text: &str) -> String {
    text_shape(id, "Title 1", r#"<p:ph type="title"/>"#, 274638, &paragraph(text))
}

/// A subtitle placeholder.
pub fn subtitle_shape(id: u32, text: &str) -> String {
    text_shape(
        id,
        "Subtitle 2",
        r#"<p:ph type="subTitle" idx="1"/>"#,
        3886200,
        &paragraph(text),
    )
}

/// A body placeholder; its paragraphs inherit bullets.
pub fn body_shape(id: u32, items: &[&str]) -> String {
    let paragraphs: String = items.iter().map(|t| paragraph(t)).collect();
    text_shape(id, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, 1600200, &paragraphs)
}

/// A free text box at vertical offset `y`.
pub fn text_box(id: u32, name: &str, text: &str, y: i64) -> String {
    text_shape(id, name, "", y, &paragraph(text))
}

/// A text box with raw paragraph XML.
pub fn raw_text_box(id: u32, paragraphs: &str) -> String {
    text_shape(id, "TextBox 9", "", 1600200, paragraphs)
}

/// A slide number placeholder.
pub fn slide_number_shape(id: u32, number: u32) -> String {
    text_shape(
        id,
        "Slide Number Placeholder 3",
        r#"<p:ph type="sldNum" sz="quarter" idx="12"/>"#,
        6356350,
        &format!(
            r#"<a:p><a:fld id="{{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}}" type="slidenum"><a:rPr lang="en-US"/><a:t>{}</a:t></a:fld></a:p>"#,
            number
        ),
    )
}

/// A picture with alternative text.
pub fn picture(id: u32, name: &str, descr: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}" descr="{descr}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId7"/></p:blipFill><p:spPr><a:xfrm><a:off x="0" y="2000000"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr></p:pic>"#
    )
}

/// A table graphic frame; the first row is the header.
pub fn table_shape(id: u32, rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|c| format!("<a:tc><a:txBody><a:bodyPr/>{}</a:txBody><a:tcPr/></a:tc>", paragraph(c)))
                .collect();
            format!(r#"<a:tr h="370840">{}</a:tr>"#, cells)
        })
        .collect();

    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="457200" y="2000000"/><a:ext cx="100" cy="100"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblGrid><a:gridCol w="100"/></a:tblGrid>{rows}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

/// A chart graphic frame referencing relationship `rid`.
pub fn chart_frame(id: u32, rid: &str) -> String {
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="457200" y="2000000"/><a:ext cx="100" cy="100"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{rid}"/></a:graphicData></a:graphic></p:graphicFrame>"#
    )
}

/// A minimal chart part with one series.
pub fn chart_part(title: &str, values: &[&str]) -> String {
    let points: String = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!(r#"<c:pt idx="{i}"><c:v>{v}</c:v></c:pt>"#))
        .collect();
    let labels: String = (1..=values.len())
        .map(|i| format!(r#"<c:pt idx="{}"><c:v>Q{i}</c:v></c:pt>"#, i - 1))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:chart><c:title><c:tx><c:rich><a:p><a:r><a:t>{title}</a:t></a:r></a:p></c:rich></c:tx></c:title><c:plotArea><c:lineChart><c:ser><c:idx val="0"/><c:tx><c:strRef><c:strCache><c:pt idx="0"><c:v>Sales</c:v></c:pt></c:strCache></c:strRef></c:tx><c:cat><c:strRef><c:strCache>{labels}</c:strCache></c:strRef></c:cat><c:val><c:numRef><c:numCache>{points}</c:numCache></c:numRef></c:val></c:ser></c:lineChart></c:plotArea></c:chart></c:chartSpace>"#
    )
}
