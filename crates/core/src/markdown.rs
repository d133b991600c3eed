//! Markdown rendering of extracted presentations.
//!
//! Each slide opens with an HTML comment marker, followed by one markdown
//! chunk per content block. Heading levels come from the block's semantic
//! role; list structure comes from paragraph hints.

use crate::types::{
    ChartBlock, ContentBlock, ImageBlock, Paragraph, Presentation, SemanticRole, Slide,
    TableBlock, TextBlock, TextRun,
};

/// Maximum number of values listed per chart series.
const MAX_SERIES_VALUES: usize = 5;

/// Converts a [`Presentation`] to markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    /// Create a new converter.
    pub fn new() -> Self {
        Self
    }

    /// Render every slide of the presentation.
    pub fn convert(&self, presentation: &Presentation) -> String {
        self.convert_slides(&presentation.slides)
    }

    /// Render a sequence of slides.
    pub fn convert_slides(&self, slides: &[Slide]) -> String {
        let mut parts = Vec::new();

        for slide in slides {
            parts.push(format!("\n<!-- Slide {} -->\n", slide.number));
            parts.extend(
                slide
                    .blocks
                    .iter()
                    .map(|b| self.convert_block(b))
                    .filter(|md| !md.is_empty()),
            );
        }

        parts.join("\n\n")
    }

    /// Render a single content block.
    pub fn convert_block(&self, block: &ContentBlock) -> String {
        match block {
            ContentBlock::Text(text) => self.convert_text_block(text),
            ContentBlock::Table(table) => self.convert_table(table),
            ContentBlock::Image(image) => self.convert_image(image),
            ContentBlock::Chart(chart) => self.convert_chart(chart),
        }
    }

    fn convert_text_block(&self, block: &TextBlock) -> String {
        let lines: Vec<String> = block
            .paragraphs
            .iter()
            .map(|para| match block.role {
                SemanticRole::Title => format!("# {}", format_runs(para)),
                SemanticRole::Subtitle => format!("## {}", format_runs(para)),
                _ => self.convert_paragraph(para),
            })
            .filter(|line| !line.is_empty())
            .collect();

        let result = lines.join("\n");

        match &block.hyperlink {
            Some(url) if !result.is_empty() => format!("[{}]({})", result, url),
            _ => result,
        }
    }

    fn convert_paragraph(&self, para: &Paragraph) -> String {
        if para.text.is_empty() {
            return String::new();
        }

        let text = format_runs(para);
        let indent = "  ".repeat(para.hints.bullet_level.unwrap_or(0) as usize);

        if para.hints.numbered {
            format!("{}1. {}", indent, text)
        } else if para.hints.is_bullet() {
            format!("{}- {}", indent, text)
        } else {
            text
        }
    }

    fn convert_table(&self, table: &TableBlock) -> String {
        let mut markdown = String::new();

        for (i, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
            markdown.push_str(&format!("| {} |\n", cells.join(" | ")));

            if i == 0 {
                let separator = vec!["---"; row.len()].join(" | ");
                markdown.push_str(&format!("| {} |\n", separator));
            }
        }

        markdown
    }

    fn convert_image(&self, image: &ImageBlock) -> String {
        let markdown = format!("![{}](image)", image.alt_text);

        match &image.hyperlink {
            Some(url) => format!("[{}]({})", markdown, url),
            None => markdown,
        }
    }

    fn convert_chart(&self, chart: &ChartBlock) -> String {
        let mut markdown = format!(
            "**Chart: {}**\n",
            chart.title.as_deref().unwrap_or("Untitled Chart")
        );
        let chart_type = if chart.chart_type.is_empty() {
            "unknown"
        } else {
            chart.chart_type.as_str()
        };
        markdown.push_str(&format!("*Chart Type: {}*\n\n", chart_type));

        if !chart.categories.is_empty() && !chart.series.is_empty() {
            markdown.push_str("Data:\n");
            for series in &chart.series {
                let Some(name) = series.name.as_deref().filter(|n| !n.is_empty()) else {
                    continue;
                };
                markdown.push_str(&format!("- {}: ", name));
                let shown = &series.values[..series.values.len().min(MAX_SERIES_VALUES)];
                markdown.push_str(&shown.join(", "));
                if series.values.len() > MAX_SERIES_VALUES {
                    markdown.push_str("...");
                }
                markdown.push('\n');
            }
        }

        match &chart.hyperlink {
            Some(url) => format!("[{}]({})", markdown, url),
            None => markdown,
        }
    }
}

/// Render a paragraph's runs with bold, italic and hyperlink markup.
fn format_runs(para: &Paragraph) -> String {
    let runs: Vec<&TextRun> = para.runs.iter().filter(|r| !r.text.is_empty()).collect();
    if runs.is_empty() {
        return para.text.clone();
    }

    let all_bold = runs.iter().all(|r| r.bold);
    let all_italic = runs.iter().all(|r| r.italic);
    let shared_link = runs[0]
        .hyperlink
        .as_deref()
        .filter(|link| runs.iter().all(|r| r.hyperlink.as_deref() == Some(*link)));

    if all_bold || all_italic || shared_link.is_some() {
        let text = emphasize(&para.text, all_bold, all_italic);
        return match shared_link {
            Some(link) => format!("[{}]({})", text, link),
            None => text,
        };
    }

    runs.iter()
        .map(|run| {
            let text = emphasize_preserving_edges(&run.text, run.bold, run.italic);
            match &run.hyperlink {
                Some(link) => format!("[{}]({})", text, link),
                None => text,
            }
        })
        .collect()
}

fn emphasize(text: &str, bold: bool, italic: bool) -> String {
    match (bold, italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text.to_string(),
    }
}

/// Emphasise the trimmed core of `text`, keeping edge whitespace outside the markers.
fn emphasize_preserving_edges(text: &str, bold: bool, italic: bool) -> String {
    let core = text.trim();
    if core.is_empty() || !(bold || italic) {
        return text.to_string();
    }

    let lead = &text[..text.len() - text.trim_start().len()];
    let trail = &text[text.trim_end().len()..];
    format!("{}{}{}", lead, emphasize(core, bold, italic), trail)
}
