//! Chart part parsing (`ppt/charts/chartN.xml`).

use crate::xml::local_name;
use pptmd_core::{ChartBlock, ChartSeries, Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Extract title, plot type, categories and series values from a chart part.
pub(crate) fn parse_chart(xml: &str) -> Result<ChartBlock> {
    let mut reader = Reader::from_str(xml);
    let mut chart = ChartBlock::default();
    let mut title = String::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(e.name().as_ref()).to_vec();

                if chart.chart_type.is_empty()
                    && stack.last().is_some_and(|p| p == b"plotArea")
                    && name.ends_with(b"Chart")
                {
                    chart.chart_type = String::from_utf8_lossy(&name).into_owned();
                }
                if name == b"ser" {
                    chart.series.push(ChartSeries::default());
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(e.name().as_ref()).to_vec();
                if chart.chart_type.is_empty()
                    && stack.last().is_some_and(|p| p == b"plotArea")
                    && name.ends_with(b"Chart")
                {
                    chart.chart_type = String::from_utf8_lossy(&name).into_owned();
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().unwrap_or_default();
                collect_text(&stack, &mut chart, &mut title, &text);
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing chart: {}", e)));
            }
            _ => {}
        }
    }

    let title = title.trim();
    if !title.is_empty() {
        chart.title = Some(title.to_string());
    }

    Ok(chart)
}

fn collect_text(stack: &[Vec<u8>], chart: &mut ChartBlock, title: &mut String, text: &str) {
    let Some(leaf) = stack.last() else {
        return;
    };
    let within = |name: &[u8]| stack.iter().any(|s| s == name);

    if is_chart_title(stack) {
        if leaf == b"t" || leaf == b"v" {
            title.push_str(text);
        }
        return;
    }

    if leaf != b"v" || !within(b"ser") {
        return;
    }

    let series_count = chart.series.len();
    let Some(series) = chart.series.last_mut() else {
        return;
    };

    if within(b"tx") {
        series.name.get_or_insert_with(String::new).push_str(text);
    } else if within(b"cat") || within(b"xVal") {
        if series_count == 1 {
            chart.categories.push(text.to_string());
        }
    } else if within(b"val") || within(b"yVal") {
        series.values.push(text.to_string());
    }
}

/// Inside `c:chart/c:title`, as opposed to an axis title.
fn is_chart_title(stack: &[Vec<u8>]) -> bool {
    stack
        .windows(2)
        .any(|w| w[0] == b"chart" && w[1] == b"title")
}
