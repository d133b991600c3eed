//! Reading order and semantic roles of slide shapes.

use crate::slide::{Shape, ShapeTag};
use pptmd_core::{ReadingOrder, SemanticRole};
use std::cmp::Ordering;

/// Flatten groups, classify every shape, drop slide numbers, and order
/// the rest according to `order`.
pub(crate) fn order_shapes(shapes: Vec<Shape>, order: ReadingOrder) -> Vec<(Shape, SemanticRole)> {
    let mut classified: Vec<(Shape, SemanticRole)> = flatten(shapes)
        .into_iter()
        .map(|shape| {
            let role = classify(&shape);
            (shape, role)
        })
        .filter(|(_, role)| *role != SemanticRole::SlideNumber)
        .collect();

    match order {
        ReadingOrder::Semantic => classified.sort_by_key(|(_, role)| role_rank(*role)),
        ReadingOrder::Position => classified.sort_by(|(a, _), (b, _)| compare_position(a, b)),
        ReadingOrder::Document => {}
    }

    classified
}

/// Expand groups recursively, keeping document order.
pub(crate) fn flatten(shapes: Vec<Shape>) -> Vec<Shape> {
    let mut flat = Vec::with_capacity(shapes.len());
    for mut shape in shapes {
        if shape.tag == ShapeTag::Group {
            let children = std::mem::take(&mut shape.children);
            flat.extend(flatten(children));
        } else {
            flat.push(shape);
        }
    }
    flat
}

/// Decide the role of a shape from its placeholder type, its name, and its content.
pub(crate) fn classify(shape: &Shape) -> SemanticRole {
    match shape.placeholder_kind() {
        Some("title") | Some("ctrTitle") => return SemanticRole::Title,
        Some("subTitle") => return SemanticRole::Subtitle,
        Some("sldNum") => return SemanticRole::SlideNumber,
        _ => {}
    }

    let name = shape.name.to_lowercase();
    if name.contains("subtitle") || name.contains("sub-title") {
        return SemanticRole::Subtitle;
    }
    if name.contains("title") {
        return SemanticRole::Title;
    }
    if name.contains("slide number") {
        return SemanticRole::SlideNumber;
    }

    if shape.has_text()
        || shape.table.is_some()
        || shape.chart_rid.is_some()
        || shape.tag == ShapeTag::Picture
    {
        SemanticRole::Content
    } else {
        SemanticRole::Other
    }
}

fn role_rank(role: SemanticRole) -> u8 {
    match role {
        SemanticRole::Title => 0,
        SemanticRole::Subtitle => 1,
        SemanticRole::Content => 2,
        SemanticRole::Other | SemanticRole::SlideNumber => 3,
    }
}

/// Top-to-bottom, then left-to-right; shapes without an offset go last.
fn compare_position(a: &Shape, b: &Shape) -> Ordering {
    let key = |s: &Shape| (s.y.is_none(), s.y.unwrap_or(0), s.x.unwrap_or(0));
    key(a).cmp(&key(b))
}
