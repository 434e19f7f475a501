//! Turns positioned nodes into page shapes and connectors.

use std::collections::HashMap;

use crate::models::*;

pub struct GeometryBuilder {
    label_max_chars: Option<usize>,
}

impl GeometryBuilder {
    pub fn new(label_max_chars: Option<usize>) -> Self {
        Self { label_max_chars }
    }

    /// Emit one shape per node and one connector per parent link.
    ///
    /// Connector ids continue after the largest node id so shapes and
    /// connectors share one id space on the page.
    pub fn build(&self, nodes: &[LayoutNode], feature: &Feature) -> Geometry {
        let shapes: Vec<Shape> = nodes
            .iter()
            .map(|node| Shape {
                id: node.id,
                text: self.label(feature, node.source),
                center: node.center,
                size: Size::new(
                    node.size.width.max(EPSILON),
                    node.size.height.max(EPSILON),
                ),
                style: node.style,
            })
            .collect();

        let by_id: HashMap<u32, &Shape> = shapes.iter().map(|s| (s.id, s)).collect();
        let last_id = shapes.iter().map(|s| s.id).max().unwrap_or(0);
        let mut ids = IdAllocator::starting_after(last_id);

        let mut edges = Vec::new();
        for node in nodes {
            let Some(parent_id) = node.parent else {
                continue;
            };
            let (Some(from), Some(to)) = (by_id.get(&parent_id), by_id.get(&node.id)) else {
                tracing::warn!(node = node.id, parent = parent_id, "Skipping edge to unknown node");
                continue;
            };
            edges.push(Edge {
                id: ids.next_id(),
                from: from.id,
                to: to.id,
                start: bottom_center(from),
                end: top_center(to),
            });
        }

        tracing::debug!(
            shapes = shapes.len(),
            edges = edges.len(),
            "Built diagram geometry"
        );
        Geometry { shapes, edges }
    }

    fn label(&self, feature: &Feature, source: NodeSource) -> String {
        let text = match source {
            NodeSource::Feature => Some(feature.name.as_str()),
            NodeSource::Scenario { scenario } => {
                feature.scenarios.get(scenario).map(|s| s.name.as_str())
            }
            NodeSource::Step { scenario, step } => feature
                .scenarios
                .get(scenario)
                .and_then(|s| s.steps.get(step))
                .map(|s| s.text.as_str()),
        }
        .unwrap_or_default();

        match self.label_max_chars {
            Some(max) => truncate_label(text, max),
            None => text.to_string(),
        }
    }
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

fn bottom_center(shape: &Shape) -> Point {
    Point::new(shape.center.x, shape.center.y - shape.size.height / 2.0)
}

fn top_center(shape: &Shape) -> Point {
    Point::new(shape.center.x, shape.center.y + shape.size.height / 2.0)
}

/// Cut `text` to at most `max` characters, ending in `..` when shortened.
/// Works on chars, so multi-byte text is never split mid-character.
/// Limits too small to hold the marker cut without it.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max < 3 {
        return text.chars().take(max).collect();
    }
    let keep = max - 2;
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("..");
    out
}
