//! Sizing of flowchart nodes for the layout engine.

use unicode_width::UnicodeWidthStr;

use crate::flowchart_ast::{FlowchartDocument, FlowchartNode, NodeShape};
use crate::graph_layout::{GraphEdge, GraphNode, LayoutNode, LayoutOptions, layout_nodes};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeOptions {
    /// Width of one terminal column of label text.
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_width: f64,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding_x: 16.0,
            padding_y: 10.0,
            min_width: 40.0,
        }
    }
}

/// Splits a label on `<br>`, `<br/>` and `<br />`, ignoring case.
pub fn split_lines(label: &str) -> Vec<&str> {
    let lower = label.to_ascii_lowercase();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(found) = lower[search..].find("<br") {
        let tag = search + found;
        let after = lower[tag + 3..].trim_start_matches(' ');
        let after = after.strip_prefix('/').unwrap_or(after);
        match after.strip_prefix('>') {
            Some(rest) => {
                lines.push(&label[start..tag]);
                start = lower.len() - rest.len();
                search = start;
            }
            None => search = tag + 3,
        }
    }

    lines.push(&label[start..]);
    lines
}

/// Widest line of `label`, in terminal columns.
pub fn label_width(label: &str) -> usize {
    split_lines(label)
        .into_iter()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
}

/// `(width, height)` of a node: its label box, widened for slanted and
/// pointed shapes, squared for circles.
pub fn node_size(node: &FlowchartNode, options: &SizeOptions) -> (f64, f64) {
    let text_width = label_width(&node.label) as f64 * options.char_width;
    let text_height = split_lines(&node.label).len() as f64 * options.line_height;
    let width = (text_width + 2.0 * options.padding_x).max(options.min_width);
    let height = text_height + 2.0 * options.padding_y;

    match node.shape {
        NodeShape::Circle => {
            let side = width.max(height);
            (side, side)
        }
        NodeShape::DoubleCircle => {
            let side = width.max(height) + options.padding_y;
            (side, side)
        }
        NodeShape::Rhombus => (width + height, height + height / 2.0),
        NodeShape::Hexagon
        | NodeShape::Parallelogram
        | NodeShape::ParallelogramAlt
        | NodeShape::Trapezoid
        | NodeShape::TrapezoidAlt => (width + height / 2.0, height),
        NodeShape::Asymmetric => (width + height / 4.0, height),
        NodeShape::Rectangle | NodeShape::Round | NodeShape::Stadium | NodeShape::Cylinder => (width, height),
    }
}

/// Converts a document into the layout engine's sized graph, preserving order.
pub fn document_graph(document: &FlowchartDocument, options: &SizeOptions) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let nodes = document
        .nodes
        .iter()
        .map(|node| {
            let (width, height) = node_size(node, options);
            GraphNode::new(node.id.clone(), width, height)
        })
        .collect();
    let edges = document
        .edges
        .iter()
        .map(|edge| GraphEdge::new(edge.id.clone(), edge.source.clone(), edge.target.clone()))
        .collect();
    (nodes, edges)
}

pub fn layout_document(
    document: &FlowchartDocument,
    layout: &LayoutOptions,
    sizes: &SizeOptions,
) -> Vec<LayoutNode> {
    let (nodes, edges) = document_graph(document, sizes);
    layout_nodes(&nodes, &edges, layout)
}
