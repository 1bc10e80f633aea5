//! Bracket and arrow syntax shared by the parser and the generator.
//!
//! Both directions read the delimiters from here, so `generate` always emits
//! what `parse` accepts.

use crate::flowchart_ast::{EdgeStyle, NodeShape};

/// One node-shape syntax: `{id}{open}{label}{close}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRule {
    pub shape: NodeShape,
    pub open: &'static str,
    pub close: &'static str,
}

impl ShapeRule {
    pub const fn of(shape: NodeShape) -> Self {
        let (open, close) = shape.delimiters();
        ShapeRule { shape, open, close }
    }
}

/// Shape rules in matching order.
///
/// A rule always precedes every rule whose `open` is a prefix of its own, so
/// `(((` is tried before `((`, which is tried before `(`.
pub const SHAPE_RULES: [ShapeRule; 13] = [
    ShapeRule::of(NodeShape::DoubleCircle),
    ShapeRule::of(NodeShape::Circle),
    ShapeRule::of(NodeShape::Stadium),
    ShapeRule::of(NodeShape::Round),
    ShapeRule::of(NodeShape::Hexagon),
    ShapeRule::of(NodeShape::Rhombus),
    ShapeRule::of(NodeShape::Cylinder),
    ShapeRule::of(NodeShape::Parallelogram),
    ShapeRule::of(NodeShape::Trapezoid),
    ShapeRule::of(NodeShape::ParallelogramAlt),
    ShapeRule::of(NodeShape::TrapezoidAlt),
    ShapeRule::of(NodeShape::Rectangle),
    ShapeRule::of(NodeShape::Asymmetric),
];

/// Edge operators in detection order.
pub const EDGE_OPERATORS: [(EdgeStyle, &str); 3] = [
    (EdgeStyle::Solid, EdgeStyle::Solid.operator()),
    (EdgeStyle::Dotted, EdgeStyle::Dotted.operator()),
    (EdgeStyle::Thick, EdgeStyle::Thick.operator()),
];

impl NodeShape {
    /// `(open, close)` around the label.
    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            NodeShape::DoubleCircle => ("(((", ")))"),
            NodeShape::Circle => ("((", "))"),
            NodeShape::Stadium => ("([", "])"),
            NodeShape::Round => ("(", ")"),
            NodeShape::Hexagon => ("{{", "}}"),
            NodeShape::Rhombus => ("{", "}"),
            NodeShape::Cylinder => ("[(", ")]"),
            NodeShape::Parallelogram => ("[/", "/]"),
            NodeShape::Trapezoid => ("[/", "\\\\]"),
            NodeShape::ParallelogramAlt => ("[\\\\", "\\\\]"),
            NodeShape::TrapezoidAlt => ("[\\\\", "/]"),
            NodeShape::Rectangle => ("[", "]"),
            NodeShape::Asymmetric => (">", "]"),
        }
    }

    pub const fn rule(self) -> ShapeRule {
        ShapeRule::of(self)
    }

    pub fn open(self) -> &'static str {
        self.delimiters().0
    }

    pub fn close(self) -> &'static str {
        self.delimiters().1
    }

    /// Wraps `label` in this shape's delimiters. Labels are not escaped.
    pub fn wrap(self, label: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{open}{label}{close}")
    }
}

impl EdgeStyle {
    pub const fn operator(self) -> &'static str {
        match self {
            EdgeStyle::Solid => "-->",
            EdgeStyle::Dotted => "-.->",
            EdgeStyle::Thick => "==>",
        }
    }
}

/// The style of the first operator, in [`EDGE_OPERATORS`] order, that occurs
/// anywhere in `line`.
pub fn detect_edge_style(line: &str) -> Option<EdgeStyle> {
    EDGE_OPERATORS
        .iter()
        .find(|(_, op)| line.contains(op))
        .map(|(style, _)| *style)
}
