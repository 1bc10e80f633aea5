use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Top-down. `TB` is accepted as an alias.
    #[default]
    #[serde(rename = "TD", alias = "TB")]
    TopDown,
    #[serde(rename = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    /// Resolves a header keyword. Case-sensitive.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    /// True when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// True when ranks advance towards negative coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| Error::UnknownDirection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Rhombus,
    Round,
    Stadium,
    Cylinder,
    Circle,
    Asymmetric,
    Hexagon,
    Parallelogram,
    ParallelogramAlt,
    Trapezoid,
    TrapezoidAlt,
    DoubleCircle,
}

impl NodeShape {
    pub const ALL: [NodeShape; 13] = [
        NodeShape::Rectangle,
        NodeShape::Rhombus,
        NodeShape::Round,
        NodeShape::Stadium,
        NodeShape::Cylinder,
        NodeShape::Circle,
        NodeShape::Asymmetric,
        NodeShape::Hexagon,
        NodeShape::Parallelogram,
        NodeShape::ParallelogramAlt,
        NodeShape::Trapezoid,
        NodeShape::TrapezoidAlt,
        NodeShape::DoubleCircle,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dotted,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub shape: NodeShape,
}

impl FlowchartNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
        }
    }

    /// The node created for an id that an edge mentions before any definition.
    pub fn vivified(id: &str) -> Self {
        Self::new(id, id, NodeShape::Rectangle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl FlowchartEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            style: EdgeStyle::Solid,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowchartDocument {
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub nodes: Vec<FlowchartNode>,
    #[serde(default)]
    pub edges: Vec<FlowchartEdge>,
}

impl FlowchartDocument {
    pub fn node(&self, id: &str) -> Option<&FlowchartNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Anything with a node id. Lets [`crate::topo_sort`] work over either the
/// flowchart model or the layout model.
pub trait NodeKey {
    fn key(&self) -> &str;
}

/// Anything connecting two node ids.
pub trait EdgeLink {
    fn source(&self) -> &str;
    fn target(&self) -> &str;
}

impl NodeKey for FlowchartNode {
    fn key(&self) -> &str {
        &self.id
    }
}

impl EdgeLink for FlowchartEdge {
    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn direction_tb_is_top_down() {
        assert_eq!(Direction::from_keyword("TB"), Some(Direction::TopDown));
        assert_eq!(Direction::from_keyword("TD"), Some(Direction::TopDown));
        assert_eq!(Direction::from_keyword("td"), None);
    }

    #[test]
    fn direction_from_str_reports_unknown_keyword() {
        let err = "XY".parse::<Direction>().unwrap_err();
        assert_eq!(err.to_string(), "unknown direction: XY");
        assert_eq!("RL".parse::<Direction>().unwrap(), Direction::RightLeft);
    }

    #[test]
    fn shape_serializes_kebab_case() {
        let json = serde_json::to_string(&NodeShape::ParallelogramAlt).unwrap();
        assert_eq!(json, "\"parallelogram-alt\"");
        let shape: NodeShape = serde_json::from_str("\"double-circle\"").unwrap();
        assert_eq!(shape, NodeShape::DoubleCircle);
    }

    #[test]
    fn document_json_defaults_missing_fields() {
        let doc = FlowchartDocument::from_json(
            r#"{"nodes":[{"id":"A","label":"a"}],"edges":[{"id":"x","source":"A","target":"A"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.direction, Direction::TopDown);
        assert_eq!(doc.nodes[0].shape, NodeShape::Rectangle);
        assert_eq!(doc.edges[0].style, EdgeStyle::Solid);
        assert_eq!(doc.edges[0].label, None);
    }

    #[test]
    fn document_json_accepts_tb_alias() {
        let doc = FlowchartDocument::from_json(r#"{"direction":"TB"}"#).unwrap();
        assert_eq!(doc.direction, Direction::TopDown);
        assert!(doc.to_json().unwrap().contains("\"TD\""));
    }
}
