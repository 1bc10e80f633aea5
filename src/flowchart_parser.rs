use indexmap::IndexMap;
use tracing::{debug, trace};
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::ParserError;
use winnow::prelude::*;
use winnow::token::{literal, take_till, take_while};

use crate::flowchart_ast::*;
use crate::syntax::{EDGE_OPERATORS, SHAPE_RULES, ShapeRule, detect_edge_style};

/// Parses flowchart text. Never fails: lines that match nothing are dropped.
///
/// The first line is always the header slot. `flowchart <DIR>` (or `graph
/// <DIR>`) sets the direction; an absent, unknown or malformed header leaves
/// it at `TD`.
pub fn parse(text: &str) -> FlowchartDocument {
    let _span = tracing::debug_span!("parse", bytes = text.len()).entered();

    let mut lines = text.lines();
    let direction = lines
        .next()
        .and_then(|first| header_direction(first.trim()))
        .unwrap_or_default();

    let mut builder = DocumentBuilder::default();
    for (index, raw) in lines.enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        // Line numbers are 1-based and count the header.
        let line_no = index + 2;
        match detect_edge_style(line) {
            Some(style) => builder.edge_line(line, style, line_no),
            None => builder.node_line(line, line_no),
        }
    }

    let document = builder.finish(direction);
    debug!(
        direction = %document.direction,
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "parsed flowchart"
    );
    document
}

#[derive(Default)]
struct DocumentBuilder {
    nodes: IndexMap<String, FlowchartNode>,
    edges: Vec<FlowchartEdge>,
}

impl DocumentBuilder {
    fn register(&mut self, node: FlowchartNode) {
        if self.nodes.contains_key(&node.id) {
            trace!(id = %node.id, "node already known, definition ignored");
            return;
        }
        self.nodes.insert(node.id.clone(), node);
    }

    fn vivify(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            debug!(id, "auto-vivified node referenced by edge");
            self.nodes.insert(id.to_string(), FlowchartNode::vivified(id));
        }
    }

    fn edge_line(&mut self, line: &str, style: EdgeStyle, line_no: usize) {
        for node in embedded_nodes(line) {
            self.register(node);
        }

        let mut input = line;
        let Ok(statement) = edge_statement(&mut input) else {
            debug!(line_no, line, "edge line did not match an edge statement");
            return;
        };
        if !input.trim().is_empty() {
            trace!(line_no, rest = input, "ignoring text after edge target");
        }

        self.vivify(statement.source);
        self.vivify(statement.target);
        let id = format!("e{}", self.edges.len());
        self.edges.push(FlowchartEdge {
            id,
            source: statement.source.to_string(),
            target: statement.target.to_string(),
            label: statement.label.map(str::to_string),
            style,
        });
    }

    fn node_line(&mut self, line: &str, line_no: usize) {
        let mut input = line;
        match node_definition(&mut input) {
            Ok(node) => self.register(node),
            Err(_) => debug!(line_no, line, "dropped unrecognized line"),
        }
    }

    fn finish(self, direction: Direction) -> FlowchartDocument {
        FlowchartDocument {
            direction,
            nodes: self.nodes.into_values().collect(),
            edges: self.edges,
        }
    }
}

struct EdgeStatement<'s> {
    source: &'s str,
    target: &'s str,
    label: Option<&'s str>,
}

fn header_direction(line: &str) -> Option<Direction> {
    let mut input = line;
    let word = header(&mut input).ok()?;
    Direction::from_keyword(word)
}

fn header<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    alt(("flowchart", "graph")).parse_next(input)?;
    space1.parse_next(input)?;
    identifier.parse_next(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., is_identifier_char).parse_next(input)
}

fn node_definition(input: &mut &str) -> winnow::Result<FlowchartNode> {
    let id = identifier.parse_next(input)?;
    let (shape, label) = shape_label.parse_next(input)?;
    Ok(FlowchartNode::new(id, label, shape))
}

/// Tries every rule of [`SHAPE_RULES`] in order.
fn shape_label(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    for rule in SHAPE_RULES {
        let start = *input;
        if let Ok(label) = rule_label(rule).parse_next(input) {
            return Ok((rule.shape, label));
        }
        *input = start;
    }
    Err(ParserError::from_input(input))
}

fn rule_label(rule: ShapeRule) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        literal(rule.open).parse_next(input)?;
        alt((quoted_label(rule), unquoted_label(rule))).parse_next(input)
    }
}

fn quoted_label(rule: ShapeRule) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        '"'.parse_next(input)?;
        let text = take_till(0.., '"').parse_next(input)?;
        '"'.parse_next(input)?;
        literal(rule.close).parse_next(input)?;
        Ok(text.to_string())
    }
}

/// Runs to the last `close` before the next edge operator, so the label may
/// hold any bracket, including the shape's own.
fn unquoted_label(rule: ShapeRule) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        let rest: &str = *input;
        let window = &rest[..statement_end(rest)];
        let Some(end) = window.rfind(rule.close) else {
            return Err(ParserError::from_input(input));
        };
        let (text, tail) = rest.split_at(end);
        *input = tail;
        literal(rule.close).parse_next(input)?;
        Ok(strip_quotes(text).to_string())
    }
}

/// Byte offset of the first edge operator in `text`, or its length.
fn statement_end(text: &str) -> usize {
    EDGE_OPERATORS
        .iter()
        .filter_map(|(_, op)| text.find(op))
        .min()
        .unwrap_or(text.len())
}

/// Removes one surrounding pair of `"`.
fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn edge_operator(input: &mut &str) -> winnow::Result<EdgeStyle> {
    let [(solid, solid_op), (dotted, dotted_op), (thick, thick_op)] = EDGE_OPERATORS;
    alt((
        solid_op.value(solid),
        dotted_op.value(dotted),
        thick_op.value(thick),
    ))
    .parse_next(input)
}

fn edge_label<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    '|'.parse_next(input)?;
    let text = take_till(0.., '|').parse_next(input)?;
    '|'.parse_next(input)?;
    Ok(text)
}

/// `id`, optionally followed by a shape. The shape itself is picked up by
/// [`embedded_nodes`].
fn endpoint<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    let id = identifier.parse_next(input)?;
    opt(shape_label).parse_next(input)?;
    Ok(id)
}

fn edge_statement<'s>(input: &mut &'s str) -> winnow::Result<EdgeStatement<'s>> {
    let source = endpoint.parse_next(input)?;
    space0.parse_next(input)?;
    // The edge style was already decided from the whole line.
    edge_operator.void().parse_next(input)?;
    let label = opt(preceded(space0, edge_label)).parse_next(input)?;
    space0.parse_next(input)?;
    let target = endpoint.parse_next(input)?;
    Ok(EdgeStatement {
        source,
        target,
        label,
    })
}

/// Every `id<shape>` that starts at a word boundary, left to right.
/// Text between `|` pairs is an edge label and is skipped.
fn embedded_nodes(line: &str) -> Vec<FlowchartNode> {
    let mut found = Vec::new();
    let mut rest = line;
    let mut at_boundary = true;

    while let Some(c) = rest.chars().next() {
        if at_boundary && is_identifier_char(c) {
            let mut candidate = rest;
            if let Ok(node) = node_definition(&mut candidate) {
                found.push(node);
                rest = candidate;
                continue;
            }
        }
        if c == '|' {
            if let Some(end) = rest[1..].find('|') {
                rest = &rest[end + 2..];
                at_boundary = true;
                continue;
            }
        }
        at_boundary = !is_identifier_char(c);
        rest = &rest[c.len_utf8()..];
    }

    found
}
