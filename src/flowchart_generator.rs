use crate::flowchart_ast::*;
use crate::flowchart_parser::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerateOptions {
    pub direction: Direction,
}

/// Writes nodes and edges back as flowchart text, in the given order.
///
/// Edge ids are not part of the notation and are dropped. Labels are written
/// verbatim, without quoting.
pub fn generate(nodes: &[FlowchartNode], edges: &[FlowchartEdge], options: &GenerateOptions) -> String {
    let mut lines = Vec::with_capacity(1 + nodes.len() + edges.len());
    lines.push(format!("flowchart {}", options.direction));

    for node in nodes {
        lines.push(format!("  {}{}", node.id, node.shape.wrap(&node.label)));
    }

    for edge in edges {
        let op = edge.style.operator();
        let line = match &edge.label {
            Some(label) => format!("  {} {op}|{label}| {}", edge.source, edge.target),
            None => format!("  {} {op} {}", edge.source, edge.target),
        };
        lines.push(line);
    }

    lines.join("\n")
}

pub fn generate_document(document: &FlowchartDocument) -> String {
    let options = GenerateOptions {
        direction: document.direction,
    };
    generate(&document.nodes, &document.edges, &options)
}

/// Normalizes flowchart text: parse, then generate.
pub fn format(text: &str) -> String {
    generate_document(&parse(text))
}
