pub mod error;
pub mod flowchart_ast;
pub mod flowchart_generator;
pub mod flowchart_parser;
pub mod graph_layout;
pub mod node_size;
pub mod syntax;
pub mod topo_sort;

pub use error::{Error, Result};
pub use flowchart_ast::{
    Direction, EdgeLink, EdgeStyle, FlowchartDocument, FlowchartEdge, FlowchartNode, NodeKey, NodeShape,
};
pub use flowchart_generator::{GenerateOptions, format, generate, generate_document};
pub use flowchart_parser::parse;
pub use graph_layout::{ComponentMode, GraphEdge, GraphNode, LayoutNode, LayoutOptions, layout_nodes};
pub use node_size::{SizeOptions, document_graph, layout_document};
pub use topo_sort::topological_sort;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_then_layout_document() {
        let doc = parse("flowchart LR\n    A[Start] --> B[End]\n");
        let layout = layout_document(
            &doc,
            &LayoutOptions {
                direction: doc.direction,
                ..LayoutOptions::default()
            },
            &SizeOptions::default(),
        );
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[1].id, "B");
        assert!(layout[1].x > layout[0].x, "LR places B right of A");
        assert_eq!(layout[0].y, layout[1].y);
    }

    #[test]
    fn sort_parsed_document() {
        let doc = parse("flowchart TD\n    C --> D\n    B --> C\n");
        let order: Vec<_> = topological_sort(&doc.nodes, &doc.edges)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "D"]);
    }
}
