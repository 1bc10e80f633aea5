use std::collections::{HashMap, VecDeque};

use indexmap::IndexSet;

use crate::flowchart_ast::{EdgeLink, NodeKey};

/// Orders `nodes` so every node comes after its predecessors (Kahn's algorithm).
///
/// Edges touching ids outside `nodes` are ignored and repeated edges count
/// once. Nodes the queue never reaches (cycle members and anything downstream
/// of a cycle) are appended in input order, so the output always has the same
/// length as the input.
pub fn topological_sort<'a, N, E>(nodes: &'a [N], edges: &[E]) -> Vec<&'a N>
where
    N: NodeKey,
    E: EdgeLink,
{
    let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        first_index.entry(node.key()).or_insert(i);
    }

    let mut successors: HashMap<&str, IndexSet<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = first_index.keys().map(|&id| (id, 0)).collect();
    for edge in edges {
        let (source, target) = (edge.source(), edge.target());
        if !first_index.contains_key(source) || !first_index.contains_key(target) {
            continue;
        }
        if successors.entry(source).or_default().insert(target) {
            *in_degree.entry(target).or_default() += 1;
        }
    }

    let mut placed = vec![false; nodes.len()];
    let mut order: Vec<&'a N> = Vec::with_capacity(nodes.len());
    let mut queue: VecDeque<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| in_degree.get(node.key()) == Some(&0))
        .map(|(i, _)| i)
        .collect();

    while let Some(i) = queue.pop_front() {
        placed[i] = true;
        order.push(&nodes[i]);

        // A repeated id releases its successors only once.
        if first_index.get(nodes[i].key()) != Some(&i) {
            continue;
        }
        let Some(next) = successors.get(nodes[i].key()) else {
            continue;
        };
        for &target in next {
            let Some(degree) = in_degree.get_mut(target) else {
                continue;
            };
            *degree -= 1;
            if *degree == 0 {
                if let Some(&j) = first_index.get(target) {
                    queue.push_back(j);
                }
            }
        }
    }

    let remaining = nodes.len() - order.len();
    if remaining > 0 {
        tracing::debug!(remaining, "nodes left unordered by cycles, appended in input order");
    }
    order.extend(nodes.iter().zip(&placed).filter(|&(_, &done)| !done).map(|(node, _)| node));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowchart_ast::{FlowchartEdge, FlowchartNode, NodeShape};
    use pretty_assertions::assert_eq;

    fn nodes(ids: &[&str]) -> Vec<FlowchartNode> {
        ids.iter()
            .map(|id| FlowchartNode::new(*id, *id, NodeShape::Rectangle))
            .collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<FlowchartEdge> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (s, t))| FlowchartEdge::new(format!("e{i}"), *s, *t))
            .collect()
    }

    fn ids<'a>(sorted: &[&'a FlowchartNode]) -> Vec<&'a str> {
        sorted.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn sort_chain_reversed_input() {
        let n = nodes(&["C", "B", "A"]);
        let e = edges(&[("A", "B"), ("B", "C")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["A", "B", "C"]);
    }

    #[test]
    fn sort_roots_keep_input_order() {
        let n = nodes(&["X", "A", "Y"]);
        let e = edges(&[("A", "Y")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["X", "A", "Y"]);
    }

    #[test]
    fn sort_cycle_goes_to_tail_in_input_order() {
        let n = nodes(&["C", "R", "B"]);
        let e = edges(&[("B", "C"), ("C", "B")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["R", "C", "B"]);
    }

    #[test]
    fn sort_self_loop_is_unordered() {
        let n = nodes(&["A", "B"]);
        let e = edges(&[("A", "A")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["B", "A"]);
    }

    #[test]
    fn sort_duplicate_edges_count_once() {
        let n = nodes(&["B", "A"]);
        let e = edges(&[("A", "B"), ("A", "B")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["A", "B"]);
    }

    #[test]
    fn sort_ignores_foreign_edges() {
        let n = nodes(&["B", "A"]);
        let e = edges(&[("Z", "A"), ("B", "Q")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["B", "A"]);
    }

    #[test]
    fn sort_repeated_node_ids_keep_length() {
        let n = nodes(&["A", "A", "B"]);
        let e = edges(&[("A", "B")]);
        assert_eq!(ids(&topological_sort(&n, &e)), vec!["A", "A", "B"]);
    }

    #[test]
    fn sort_empty() {
        let n: Vec<FlowchartNode> = Vec::new();
        let e: Vec<FlowchartEdge> = Vec::new();
        assert!(topological_sort(&n, &e).is_empty());
    }
}
