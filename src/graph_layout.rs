use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::flowchart_ast::{Direction, EdgeLink, NodeKey};

/// A node to be placed. `x`/`y` carry the caller's current position and are
/// not read by the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            x: None,
            y: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// How nodes are grouped into independently laid out components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentMode {
    /// Depth-first along outgoing edges only, from each unvisited node in
    /// input order. A node visited before its predecessors ends up in its own
    /// component.
    #[default]
    Forward,
    /// Edges are followed in both directions.
    Undirected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub node_spacing: f64,
    pub rank_spacing: f64,
    pub components: ComponentMode,
}

pub const DEFAULT_NODE_SPACING: f64 = 50.0;
pub const DEFAULT_RANK_SPACING: f64 = 100.0;

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown,
            node_spacing: DEFAULT_NODE_SPACING,
            rank_spacing: DEFAULT_RANK_SPACING,
            components: ComponentMode::Forward,
        }
    }
}

impl NodeKey for GraphNode {
    fn key(&self) -> &str {
        &self.id
    }
}

impl EdgeLink for GraphEdge {
    fn source(&self) -> &str {
        &self.source
    }

    fn target(&self) -> &str {
        &self.target
    }
}

/// Assigns coordinates to `nodes`. Never fails; empty input gives empty output.
///
/// Components are placed side by side along the node axis (x for TD/BT, y for
/// LR/RL). Within a component, ranks are `rank_spacing` apart along the rank
/// axis and each rank is centered on 0 before the component offset is added.
/// Results come out component by component, rank by rank.
pub fn layout_nodes(nodes: &[GraphNode], edges: &[GraphEdge], options: &LayoutOptions) -> Vec<LayoutNode> {
    let _span = tracing::debug_span!("layout_nodes", nodes = nodes.len(), edges = edges.len()).entered();

    let graph = Adjacency::build(nodes, edges);
    let components = graph.components(options.components);
    let direction = options.direction;

    let mut result = Vec::with_capacity(graph.nodes.len());
    let mut component_offset = 0.0;

    for (index, component) in components.iter().enumerate() {
        let ranks = graph.assign_ranks(component);
        let placed = place_component(&graph, component, &ranks, options, component_offset);
        debug!(
            index,
            nodes = component.len(),
            ranks = ranks.values().max().map_or(0, |r| r + 1),
            offset = component_offset,
            "placed component"
        );
        result.extend(placed);

        let max_extent = component
            .iter()
            .map(|&i| node_extent(graph.nodes[i], direction))
            .fold(0.0, f64::max);
        component_offset += max_extent + options.rank_spacing;
    }

    result
}

/// Size of a node along the node axis.
fn node_extent(node: &GraphNode, direction: Direction) -> f64 {
    if direction.is_horizontal() {
        node.height
    } else {
        node.width
    }
}

struct Adjacency<'a> {
    /// First occurrence of each id, in input order.
    nodes: Vec<&'a GraphNode>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl<'a> Adjacency<'a> {
    fn build(nodes: &'a [GraphNode], edges: &[GraphEdge]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !index.contains_key(node.id.as_str()) {
                index.insert(node.id.as_str(), unique.len());
                unique.push(node);
            }
        }

        let n = unique.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut in_degree = vec![0; n];
        for edge in edges {
            let (Some(&from), Some(&to)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
            else {
                continue;
            };
            outgoing[from].push(to);
            incoming[to].push(from);
            in_degree[to] += 1;
        }

        Self {
            nodes: unique,
            outgoing,
            incoming,
            in_degree,
        }
    }

    /// Pre-order depth-first traversal from every unvisited node, in input order.
    fn components(&self, mode: ComponentMode) -> Vec<Vec<usize>> {
        let n = self.nodes.len();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(current) = stack.pop() {
                if visited[current] {
                    continue;
                }
                visited[current] = true;
                component.push(current);

                let mut neighbors: Vec<usize> = self.outgoing[current].clone();
                if mode == ComponentMode::Undirected {
                    neighbors.extend(&self.incoming[current]);
                }
                // Reversed so the first neighbor is visited first.
                stack.extend(neighbors.into_iter().rev().filter(|&next| !visited[next]));
            }
            components.push(component);
        }

        components
    }

    /// Breadth-first ranks from the component's in-degree-0 nodes (or its first
    /// node when there are none). Nodes the search never reaches get rank 0.
    fn assign_ranks(&self, component: &[usize]) -> HashMap<usize, usize> {
        let members: HashSet<usize> = component.iter().copied().collect();
        let mut ranks: HashMap<usize, usize> = HashMap::with_capacity(component.len());
        let mut queue = VecDeque::new();

        for &i in component {
            if self.in_degree[i] == 0 {
                ranks.insert(i, 0);
                queue.push_back(i);
            }
        }
        if queue.is_empty() {
            if let Some(&first) = component.first() {
                ranks.insert(first, 0);
                queue.push_back(first);
            }
        }

        while let Some(current) = queue.pop_front() {
            let next_rank = ranks.get(&current).map_or(1, |r| r + 1);
            for &next in &self.outgoing[current] {
                if members.contains(&next) && !ranks.contains_key(&next) {
                    ranks.insert(next, next_rank);
                    queue.push_back(next);
                }
            }
        }

        for &i in component {
            ranks.entry(i).or_insert(0);
        }
        ranks
    }
}

fn place_component(
    graph: &Adjacency<'_>,
    component: &[usize],
    ranks: &HashMap<usize, usize>,
    options: &LayoutOptions,
    component_offset: f64,
) -> Vec<LayoutNode> {
    let direction = options.direction;

    let mut by_rank: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &i in component {
        let rank = ranks.get(&i).copied().unwrap_or(0);
        by_rank.entry(rank).or_default().push(i);
    }

    let mut placed = Vec::with_capacity(component.len());
    for (rank, members) in &by_rank {
        let mut positions = Vec::with_capacity(members.len());
        let mut cursor = 0.0;
        for &i in members {
            positions.push(cursor);
            cursor += node_extent(graph.nodes[i], direction) + options.node_spacing;
        }

        let min = positions.iter().copied().fold(f64::INFINITY, f64::min);
        let max = positions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let center = (min + max) / 2.0;

        let rank_position = *rank as f64 * options.rank_spacing;
        let rank_position = if direction.is_reversed() {
            0.0 - rank_position
        } else {
            rank_position
        };

        for (&i, position) in members.iter().zip(positions) {
            let along = position - center + component_offset;
            let (x, y) = if direction.is_horizontal() {
                (rank_position, along)
            } else {
                (along, rank_position)
            };
            placed.push(LayoutNode {
                id: graph.nodes[i].id.clone(),
                x,
                y,
            });
        }
    }

    placed
}
