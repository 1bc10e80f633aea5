use flowc::{ComponentMode, Direction, GraphEdge, GraphNode, LayoutNode, LayoutOptions, layout_nodes};
use pretty_assertions::assert_eq;

fn node(id: &str) -> GraphNode {
    GraphNode::new(id, 120.0, 40.0)
}

fn edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge::new(format!("{source}->{target}"), source, target)
}

fn find<'a>(layout: &'a [LayoutNode], id: &str) -> &'a LayoutNode {
    layout.iter().find(|n| n.id == id).unwrap()
}

fn with_direction(direction: Direction) -> LayoutOptions {
    LayoutOptions {
        direction,
        ..LayoutOptions::default()
    }
}

#[test]
fn single_node_at_origin() {
    let layout = layout_nodes(&[node("A")], &[], &LayoutOptions::default());
    assert_eq!(layout, vec![LayoutNode { id: "A".into(), x: 0.0, y: 0.0 }]);
}

#[test]
fn chain_places_second_node_below_first() {
    let nodes = [node("A"), node("B")];
    let layout = layout_nodes(&nodes, &[edge("A", "B")], &LayoutOptions::default());
    let (a, b) = (find(&layout, "A"), find(&layout, "B"));
    assert!(b.y > a.y + nodes[0].height, "B at {} should be below A's bottom", b.y);
    assert_eq!(a.x, b.x);
}

#[test]
fn direction_axis_mapping() {
    let nodes = [node("A"), node("B")];
    let edges = [edge("A", "B")];

    let lr = layout_nodes(&nodes, &edges, &with_direction(Direction::LeftRight));
    assert_eq!((find(&lr, "B").x, find(&lr, "B").y), (100.0, 0.0));

    let rl = layout_nodes(&nodes, &edges, &with_direction(Direction::RightLeft));
    assert_eq!((find(&rl, "B").x, find(&rl, "B").y), (-100.0, 0.0));

    let bt = layout_nodes(&nodes, &edges, &with_direction(Direction::BottomTop));
    assert_eq!((find(&bt, "B").x, find(&bt, "B").y), (0.0, -100.0));
}

#[test]
fn disconnected_chains_do_not_overlap() {
    let nodes = [node("A"), node("B"), node("C"), node("D")];
    let edges = [edge("A", "B"), edge("C", "D")];

    for direction in [Direction::TopDown, Direction::LeftRight] {
        let layout = layout_nodes(&nodes, &edges, &with_direction(direction));
        let along = |n: &LayoutNode| if direction.is_horizontal() { n.y } else { n.x };
        let extent = if direction.is_horizontal() { 40.0 } else { 120.0 };

        let first_end = ["A", "B"]
            .iter()
            .map(|id| along(find(&layout, id)) + extent)
            .fold(f64::NEG_INFINITY, f64::max);
        let second_start = ["C", "D"]
            .iter()
            .map(|id| along(find(&layout, id)))
            .fold(f64::INFINITY, f64::min);
        assert!(second_start > first_end, "{direction}: {second_start} <= {first_end}");
    }
}

#[test]
fn output_order_is_component_then_rank() {
    let nodes = [node("C"), node("A"), node("B"), node("X")];
    let edges = [edge("A", "B"), edge("A", "C"), edge("X", "X")];
    let layout = layout_nodes(&nodes, &edges, &LayoutOptions::default());
    let ids: Vec<_> = layout.iter().map(|n| n.id.as_str()).collect();
    // C is visited first and has no outgoing edges, so it is alone.
    assert_eq!(ids, vec!["C", "A", "B", "X"]);
}

#[test]
fn spacing_options_are_applied() {
    let nodes = [node("A"), node("B"), node("C")];
    let edges = [edge("A", "B"), edge("A", "C")];
    let options = LayoutOptions {
        node_spacing: 30.0,
        rank_spacing: 70.0,
        ..LayoutOptions::default()
    };
    let layout = layout_nodes(&nodes, &edges, &options);
    assert_eq!(find(&layout, "B").y, 70.0);
    assert_eq!(find(&layout, "C").x - find(&layout, "B").x, 150.0);
    assert_eq!(find(&layout, "B").x + find(&layout, "C").x, 0.0);
}

#[test]
fn undirected_mode_is_opt_in() {
    let nodes = [node("B"), node("A")];
    let edges = [edge("A", "B")];

    let forward = layout_nodes(&nodes, &edges, &LayoutOptions::default());
    assert_eq!(find(&forward, "A").y, find(&forward, "B").y);

    let undirected = LayoutOptions {
        components: ComponentMode::Undirected,
        ..LayoutOptions::default()
    };
    let merged = layout_nodes(&nodes, &edges, &undirected);
    assert_eq!(find(&merged, "B").y, 100.0);
    assert_eq!(find(&merged, "A").x, find(&merged, "B").x);
}

#[test]
fn caller_positions_are_neither_read_nor_changed() {
    let mut placed = node("A");
    placed.x = Some(500.0);
    placed.y = Some(-20.0);
    let nodes = [placed.clone(), node("B")];
    let edges = [edge("A", "B")];

    let layout = layout_nodes(&nodes, &edges, &LayoutOptions::default());
    assert_eq!(nodes[0], placed);
    assert_eq!(layout, layout_nodes(&[node("A"), node("B")], &edges, &LayoutOptions::default()));
}
