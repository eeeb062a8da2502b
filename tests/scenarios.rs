use classviz::config::ViewerConfig;
use classviz::dataset::{ClassDetail, Classes, Structure};
use classviz::graph::{GraphRepository, NodeClass};
use classviz::layout::{Layout, NodeKey};
use classviz::state::{DetailState, PropertyClass};
use classviz::tree::TreeRepository;

fn graph(structure: &[Structure], classes: &Classes) -> GraphRepository {
    let layout = Layout::build(structure, classes, 1000.0);
    let mut graph = GraphRepository::new(layout, classes.clone(), &ViewerConfig::default());
    graph.on_resize(1000.0, 1000.0, 1000.0);
    graph
}

fn key_of(graph: &GraphRepository, uri: &str) -> NodeKey {
    graph
        .nodes()
        .iter()
        .find(|node| node.uri == uri)
        .map(|node| node.key)
        .unwrap_or_else(|| panic!("no node for {uri}"))
}

fn visible_uris(graph: &GraphRepository) -> Vec<String> {
    let mut uris: Vec<String> = graph
        .visible_keys()
        .map(|key| graph.nodes()[key].uri.clone())
        .filter(|uri| !uri.is_empty())
        .collect();
    uris.sort();
    uris.dedup();
    uris
}

fn focusing(graph: &GraphRepository, uri: &str) -> DetailState {
    DetailState {
        focusing_uri: Some(uri.to_owned()),
        focusing_circle_key: Some(key_of(graph, uri)),
        ..DetailState::default()
    }
}

fn chain() -> Vec<Structure> {
    vec![Structure::with_children(
        "A",
        vec![Structure::with_children("B", vec![Structure::leaf("C")])],
    )]
}

#[test]
fn focusing_along_a_chain_keeps_it_visible() {
    let mut graph = graph(&chain(), &Classes::new());

    graph.update(&focusing(&graph, "A"), false, 0.0);
    assert_eq!(visible_uris(&graph), ["A", "B", "C"]);

    graph.update(&focusing(&graph, "B"), false, 0.0);
    assert_eq!(visible_uris(&graph), ["A", "B", "C"]);
    assert_eq!(graph.target_key(), Some(key_of(&graph, "B")));
    assert!(graph.nodes()[key_of(&graph, "A")].is_label_on_top);

    graph.update(&DetailState::default(), false, 0.0);
    assert!(graph.is_visible(key_of(&graph, "A")));
}

#[test]
fn keys_are_dense_in_arena_order() {
    let structure = vec![
        Structure::with_children("A", vec![Structure::leaf("B"), Structure::leaf("C")]),
        Structure::with_children("D", vec![Structure::with_children("E", vec![Structure::leaf("F")])]),
    ];
    let layout = Layout::build(&structure, &Classes::new(), 1000.0);

    let keys: Vec<NodeKey> = layout.nodes.iter().map(|node| node.key).collect();
    assert_eq!(keys, (0..layout.len()).collect::<Vec<_>>());
    assert_eq!(layout.len(), 7);
    assert!(layout.root().is_some_and(|root| root.uri.is_empty()));
}

fn diamond() -> (Vec<Structure>, Classes) {
    let structure = vec![
        Structure::with_children("B", vec![Structure::leaf("D")]),
        Structure::with_children("C", vec![Structure::leaf("D")]),
    ];
    let mut classes = Classes::new();
    classes.insert(
        "D".to_owned(),
        ClassDetail {
            sub_class_of: Some(vec!["B".to_owned(), "C".to_owned()]),
            ..ClassDetail::default()
        },
    );
    (structure, classes)
}

#[test]
fn multiple_inheritance_points_at_the_other_parent() {
    let (structure, classes) = diamond();
    let layout = Layout::build(&structure, &classes, 1000.0);
    let key = |uri: &str, parent: Option<&str>| {
        layout
            .nodes
            .iter()
            .find(|node| {
                node.uri == uri
                    && parent.is_none_or(|parent| {
                        node.parent.is_some_and(|key| layout.nodes[key].uri == parent)
                    })
            })
            .map(|node| node.key)
            .unwrap_or_else(|| panic!("no node for {uri}"))
    };
    let d_under_b = key("D", Some("B"));
    let d_under_c = key("D", Some("C"));
    assert_ne!(d_under_b, d_under_c);

    let tree = TreeRepository::new(&layout, classes, &ViewerConfig::default());
    assert_eq!(tree.multiple_inheritance_nodes(d_under_b), vec![key("C", None)]);
    assert_eq!(tree.multiple_inheritance_nodes(d_under_c), vec![key("B", None)]);
}

#[test]
fn tree_follows_the_focus_and_diffs_by_uri() {
    let structure = vec![Structure::with_children(
        "A",
        vec![
            Structure::with_children("B", vec![Structure::leaf("D")]),
            Structure::leaf("C"),
        ],
    )];
    let layout = Layout::build(&structure, &Classes::new(), 1000.0);
    let mut tree = TreeRepository::new(&layout, Classes::new(), &ViewerConfig::default());
    let key = |uri: &str| layout.nodes.iter().find(|node| node.uri == uri).map(|node| node.key);

    assert!(tree.show(key("A"), 0.0));
    assert!(tree.diff().appends("A"));
    assert!(tree.diff().remove.is_empty());

    tree.tick(10.0);
    assert!(tree.show(key("B"), 10.0));
    assert!(!tree.diff().appends("B"));
    assert_eq!(tree.focusing_key(), key("B"));

    assert!(!tree.show(None, 20.0));
}

#[test]
fn property_view_classes_domain_and_range() {
    let structure = vec![Structure::leaf("X"), Structure::leaf("Y")];
    let mut classes = Classes::new();
    classes.insert(
        "X".to_owned(),
        ClassDetail {
            rhs: Some(vec![("p1".to_owned(), "Y".to_owned())]),
            ..ClassDetail::default()
        },
    );
    classes.insert(
        "Y".to_owned(),
        ClassDetail {
            lhs: Some(vec![("X".to_owned(), "p1".to_owned())]),
            ..ClassDetail::default()
        },
    );
    let detail = DetailState {
        property_class: PropertyClass {
            uri: Some("p1".to_owned()),
            domain: Some("X".to_owned()),
            range: Some("Y".to_owned()),
        },
        ..DetailState::default()
    };

    let classify = |classes: &Classes| {
        let mut graph = graph(&structure, classes);
        graph.update(&detail, false, 0.0);
        let x = graph.node_class(key_of(&graph, "X"));
        let y = graph.node_class(key_of(&graph, "Y"));
        (x, y, graph.frame().lines.len())
    };

    let (x, y, lines) = classify(&classes);
    assert!(x.is_some_and(NodeClass::is_domain));
    assert!(y.is_some_and(NodeClass::is_range));
    assert_eq!(lines, 1);

    let bare: Classes = classes
        .keys()
        .map(|uri| (uri.clone(), ClassDetail::default()))
        .collect();
    assert_eq!(classify(&bare), (x, y, lines));
}

#[test]
fn repeated_focus_assigns_the_same_classes() {
    let structure = vec![
        Structure::with_children("A", vec![Structure::leaf("B"), Structure::leaf("C")]),
        Structure::leaf("D"),
    ];
    let mut classes = Classes::new();
    classes.insert(
        "B".to_owned(),
        ClassDetail {
            rhs: Some(vec![("p".to_owned(), "D".to_owned()), ("q".to_owned(), "B".to_owned())]),
            lhs: Some(vec![("C".to_owned(), "r".to_owned())]),
            ..ClassDetail::default()
        },
    );
    let mut graph = graph(&structure, &classes);
    let mut detail = focusing(&graph, "B");
    detail.show_right_hand = true;
    detail.show_left_hand = true;

    let snapshot = |graph: &GraphRepository| {
        graph
            .visible_keys()
            .map(|key| (key, graph.node_class(key)))
            .collect::<Vec<_>>()
    };
    graph.update(&detail, false, 0.0);
    let first = snapshot(&graph);
    graph.update(&detail, false, 0.0);
    assert_eq!(snapshot(&graph), first);

    assert_eq!(graph.node_class(key_of(&graph, "D")), Some(NodeClass::RangeLeaf));
    assert_eq!(graph.node_class(key_of(&graph, "C")), Some(NodeClass::DomainLeaf));
    assert_eq!(graph.node_class(key_of(&graph, "B")), Some(NodeClass::Focusing));
}
