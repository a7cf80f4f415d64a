use std::cmp::Ordering;

use dagnet::prelude::*;

fn ordered_ids<'a>(
    iter: impl Iterator<Item = Result<&'a Node<&'static str>, GraphError>>,
) -> Vec<&'static str> {
    iter.map(|node| *node.expect("total ordering").id()).collect()
}

fn diamond() -> Dag<&'static str> {
    Dag::from_nodes([
        Node::new("root"),
        Node::new("left").with_parents(["root"]),
        Node::new("right").with_parents(["root"]),
        Node::new("join").with_parents(["left", "right"]),
        Node::new("leaf").with_parents(["join"]),
    ])
    .unwrap()
}

#[test]
fn downward_order_is_level_then_identity() {
    let dag = diamond();
    let order = ordered_ids(dag.iter_down(&"root").unwrap());
    assert_eq!(order, ["root", "left", "right", "join", "leaf"]);
}

#[test]
fn upward_order_is_level_then_identity() {
    let dag = diamond();
    let order = ordered_ids(dag.iter_up(&"leaf").unwrap());
    assert_eq!(order, ["leaf", "join", "left", "right", "root"]);
}

#[test]
fn seed_set_orders_among_itself() {
    let dag = diamond();
    let order = ordered_ids(dag.iter_down_from(["right", "left"]).unwrap());
    assert_eq!(order, ["left", "right", "join", "leaf"]);
}

#[test]
fn level_is_first_discovery_level() {
    // "deep" is reachable both directly from the root (level 1) and through
    // a longer chain; it is still yielded exactly once.
    let mut dag = Dag::from_nodes([
        Node::new("root"),
        Node::new("deep").with_parents(["root"]),
        Node::new("mid").with_parents(["root"]),
    ])
    .unwrap();
    dag.add_edge(&"mid", &"deep", CyclePolicy::Strict).unwrap();

    let order = ordered_ids(dag.iter_down(&"root").unwrap());
    assert_eq!(order, ["root", "deep", "mid"]);
}

#[test]
fn traversal_is_lazy_and_consumable_once() {
    let dag = diamond();
    let mut iter = dag.iter_down(&"root").unwrap();
    assert_eq!(*iter.next().unwrap().unwrap().id(), "root");
    // Remaining closure continues from where consumption stopped.
    let rest = ordered_ids(iter);
    assert_eq!(rest, ["left", "right", "join", "leaf"]);
}

fn reversed(a: &Node<&'static str>, b: &Node<&'static str>) -> Option<Ordering> {
    Some(b.id().cmp(a.id()))
}

#[test]
fn custom_comparator_breaks_ties() {
    let mut dag = Dag::with_ordering(reversed);
    dag.add_node(Node::new("root"), CyclePolicy::Strict).unwrap();
    for id in ["a", "b", "c"] {
        dag.add_node(Node::new(id).with_parents(["root"]), CyclePolicy::Strict)
            .unwrap();
    }
    let order = ordered_ids(dag.iter_down(&"root").unwrap());
    assert_eq!(order, ["root", "c", "b", "a"]);
}

fn refuses_equal_lengths(a: &Node<&'static str>, b: &Node<&'static str>) -> Option<Ordering> {
    if a.id().len() == b.id().len() {
        None
    } else {
        Some(a.id().len().cmp(&b.id().len()))
    }
}

#[test]
fn broken_comparator_fails_and_fuses_the_traversal() {
    let mut dag = Dag::with_ordering(refuses_equal_lengths);
    dag.add_node(Node::new("r"), CyclePolicy::Strict).unwrap();
    // Two same-length children force a tie the comparator refuses to order.
    dag.add_node(Node::new("aa").with_parents(["r"]), CyclePolicy::Strict)
        .unwrap();
    dag.add_node(Node::new("bb").with_parents(["r"]), CyclePolicy::Strict)
        .unwrap();

    let mut iter = dag.iter_down(&"r").unwrap();
    assert_eq!(*iter.next().unwrap().unwrap().id(), "r");
    assert!(matches!(
        iter.next().unwrap(),
        Err(GraphError::ImproperOrdering(_, _))
    ));
    assert!(iter.next().is_none());
}

#[test]
fn broken_comparator_surfaces_from_mutation_cycle_checks() {
    let mut dag = Dag::with_ordering(refuses_equal_lengths);
    for id in ["x", "aa", "bb", "y"] {
        dag.add_node(Node::new(id), CyclePolicy::Strict).unwrap();
    }
    dag.add_edge(&"aa", &"x", CyclePolicy::Strict).unwrap();
    dag.add_edge(&"bb", &"x", CyclePolicy::Strict).unwrap();

    // The upward walk from "x" has to order "aa" against "bb" and fails.
    let err = dag.add_edge(&"x", &"y", CyclePolicy::Strict).unwrap_err();
    assert!(matches!(err, GraphError::ImproperOrdering(_, _)));
    assert!(!dag.has_edge(&"x", &"y"));
}

#[test]
fn default_comparator_never_fails() {
    let dag = diamond();
    assert!(dag.iter_down(&"root").unwrap().all(|node| node.is_ok()));
    assert!(dag.iter_up(&"leaf").unwrap().all(|node| node.is_ok()));
}
