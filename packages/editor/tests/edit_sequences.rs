//! Randomized edit sequences
//!
//! This tests:
//! - Tree invariants hold after every structural edit
//! - The ancestor index always equals a fresh rebuild
//! - `is_descendant` agrees with a direct walk over `children`
//! - No-op edits leave the tree untouched

use outliner_editor::{
    AncestorIndex, Direction, Document, DropIntent, Mutation, MutationOutcome, Node, NodeId,
    NodeStore, Status,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn seeded_document(rng: &mut StdRng, size: usize) -> Document {
    let mut doc = Document::new("root").with_id_seed("fuzz");
    let root = doc.root_id().clone();

    // Grow a first child under the root, then keep adding siblings and
    // indenting some of them to get a varied shape.
    let first = NodeId::from("seed");
    let mut nodes: Vec<Node> = doc.snapshot().nodes.into_values().collect();
    for node in nodes.iter_mut() {
        if node.id == root {
            node.children.push(first.clone());
        }
    }
    nodes.push(Node::task(first.clone()));
    let map = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
    doc = Document::load(map, root).unwrap().with_id_seed("fuzz");

    let mut ids = vec![first];
    for _ in 0..size {
        let anchor = ids.choose(rng).unwrap().clone();
        let created = doc.create_sibling_after(&anchor).unwrap();
        if rng.gen_bool(0.5) {
            doc.indent(&created);
        }
        ids.push(created);
    }
    doc
}

fn random_mutation(rng: &mut StdRng, doc: &Document) -> Mutation {
    let mut pool: Vec<NodeId> = doc.flatten();
    pool.push(NodeId::from("ghost"));
    let node_id = pool.choose(rng).unwrap().clone();
    let other = pool.choose(rng).unwrap().clone();

    match rng.gen_range(0..11) {
        0 => Mutation::CreateSiblingAfter { node_id },
        1 => Mutation::DeleteNode { node_id },
        2 => Mutation::Indent { node_id },
        3 => Mutation::Outdent { node_id },
        4 => Mutation::MoveUp { node_id },
        5 => Mutation::MoveDown { node_id },
        6 => Mutation::MoveTo {
            node_id,
            new_parent_id: other,
            index: rng.gen_range(0..4),
        },
        7 => Mutation::Drop {
            node_id,
            intent: match rng.gen_range(0..3) {
                0 => DropIntent::Before(other),
                1 => DropIntent::After(other),
                _ => DropIntent::Into(other),
            },
        },
        8 => Mutation::UpdateContent {
            node_id,
            content: format!("text {}", rng.gen_range(0..100)),
        },
        9 => Mutation::UpdateStatus {
            node_id,
            status: [Status::Unchecked, Status::Done, Status::Failed]
                .choose(rng)
                .copied()
                .unwrap(),
        },
        _ => Mutation::Indent { node_id },
    }
}

/// Rebuild every node's children purely from flattened (id, depth) rows
fn rebuild_from_rows(doc: &Document) -> Document {
    let rows = doc.flatten_entries(None);
    let mut nodes: HashMap<NodeId, Node> = rows
        .iter()
        .map(|row| {
            let mut node = doc.get(&row.id).unwrap().clone();
            node.children.clear();
            (row.id.clone(), node)
        })
        .collect();

    let mut open: Vec<NodeId> = Vec::new();
    for row in &rows {
        open.truncate(row.depth);
        if let Some(parent) = open.last() {
            nodes.get_mut(parent).unwrap().children.push(row.id.clone());
        }
        open.push(row.id.clone());
    }

    Document::load(nodes, rows[0].id.clone()).unwrap()
}

/// Direct recursive check, independent of the ancestor index
fn descends_from(nodes: &NodeStore, candidate: &NodeId, ancestor: &NodeId) -> bool {
    nodes
        .children(ancestor)
        .iter()
        .any(|child| child == candidate || descends_from(nodes, candidate, child))
}

#[test]
fn test_invariants_survive_random_edits() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let mut doc = seeded_document(&mut rng, 15);
        doc.check_invariants().unwrap();

        for _ in 0..200 {
            let mutation = random_mutation(&mut rng, &doc);
            let label = format!("{:?}", mutation);
            doc.apply(mutation);

            if let Err(err) = doc.check_invariants() {
                panic!("{} broke the tree: {}", label, err);
            }
            // Everything in the store stays reachable
            assert_eq!(doc.flatten().len(), doc.nodes().len(), "after {}", label);
        }
    }
}

#[test]
fn test_is_descendant_matches_direct_walk() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..10 {
        let doc = seeded_document(&mut rng, 25);
        let index = AncestorIndex::rebuild(doc.root_id(), doc.nodes());
        let all = doc.flatten();

        for candidate in &all {
            for ancestor in &all {
                assert_eq!(
                    index.is_descendant(candidate, ancestor),
                    descends_from(doc.nodes(), candidate, ancestor),
                    "{} under {}",
                    candidate,
                    ancestor
                );
            }
        }
    }
}

#[test]
fn test_noop_edits_leave_tree_unchanged() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..10 {
        let mut doc = seeded_document(&mut rng, 20);

        for _ in 0..300 {
            let mutation = random_mutation(&mut rng, &doc);
            let before = doc.snapshot();
            let index_before = doc.ancestors().clone();
            let version_before = doc.version();

            let result = doc.apply(mutation);
            if result.outcome == MutationOutcome::NoOp {
                assert_eq!(doc.snapshot(), before);
                assert_eq!(doc.ancestors(), &index_before);
                assert_eq!(doc.version(), version_before);
            } else {
                assert_eq!(doc.version(), version_before + 1);
            }
        }
    }
}

#[test]
fn test_flatten_rows_rebuild_same_tree_after_edits() {
    let mut rng = StdRng::seed_from_u64(0xf1a7);

    for _ in 0..10 {
        let mut doc = seeded_document(&mut rng, 25);
        for _ in 0..50 {
            let mutation = random_mutation(&mut rng, &doc);
            doc.apply(mutation);
        }

        let rebuilt = rebuild_from_rows(&doc);
        assert_eq!(rebuilt.flatten(), doc.flatten());
        for node_id in doc.flatten() {
            assert_eq!(rebuilt.children(&node_id), doc.children(&node_id), "{}", node_id);
        }
        assert_eq!(rebuilt.snapshot(), doc.snapshot());
    }
}

#[test]
fn test_navigation_walks_whole_outline() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut doc = seeded_document(&mut rng, 30);
    let order = doc.flatten();

    // Building the tree leaves the last created node selected
    doc.clear_selection();

    let mut visited = Vec::new();
    while doc.navigate(Direction::Down) == MutationOutcome::Applied {
        visited.push(doc.selection().selected_id.clone().unwrap());
    }
    assert_eq!(visited, order);

    let mut back = Vec::new();
    while doc.navigate(Direction::Up) == MutationOutcome::Applied {
        back.push(doc.selection().selected_id.clone().unwrap());
    }
    back.reverse();
    assert_eq!(back, order[..order.len() - 1].to_vec());
}
